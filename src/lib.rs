//! # Spreadsheet Table Structure Extraction
//!
//! Converts the worksheets of financial filing spreadsheets (10-K, 10-Q, 8-K
//! reports) into structured table records: per-cell texts and formatting
//! attributes, merged regions, and the column ("top") and row ("left") header
//! hierarchies induced from merges and bold cues.
//!
//! ## Pipeline
//!
//! - **Reading**: Office Open XML workbooks (`.xlsx`, `.xlsm`) are parsed into
//!   in-memory worksheets with typed values and resolved format records
//! - **Noise filtering**: a single blank separator row and footnote rows are
//!   removed; sheets with several blank rows or narrative text are skipped
//! - **Reconciliation**: merged regions and the range address follow the
//!   removed rows
//! - **Classification**: each row is a header or data row; first-column data
//!   cells are attributes
//! - **Tree induction**: top and left header trees rooted at a (-1, -1) sentinel
//! - **Post processing**: a later pass normalizes whitespace entities and drops
//!   tables that are still too sparse
//!
//! ## Output
//!
//! One JSON array of table records per workbook, with the field names the
//! downstream cell classification task expects (`SheetName`, `Cells`,
//! `MergedRegions`, `TopTreeRoot`, `LeftTreeRoot`, ...).
pub mod batch;
pub mod cleaner;
pub mod config;
pub mod error;
mod helpers;
pub mod report;
pub mod spreadsheet;
pub mod table;

pub use error::SheetTablesError;
