//! # Spreadsheet Reading Module
//!
//! This module reads Office Open XML workbooks (.xlsx, .xlsm, .xltx, .xltm) into
//! plain in-memory worksheets: typed cell values, resolved format records and
//! merged ranges. The table engine only sees the [`Workbook`] trait and the
//! [`Worksheet`] grid, never the package format.
pub(crate) mod cell;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod style;
pub(crate) mod xlsx;

pub use cell::CellValue;
pub use cell::SheetCell;
pub use sheet::Worksheet;
pub use style::Alignment;
pub use style::Border;
pub use style::CellStyle;
pub use style::Color;
pub use style::Fill;
pub use style::Font;
pub use style::HorizontalAlignment;
pub use style::VerticalAlignment;
pub use xlsx::XlsxWorkbook;

use crate::error::SheetTablesError;
use std::path::Path;
use thiserror::Error;

/// Custom error types for spreadsheet operations.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// A required part is missing from the package
    #[error("Missing file '{0}' in workbook package")]
    FileError(String),

    /// Unsupported or unrecognized file format
    #[error("Cannot detect file format for '{0}'")]
    InvalidFileFormat(String),

    /// Workbook declares no worksheets
    #[error("Workbook '{0}' contains no worksheets")]
    SpreadsheetEmptyError(String),

    /// Requested sheet not found
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// Cell refers to a shared string that does not exist
    #[error("Shared string index {0} out of range")]
    SharedStringIndexError(usize),

    /// Cell literal cannot be converted to its declared type
    #[error("Invalid cell value '{0}'")]
    CellValueError(String),
}

/// Read access to a workbook, one worksheet at a time.
pub trait Workbook {
    /// File name the workbook was opened from
    fn name(&self) -> String;

    /// Worksheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Loads one worksheet by name
    fn worksheet(&mut self, name: &str) -> Result<Worksheet, SheetTablesError>;
}

/// Opens a workbook file, choosing the reader by file extension.
///
/// # Arguments
/// * `path` - Path to the spreadsheet file
///
/// # Returns
/// Boxed workbook reader or an error for unsupported formats
pub fn open_workbook(path: &Path) -> Result<Box<dyn Workbook>, SheetTablesError> {
    let name = path.to_string_lossy();
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "xlsx" | "xlsm" | "xltx" | "xltm" => Ok(Box::new(XlsxWorkbook::open(&name)?)),
        _ => Err(SpreadsheetError::InvalidFileFormat(name.to_string()))?,
    }
}
