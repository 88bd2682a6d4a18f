//! # Table Structure Inference
//!
//! Turns one worksheet grid into a [`Table`]: noise rows are filtered out,
//! merged regions and the range address are reconciled with the removed rows,
//! every cell gets its attribute bundle and row classification, and the
//! column and row header hierarchies are induced as two trees.
pub mod assembler;
pub mod attributes;
pub mod dimension;
pub mod header;
pub mod model;
pub mod noise;
pub mod regions;
pub mod tree;

pub use assembler::process_workbook;
pub use assembler::process_worksheet;
pub use model::Cell;
pub use model::CellAttributes;
pub use model::DataType;
pub use model::MergedRegion;
pub use model::Table;
pub use model::TreeNode;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Reasons a worksheet does not produce a table.
#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    /// The worksheet has no cells at all
    #[error("Worksheet is empty")]
    EmptyWorksheet,

    /// More than one fully blank row
    #[error("Worksheet has {0} blank rows")]
    TooManyBlankRows(usize),

    /// A cell holds narrative text rather than tabular data
    #[error("Cell ({row}, {col}) has {words} words")]
    LongTextCell { row: usize, col: usize, words: usize },

    /// No header cell could be placed in the top tree
    #[error("Top header row yields no tree nodes")]
    EmptyTopTree,

    /// No data row follows the header rows
    #[error("No rows below the top header")]
    EmptyLeftTree,
}

/// NFKD-normalizes and trims a cell text.
pub fn normalize_text(text: &str) -> String {
    text.nfkd().collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(normalize_text("\u{a0}Revenue\u{a0}"), "Revenue");
        assert_eq!(normalize_text("ﬁscal ²"), "fiscal 2");
        assert_eq!(normalize_text("  "), "");
        let once = normalize_text(" Net\u{2003}income ");
        assert_eq!(normalize_text(&once), once);
    }
}
