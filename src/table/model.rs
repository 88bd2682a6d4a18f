//! Serialized table records.
//!
//! Field names and their order are the interchange format read by the
//! downstream cell classification task and by the cleaner.
use serde::Deserialize;
use serde::Serialize;

/// Data type classification of a cell (`DT`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataType {
    Text,
    Number,
    Date,
    Percentage,
    Currency,
    Unknown,
}

impl DataType {
    /// Numeric code written to the `DT` field.
    pub const fn code(&self) -> u8 {
        match self {
            Self::Text => 0,
            Self::Number => 1,
            Self::Date => 2,
            Self::Percentage => 3,
            Self::Currency => 4,
            Self::Unknown => 5,
        }
    }
}

/// Style, data type, border and alignment attributes of one cell.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CellAttributes {
    /// Formula flag, always 0 (formulas are not tracked)
    #[serde(rename = "HF")]
    pub has_formula: u8,
    #[serde(rename = "A1")]
    pub a1_formula: String,
    #[serde(rename = "R1")]
    pub r1_formula: String,
    pub font_name: Option<String>,
    pub font_size: Option<f64>,
    pub wrap_text: Option<bool>,
    /// Non-white background
    #[serde(rename = "BC")]
    pub background_color: u8,
    /// Non-black font colour
    #[serde(rename = "FC")]
    pub font_color: u8,
    #[serde(rename = "FB")]
    pub bold: u8,
    #[serde(rename = "I")]
    pub italic: u8,
    #[serde(rename = "NS")]
    pub number_format: String,
    #[serde(rename = "DT")]
    pub data_type: u8,
    #[serde(rename = "LB")]
    pub left_border: u8,
    #[serde(rename = "TB")]
    pub top_border: u8,
    #[serde(rename = "BB")]
    pub bottom_border: u8,
    #[serde(rename = "RB")]
    pub right_border: u8,
    /// Text rotation; absent for unstyled cells
    #[serde(rename = "O")]
    pub orientation: Option<i32>,
    #[serde(rename = "HA")]
    pub horizontal_alignment: u8,
    #[serde(rename = "VA")]
    pub vertical_alignment: u8,
}

impl Default for CellAttributes {
    fn default() -> Self {
        CellAttributes {
            has_formula: 0,
            a1_formula: String::new(),
            r1_formula: String::new(),
            font_name: None,
            font_size: None,
            wrap_text: None,
            background_color: 0,
            font_color: 0,
            bold: 0,
            italic: 0,
            number_format: "General".to_owned(),
            data_type: DataType::Unknown.code(),
            left_border: 0,
            top_border: 0,
            bottom_border: 0,
            right_border: 0,
            orientation: None,
            horizontal_alignment: 0,
            vertical_alignment: 1,
        }
    }
}

/// One table position with its texts, row classification and attributes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Cell {
    /// Text form of the value ("None" when absent)
    #[serde(rename = "T")]
    pub text: String,
    /// NFKD-normalized, trimmed text ("" when absent)
    #[serde(rename = "V")]
    pub normalized_text: String,
    pub is_header: bool,
    pub value: String,
    pub is_attribute: bool,
    /// Zero-based (row, col) in table coordinates
    pub coordinates: (usize, usize),
    #[serde(flatten)]
    pub attributes: CellAttributes,
}

/// Merged block in table coordinates, bounds inclusive.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct MergedRegion {
    pub first_row: usize,
    pub last_row: usize,
    pub first_column: usize,
    pub last_column: usize,
}

impl MergedRegion {
    pub fn contains_column(&self, col: usize) -> bool {
        self.first_column <= col && col <= self.last_column
    }
}

/// Header tree node. The root carries the (-1, -1) sentinel.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    #[serde(rename = "RI")]
    pub row: i64,
    #[serde(rename = "CI")]
    pub col: i64,
    #[serde(rename = "Cd")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn root() -> Self {
        TreeNode {
            row: -1,
            col: -1,
            children: Vec::new(),
        }
    }

    pub fn leaf(row: usize, col: usize) -> Self {
        TreeNode {
            row: row as i64,
            col: col as i64,
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.row == -1 && self.col == -1
    }

    /// Coordinates of every node below this one, depth first.
    pub fn descendants(&self) -> Vec<(i64, i64)> {
        let mut coordinates = Vec::new();
        for child in &self.children {
            coordinates.push((child.row, child.col));
            coordinates.extend(child.descendants());
        }
        coordinates
    }
}

/// One worksheet's extracted structure.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    pub storage_account: String,
    pub blob_name: String,
    pub sheet_name: String,
    pub language: String,
    pub range_address: String,
    pub title: String,
    pub cells: Vec<Vec<Cell>>,
    pub merged_regions: Vec<MergedRegion>,
    pub top_header_rows_number: usize,
    pub top_tree_root: TreeNode,
    pub left_header_columns_number: usize,
    pub left_tree_root: TreeNode,
}

impl Table {
    /// Number of columns of the first row (0 for a table without rows).
    pub fn column_count(&self) -> usize {
        self.cells.first().map_or(0, |row| row.len())
    }
}
