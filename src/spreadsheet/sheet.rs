use crate::spreadsheet::cell::SheetCell;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::range_to_index;
use std::collections::BTreeMap;

/// Represents one worksheet of a workbook: its cells, used bounds and merged ranges.
#[derive(Clone, Debug, Default)]
pub struct Worksheet {
    /// Sheet name
    pub title: String,
    /// Cells keyed by zero-based (row, col); styled empty cells are kept
    cells: BTreeMap<(usize, usize), SheetCell>,
    /// Merged ranges in A1 notation ("B2:C3"), in declaration order
    pub merged_ranges: Vec<String>,
    /// Used bounds (determined from cell positions)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Worksheet {
    /// Creates an empty sheet with the given title.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            ..Self::default()
        }
    }

    /// Returns true if the sheet contains no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds (or replaces) a cell, widening the used bounds.
    pub fn push(&mut self, row: usize, col: usize, cell: SheetCell) {
        self.update_bound(row, col);
        self.cells.insert((row, col), cell);
    }

    /// Builder-style variant of [`Worksheet::push`].
    pub fn with_cell(mut self, row: usize, col: usize, cell: SheetCell) -> Self {
        self.push(row, col, cell);
        self
    }

    /// Fills a whole row with text cells starting at column 0; empty strings leave gaps.
    pub fn with_row(mut self, row: usize, values: &[&str]) -> Self {
        for (col, value) in values.iter().enumerate() {
            if !value.is_empty() {
                self.push(row, col, SheetCell::text(value));
            }
        }
        self
    }

    /// Declares a merged range in A1 notation.
    ///
    /// Every covered position except the top-left anchor becomes an empty, unstyled cell,
    /// so merged areas count towards the used range and only the anchor carries a value.
    pub fn merge(&mut self, range: &str) {
        self.merged_ranges.push(range.to_owned());
        if let Some((first_row, first_col, last_row, last_col)) = range_to_index(range) {
            for row in first_row..=last_row {
                for col in first_col..=last_col {
                    if (row, col) != (first_row, first_col) {
                        self.push(row, col, SheetCell::default());
                    }
                }
            }
        }
    }

    /// Builder-style variant of [`Worksheet::merge`].
    pub fn with_merged_range(mut self, range: &str) -> Self {
        self.merge(range);
        self
    }

    /// Updates the used bounds based on a cell position.
    fn update_bound(&mut self, row: usize, col: usize) {
        self.row_lower_bound = Some(self.row_lower_bound.map_or(row, |bound| bound.min(row)));
        self.row_upper_bound = Some(self.row_upper_bound.map_or(row, |bound| bound.max(row)));
        self.col_lower_bound = Some(self.col_lower_bound.map_or(col, |bound| bound.min(col)));
        self.col_upper_bound = Some(self.col_upper_bound.map_or(col, |bound| bound.max(col)));
    }

    /// Zero-based (first_row, first_col) of the used range; (0, 0) for an empty sheet.
    pub fn origin(&self) -> (usize, usize) {
        (self.row_lower_bound.unwrap_or(0), self.col_lower_bound.unwrap_or(0))
    }

    /// A1-style address of the used range ("A1:D148"); "A1:A1" for an empty sheet.
    pub fn dimensions(&self) -> String {
        let (first_row, first_col) = self.origin();
        let last_row = self.row_upper_bound.unwrap_or(first_row);
        let last_col = self.col_upper_bound.unwrap_or(first_col);
        format!(
            "{}:{}",
            index_to_reference(first_row, first_col),
            index_to_reference(last_row, last_col)
        )
    }

    /// Gets the cell at a sheet position, if one was declared.
    pub fn get(&self, row: usize, col: usize) -> Option<&SheetCell> {
        self.cells.get(&(row, col))
    }

    /// Dense row-major grid over the used range; undeclared positions are empty unstyled cells.
    pub fn grid(&self) -> Vec<Vec<SheetCell>> {
        let (Some(row_lower), Some(row_upper), Some(col_lower), Some(col_upper)) = (
            self.row_lower_bound,
            self.row_upper_bound,
            self.col_lower_bound,
            self.col_upper_bound,
        ) else {
            return Vec::new();
        };
        (row_lower..=row_upper)
            .map(|row| {
                (col_lower..=col_upper)
                    .map(|col| self.get(row, col).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}
