//! Noise filtering: blank separator rows, footnote rows and narrative text.
use crate::spreadsheet::CellValue;
use crate::spreadsheet::SheetCell;
use crate::table::normalize_text;
use crate::table::TableError;
use regex::Regex;
use std::sync::LazyLock;

/// Bracketed single digit reference mark ("[1]")
static FOOTNOTE_MARK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d\]").expect("Hardcode regex pattern"));

/// Grid left after noise filtering, with the rows that were taken out.
#[derive(Clone, Debug, Default)]
pub struct FilteredGrid {
    pub rows: Vec<Vec<SheetCell>>,
    /// Index of the single blank row removed, in grid coordinates
    pub removed_blank_row: Option<usize>,
    /// Footnote rows removed (indexes after the blank-row removal), last row first
    pub footnote_rows: Vec<usize>,
}

/// Filters one worksheet grid.
///
/// The passes run in order: blank rows, footnote rows, long text cells.
///
/// # Arguments
/// * `grid` - Dense row-major grid of the worksheet
/// * `max_words` - Largest number of whitespace-delimited words a cell may hold
///
/// # Returns
/// The filtered grid or the reason the worksheet is rejected
pub fn filter_noise(grid: Vec<Vec<SheetCell>>, max_words: usize) -> Result<FilteredGrid, TableError> {
    let mut rows = grid;
    if rows.first().map_or(true, |row| row.is_empty()) {
        Err(TableError::EmptyWorksheet)?
    }

    let blank_rows: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().all(is_blank))
        .map(|(index, _)| index)
        .collect();
    let removed_blank_row = match blank_rows.as_slice() {
        [] => None,
        [index] => {
            rows.remove(*index);
            Some(*index)
        }
        _ => Err(TableError::TooManyBlankRows(blank_rows.len()))?,
    };

    let footnote_rows: Vec<usize> = (0..rows.len())
        .rev()
        .filter(|index| rows[*index].first().is_some_and(is_footnote))
        .collect();
    for index in &footnote_rows {
        rows.remove(*index);
    }

    for (row, cells) in rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let words = cell.text_value().split_whitespace().count();
            if words > max_words {
                Err(TableError::LongTextCell { row, col, words })?
            }
        }
    }

    if rows.is_empty() {
        Err(TableError::EmptyWorksheet)?
    }
    Ok(FilteredGrid {
        rows,
        removed_blank_row,
        footnote_rows,
    })
}

/// A cell is blank when it has no value or its normalized text is "" or "None".
pub fn is_blank(cell: &SheetCell) -> bool {
    match &cell.value {
        None => true,
        Some(value) => {
            let text = normalize_text(&value.to_string());
            text.is_empty() || text == "None"
        }
    }
}

/// A footnote row starts with a text cell carrying a reference mark.
fn is_footnote(cell: &SheetCell) -> bool {
    matches!(&cell.value, Some(CellValue::Text(text)) if FOOTNOTE_MARK.is_match(text))
}
