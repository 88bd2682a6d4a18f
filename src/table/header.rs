//! Row classification: header rows, attribute cells and the table title.
use crate::spreadsheet::SheetCell;

/// A row is a header when it is the first row, its first cell is empty, or
/// all but exactly one of its cells are empty.
pub fn is_header_row(index: usize, row: &[SheetCell]) -> bool {
    let empty_cells = row.iter().filter(|cell| cell.is_empty()).count();
    index == 0 || row.first().map_or(true, |cell| cell.is_empty()) || empty_cells + 1 == row.len()
}

/// Only the non-empty first cell of a data row is an attribute.
pub fn is_attribute(is_header: bool, col: usize, cell: &SheetCell) -> bool {
    !is_header && col == 0 && !cell.is_empty()
}

/// Text of the top-left cell, or the sheet name when that cell is blank.
pub fn table_title(rows: &[Vec<SheetCell>], sheet_title: &str) -> String {
    rows.first()
        .and_then(|row| row.first())
        .and_then(|cell| cell.value.as_ref())
        .map(|value| value.to_string())
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| sheet_title.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::Worksheet;

    fn rows(values: &[&[&str]]) -> Vec<Vec<SheetCell>> {
        let mut sheet = Worksheet::new("Sheet1");
        for (index, row) in values.iter().enumerate() {
            sheet = sheet.with_row(index, row);
        }
        sheet.grid()
    }

    #[test]
    fn header_rules() {
        let grid = rows(&[
            &["Balance Sheet", "2020", "2019"],
            &["Assets", "", ""],
            &["", "Current", "Prior"],
            &["Cash", "10", "9"],
            &["Receivables", "", "4"],
        ]);
        let headers: Vec<bool> = grid.iter().enumerate().map(|(index, row)| is_header_row(index, row)).collect();
        assert_eq!(headers, vec![true, true, true, false, false]);
    }

    #[test]
    fn attribute_cells() {
        let cash = SheetCell::text("Cash");
        assert!(is_attribute(false, 0, &cash));
        assert!(!is_attribute(true, 0, &cash));
        assert!(!is_attribute(false, 1, &cash));
        assert!(!is_attribute(false, 0, &SheetCell::default()));
    }

    #[test]
    fn title_falls_back_to_sheet_name() {
        assert_eq!(table_title(&rows(&[&["Balance Sheet", "2020"]]), "Cover"), "Balance Sheet");
        assert_eq!(table_title(&[vec![SheetCell::default(), SheetCell::text("2020")]], "Cover"), "Cover");
        assert_eq!(table_title(&[vec![SheetCell::text(" ")]], "Cover"), "Cover");
        assert_eq!(table_title(&[], "Cover"), "Cover");
    }
}
