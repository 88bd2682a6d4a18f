//! Second pass over serialized tables: whitespace entities and sparse rows.
use crate::error::SheetTablesError;
use crate::report::Reporter;
use crate::table::Table;
use regex::Regex;
use std::io::Write;
use std::sync::LazyLock;
use tracing::warn;

/// Numeric character references of space characters left over in cell texts
static SPACE_ENTITIES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:32|160|819[2-9]|820[0-2]|8232|8287|12288);?").expect("Hardcode regex pattern")
});

/// Replaces space entities with a plain space and trims the result.
pub fn clean_text(text: &str) -> String {
    SPACE_ENTITIES.replace_all(text, " ").trim().to_owned()
}

/// Cleans a list of tables, keeping their order.
///
/// Cells whose `V` is empty are counted; every other `V` is cleaned. A table
/// with more than one fully empty row (or no rows at all) is dropped and
/// recorded on the skipped channel; a single empty row is removed.
///
/// # Arguments
/// * `tables` - Tables of one document
/// * `reporter` - Skipped channel and counters
///
/// # Returns
/// The surviving tables
pub fn clean_tables<W: Write>(tables: Vec<Table>, reporter: &mut Reporter<W>) -> Result<Vec<Table>, SheetTablesError> {
    let mut cleaned = Vec::with_capacity(tables.len());
    for mut table in tables {
        let column_count = table.column_count();
        let mut empty_rows = Vec::new();
        for (index, row) in table.cells.iter_mut().enumerate() {
            let mut empty_cells = 0;
            for cell in row.iter_mut() {
                if cell.normalized_text.is_empty() {
                    empty_cells += 1;
                } else {
                    cell.normalized_text = clean_text(&cell.normalized_text);
                }
            }
            if empty_cells == column_count {
                empty_rows.push(index);
            }
        }

        match empty_rows.as_slice() {
            _ if table.cells.is_empty() || empty_rows.len() > 1 => {
                warn!(title = %table.title, empty_rows = empty_rows.len(), "Dropped table");
                reporter.drop_table(&table.title)?;
            }
            [index] => {
                table.cells.remove(*index);
                cleaned.push(table);
            }
            _ => cleaned.push(table),
        }
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::spreadsheet::Worksheet;
    use crate::table::process_worksheet;

    fn table(rows: &[&[&str]]) -> Table {
        let mut sheet = Worksheet::new("Sheet1");
        for (index, row) in rows.iter().enumerate() {
            sheet = sheet.with_row(index, row);
        }
        process_worksheet(&sheet, &Config::default()).unwrap()
    }

    fn blank_row(table: &mut Table, index: usize) {
        for cell in table.cells[index].iter_mut() {
            cell.normalized_text = String::new();
        }
    }

    #[test]
    fn entities_become_spaces() {
        assert_eq!(clean_text("Net&#160;income"), "Net income");
        assert_eq!(clean_text("&#8201;(1,200)&#12288"), "(1,200)");
        assert_eq!(clean_text("a&#8192b&#8202;c&#8287d"), "a b c d");
        assert_eq!(clean_text("&#8203;"), "&#8203;");
        let once = clean_text(" 10&#32;000 ");
        assert_eq!(once, "10 000");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn single_empty_row_is_removed() {
        let mut table = table(&[
            &["Income", "2020"],
            &["Revenue", "1&#160;000"],
            &["Cost", "2"],
            &["Tax", "3"],
            &["Net", "4"],
        ]);
        blank_row(&mut table, 3);
        let mut reporter = Reporter::new(Vec::new());

        let cleaned = clean_tables(vec![table.clone()], &mut reporter).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].cells.len(), 4);
        assert_eq!(cleaned[0].cells[1][1].normalized_text, "1 000");
        assert_eq!(cleaned[0].cells[3][0].value, "Net");
        assert_eq!(cleaned[0].cells[2], table.cells[2]);
        assert_eq!(reporter.summary().dropped_tables, 0);
    }

    #[test]
    fn sparse_tables_are_dropped() {
        let kept = table(&[&["Balance", "2020"], &["Cash", "1"]]);
        let mut dropped = table(&[&["Income", "2020"], &["Revenue", "1"], &["Cost", "2"]]);
        blank_row(&mut dropped, 1);
        blank_row(&mut dropped, 2);
        let mut reporter = Reporter::new(Vec::new());

        let cleaned = clean_tables(vec![dropped, kept], &mut reporter).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].title, "Balance");

        let (log, summary) = reporter.finish().unwrap();
        assert_eq!(String::from_utf8(log).unwrap(), "Skipped table: Income\n");
        assert_eq!(summary.dropped_tables, 1);
    }

    #[test]
    fn empty_table_is_dropped() {
        let mut table = table(&[&["Balance", "2020"], &["Cash", "1"]]);
        table.cells.clear();
        let mut reporter = Reporter::new(Vec::new());
        assert!(clean_tables(vec![table], &mut reporter).unwrap().is_empty());
    }
}
