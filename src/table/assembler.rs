//! Composes the engine components into one table per worksheet.
use crate::config::Config;
use crate::error::SheetTablesError;
use crate::report::Reporter;
use crate::spreadsheet::SheetCell;
use crate::spreadsheet::Workbook;
use crate::spreadsheet::Worksheet;
use crate::table::attributes::extract_attributes;
use crate::table::dimension::recalculate_dimensions;
use crate::table::header::is_attribute;
use crate::table::header::is_header_row;
use crate::table::header::table_title;
use crate::table::model::Cell;
use crate::table::model::Table;
use crate::table::noise::filter_noise;
use crate::table::normalize_text;
use crate::table::regions::resolve_merged_regions;
use crate::table::tree::build_left_tree;
use crate::table::tree::build_top_tree;
use crate::table::TableError;
use std::io::Write;
use tracing::debug;
use tracing::error;
use tracing::warn;

/// Extracts the table structure of one worksheet.
///
/// # Arguments
/// * `worksheet` - Worksheet loaded from a workbook
/// * `config` - Metadata constants and noise limits
///
/// # Returns
/// The table, or the reason the worksheet produces none
pub fn process_worksheet(worksheet: &Worksheet, config: &Config) -> Result<Table, TableError> {
    let grid = worksheet.grid();
    let column_count = grid.first().map_or(0, Vec::len);
    let filtered = filter_noise(grid, config.extraction.max_words_per_cell)?;
    let rows = filtered.rows;

    let cells: Vec<Vec<Cell>> = rows
        .iter()
        .enumerate()
        .map(|(row, sheet_cells)| {
            let is_header = is_header_row(row, sheet_cells);
            sheet_cells
                .iter()
                .enumerate()
                .map(|(col, cell)| to_table_cell(cell, row, col, is_header))
                .collect()
        })
        .collect();

    let merged_regions = resolve_merged_regions(
        &worksheet.merged_ranges,
        worksheet.origin(),
        filtered.removed_blank_row,
        cells.len(),
        column_count,
    );
    let (top_header_rows_number, top_tree_root) = build_top_tree(&cells, &merged_regions)?;
    let (left_header_columns_number, left_tree_root) = build_left_tree(&cells, top_header_rows_number)?;
    debug!(
        sheet = %worksheet.title,
        rows = cells.len(),
        removed_blank_row = ?filtered.removed_blank_row,
        footnote_rows = filtered.footnote_rows.len(),
        "Extracted table"
    );

    Ok(Table {
        storage_account: config.metadata.storage_account.to_owned(),
        blob_name: config.metadata.blob_name.to_owned(),
        sheet_name: worksheet.title.to_owned(),
        language: config.metadata.language.to_owned(),
        range_address: recalculate_dimensions(&worksheet.dimensions(), cells.len()),
        title: table_title(&rows, &worksheet.title),
        cells,
        merged_regions,
        top_header_rows_number,
        top_tree_root,
        left_header_columns_number,
        left_tree_root,
    })
}

fn to_table_cell(cell: &SheetCell, row: usize, col: usize, is_header: bool) -> Cell {
    let text = cell.text_value();
    let normalized_text = if text == "None" { String::new() } else { normalize_text(&text) };
    Cell {
        text: text.clone(),
        normalized_text,
        is_header,
        value: text,
        is_attribute: is_attribute(is_header, col, cell),
        coordinates: (row, col),
        attributes: extract_attributes(cell),
    }
}

/// Extracts every worksheet of a workbook, in workbook order.
///
/// Rejected or failing worksheets are written to the skipped channel and
/// contribute no table; they never stop the remaining worksheets.
///
/// # Arguments
/// * `workbook` - Opened workbook
/// * `config` - Metadata constants and noise limits
/// * `reporter` - Skipped channel and counters
///
/// # Returns
/// The tables produced, or an error only when the skipped channel cannot be written
pub fn process_workbook<W: Write>(
    workbook: &mut dyn Workbook,
    config: &Config,
    reporter: &mut Reporter<W>,
) -> Result<Vec<Table>, SheetTablesError> {
    let mut tables = Vec::new();
    for name in workbook.sheet_names() {
        match workbook.worksheet(&name) {
            Ok(worksheet) => match process_worksheet(&worksheet, config) {
                Ok(table) => tables.push(table),
                Err(reason) => {
                    warn!(workbook = %workbook.name(), sheet = %name, %reason, "Skipped sheet");
                    reporter.skip_sheet(&name)?;
                }
            },
            Err(reason) => {
                error!(workbook = %workbook.name(), sheet = %name, %reason, "Skipped sheet");
                reporter.skip_sheet(&name)?;
            }
        }
    }
    Ok(tables)
}
