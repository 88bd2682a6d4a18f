//! Multi-file drivers: workbooks to table documents, and table documents to cleaned documents.
use crate::cleaner::clean_tables;
use crate::config::Config;
use crate::error::SheetTablesError;
use crate::report::Reporter;
use crate::report::Summary;
use crate::spreadsheet::open_workbook;
use crate::table::process_workbook;
use crate::table::Table;
use anyhow::Context;
use anyhow::Result;
use glob::Pattern;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tracing::error;
use tracing::info;
use walkdir::WalkDir;

/// Lists the files below `input_dir` whose relative path matches `pattern`, sorted by name.
pub fn collect_files(input_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern).with_context(|| format!("Invalid file pattern '{}'", pattern))?;
    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(input_dir).unwrap_or(entry.path());
        if pattern.matches_path(relative) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Output document path: `<output_dir>/<stem>.json`.
fn output_path(file: &Path, output_dir: &Path) -> PathBuf {
    let stem = file.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
    output_dir.join(format!("{}.json", stem))
}

/// Extracts the tables of every workbook below `input_dir`.
///
/// One JSON document is written per workbook. A workbook that cannot be opened
/// or written is counted as failed and the batch moves on.
///
/// # Arguments
/// * `input_dir` - Directory searched recursively for workbooks
/// * `output_dir` - Directory receiving the table documents (created if missing)
/// * `config` - Extraction settings
/// * `reporter` - Skipped channel and counters
///
/// # Returns
/// Summary of the run
pub fn extract_directory<W: Write>(
    input_dir: &Path,
    output_dir: &Path,
    config: &Config,
    reporter: &mut Reporter<W>,
) -> Result<Summary> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    let files = collect_files(input_dir, &config.extraction.workbook_pattern)?;
    info!(files = files.len(), input = %input_dir.display(), "Processing workbooks");

    for file in &files {
        match extract_file(file, output_dir, config, reporter) {
            Ok(tables) => {
                info!("Processed file: {}: Found {} tables.", file.display(), tables);
                reporter.processed_file(tables);
            }
            Err(reason) => {
                error!(file = %file.display(), %reason, "Skipped file");
                reporter.failed_file();
            }
        }
    }

    let summary = reporter.summary();
    info!(?summary, "Extraction finished");
    Ok(summary)
}

fn extract_file<W: Write>(
    file: &Path,
    output_dir: &Path,
    config: &Config,
    reporter: &mut Reporter<W>,
) -> Result<usize, SheetTablesError> {
    let mut workbook = open_workbook(file)?;
    let tables = process_workbook(workbook.as_mut(), config, reporter)?;
    fs::write(output_path(file, output_dir), serde_json::to_string(&tables)?)?;
    Ok(tables.len())
}

/// Cleans every table document below `input_dir` into `output_dir`.
///
/// Documents keep their file names. A document that cannot be read or parsed
/// is counted as failed and the batch moves on.
pub fn clean_directory<W: Write>(
    input_dir: &Path,
    output_dir: &Path,
    config: &Config,
    reporter: &mut Reporter<W>,
) -> Result<Summary> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    let files = collect_files(input_dir, &config.extraction.document_pattern)?;
    info!(files = files.len(), input = %input_dir.display(), "Post processing documents");

    for file in &files {
        match clean_file(file, output_dir, reporter) {
            Ok(tables) => {
                info!("Cleaned file: {}: Kept {} tables.", file.display(), tables);
                reporter.processed_file(tables);
            }
            Err(reason) => {
                error!(file = %file.display(), %reason, "Skipped file");
                reporter.failed_file();
            }
        }
    }

    let summary = reporter.summary();
    info!(?summary, "Post processing finished");
    Ok(summary)
}

fn clean_file<W: Write>(file: &Path, output_dir: &Path, reporter: &mut Reporter<W>) -> Result<usize, SheetTablesError> {
    let tables: Vec<Table> = serde_json::from_str(&fs::read_to_string(file)?)?;
    let tables = clean_tables(tables, reporter)?;
    fs::write(output_path(file, output_dir), serde_json::to_string(&tables)?)?;
    Ok(tables.len())
}
