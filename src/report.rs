//! Reporting context shared by the extraction and cleaning passes.
//!
//! The general log goes through `tracing`; the skipped channel is a plain
//! writer owned here, one sheet or table title per line.
use crate::error::SheetTablesError;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Counters collected over one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub processed_files: usize,
    pub failed_files: usize,
    pub tables: usize,
    pub skipped_sheets: usize,
    pub dropped_tables: usize,
}

/// Owns the skipped channel and the batch counters.
pub struct Reporter<W: Write> {
    skipped: W,
    summary: Summary,
}

impl Reporter<File> {
    /// Creates (truncating) the skipped log file.
    pub fn create(path: &Path) -> Result<Self, SheetTablesError> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(skipped: W) -> Self {
        Self {
            skipped,
            summary: Summary::default(),
        }
    }

    /// Records a worksheet that produced no table.
    pub fn skip_sheet(&mut self, title: &str) -> Result<(), SheetTablesError> {
        self.summary.skipped_sheets += 1;
        writeln!(self.skipped, "{}", title)?;
        Ok(())
    }

    /// Records a table removed by the cleaner.
    pub fn drop_table(&mut self, title: &str) -> Result<(), SheetTablesError> {
        self.summary.dropped_tables += 1;
        writeln!(self.skipped, "Skipped table: {}", title)?;
        Ok(())
    }

    pub fn processed_file(&mut self, tables: usize) {
        self.summary.processed_files += 1;
        self.summary.tables += tables;
    }

    pub fn failed_file(&mut self) {
        self.summary.failed_files += 1;
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Flushes the skipped channel and hands back its writer.
    pub fn finish(mut self) -> Result<(W, Summary), SheetTablesError> {
        self.skipped.flush()?;
        Ok((self.skipped, self.summary))
    }
}
