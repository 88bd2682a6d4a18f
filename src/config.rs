use crate::error::SheetTablesError;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// Extraction and batch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub metadata: MetadataConfig,
    pub extraction: ExtractionConfig,
    pub logging: LoggingConfig,
}

/// Constant fields written into every table record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub storage_account: String,
    pub blob_name: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Cells with more whitespace-delimited words reject the worksheet
    pub max_words_per_cell: usize,

    /// Glob pattern (relative to the input directory) selecting workbooks
    pub workbook_pattern: String,

    /// Glob pattern (relative to the input directory) selecting table documents to clean
    pub document_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,

    /// General processing log
    pub output_log: String,

    /// One line per rejected sheet
    pub skipped_log: String,

    /// General log of the cleaning pass
    pub cleaning_output_log: String,

    /// One line per table dropped by the cleaning pass
    pub cleaning_skipped_log: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            storage_account: "EDGARExcelCrawled".to_string(),
            blob_name: "DataSpreadsheet".to_string(),
            language: "english".to_string(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_words_per_cell: 20,
            workbook_pattern: "**/*.xls[xm]".to_string(),
            document_pattern: "**/*.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("."),
            output_log: "output.log".to_string(),
            skipped_log: "skipped_tables.log".to_string(),
            cleaning_output_log: "output_post_processing.log".to_string(),
            cleaning_skipped_log: "removed_tables_post_processing.log".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metadata: MetadataConfig::default(),
            extraction: ExtractionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SheetTablesError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SheetTablesError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.metadata.storage_account, "EDGARExcelCrawled");
        assert_eq!(config.metadata.blob_name, "DataSpreadsheet");
        assert_eq!(config.metadata.language, "english");
        assert_eq!(config.extraction.max_words_per_cell, 20);
        assert_eq!(config.logging.skipped_log, "skipped_tables.log");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.extraction.max_words_per_cell = 30;
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        config.save_to_file(&config_path).unwrap();

        let loaded_config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_partial_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[extraction]\nmax_words_per_cell = 12\n").unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.extraction.max_words_per_cell, 12);
        assert_eq!(config.extraction.workbook_pattern, "**/*.xls[xm]");
        assert_eq!(config.metadata, MetadataConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[extraction]\nmax_words_per_cell = \"many\"\n").unwrap();

        assert!(Config::load_from_file(&config_path).is_err());
    }
}
