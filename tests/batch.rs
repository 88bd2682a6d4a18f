mod common;

use common::Package;
use common::SheetXml;
use sheet_tables::batch::clean_directory;
use sheet_tables::batch::extract_directory;
use sheet_tables::config::Config;
use sheet_tables::report::Reporter;
use sheet_tables::report::Summary;
use sheet_tables::table::Table;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn annual_report() -> Package {
    let policy = "recognized when control transfers ".repeat(6);
    Package::new()
        .sheet(
            SheetXml::new("Balance Sheet")
                .row(0, &["Balance Sheet", "2020", "2019"])
                .row(1, &["*Assets", "", ""])
                .row(2, &["Cash", "10", "9"])
                .row(3, &["Receivables", "5", "4"])
                .row(4, &["Total", "15", "13"]),
        )
        .sheet(
            SheetXml::new("Policies")
                .row(0, &["Accounting Policies", ""])
                .row(1, &["Revenue", policy.trim()]),
        )
        .sheet(SheetXml::new("Equity").row(0, &["Equity", "2020"]).row(1, &["Stock", "5"]))
}

fn read_tables(path: &Path) -> Vec<Table> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn extract_then_clean() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    let documents = dir.path().join("documents");
    let cleaned = dir.path().join("cleaned");
    fs::create_dir_all(input.join("10-K")).unwrap();
    fs::write(input.join("10-K").join("0000320193-21.xlsx"), annual_report().to_bytes()).unwrap();
    fs::write(
        input.join("8-K.xlsm"),
        Package::new().sheet(SheetXml::new("Cover").row(0, &["Document", "Mar. 31, 2021"]).row(1, &["Entity", "ACME"])).to_bytes(),
    )
    .unwrap();
    fs::write(input.join("corrupt.xlsx"), b"PK not really a zip").unwrap();
    fs::write(input.join("readme.txt"), b"ignored").unwrap();
    let config = Config::default();

    let skipped_log = dir.path().join("skipped_tables.log");
    let mut reporter = Reporter::create(&skipped_log).unwrap();
    let summary = extract_directory(&input, &documents, &config, &mut reporter).unwrap();
    reporter.finish().unwrap();

    assert_eq!(
        summary,
        Summary {
            processed_files: 2,
            failed_files: 1,
            tables: 3,
            skipped_sheets: 1,
            dropped_tables: 0,
        }
    );
    assert_eq!(fs::read_to_string(&skipped_log).unwrap(), "Policies\n");
    let annual = read_tables(&documents.join("0000320193-21.json"));
    let names: Vec<&str> = annual.iter().map(|table| table.sheet_name.as_str()).collect();
    assert_eq!(names, vec!["Balance Sheet", "Equity"]);
    assert_eq!(read_tables(&documents.join("8-K.json"))[0].title, "Document");
    assert!(!documents.join("corrupt.json").exists());

    let mut annual = annual;
    for row in [2, 3] {
        for cell in annual[0].cells[row].iter_mut() {
            cell.normalized_text = String::new();
        }
    }
    fs::write(documents.join("0000320193-21.json"), serde_json::to_string(&annual).unwrap()).unwrap();
    fs::write(documents.join("partial.json"), b"[{\"SheetName\":").unwrap();

    let mut reporter = Reporter::new(Vec::new());
    let summary = clean_directory(&documents, &cleaned, &config, &mut reporter).unwrap();
    let (log, _) = reporter.finish().unwrap();

    assert_eq!(summary.processed_files, 2);
    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.tables, 2);
    assert_eq!(summary.dropped_tables, 1);
    assert_eq!(String::from_utf8(log).unwrap(), "Skipped table: Balance Sheet\n");
    let kept = read_tables(&cleaned.join("0000320193-21.json"));
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].sheet_name, "Equity");
    assert_eq!(read_tables(&cleaned.join("8-K.json")).len(), 1);
}

#[test]
fn custom_patterns_and_limits() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    fs::create_dir_all(input.join("10-Q")).unwrap();
    fs::create_dir_all(input.join("10-K")).unwrap();
    fs::write(input.join("10-Q").join("q1.xlsx"), annual_report().to_bytes()).unwrap();
    fs::write(input.join("10-K").join("fy.xlsx"), annual_report().to_bytes()).unwrap();

    let mut config = Config::default();
    config.extraction.workbook_pattern = "10-Q/*.xlsx".to_owned();
    config.extraction.max_words_per_cell = 40;
    let mut reporter = Reporter::new(Vec::new());
    let summary = extract_directory(&input, &output, &config, &mut reporter).unwrap();

    assert_eq!(summary.processed_files, 1);
    assert_eq!(summary.tables, 3);
    assert_eq!(summary.skipped_sheets, 0);
    assert!(output.join("q1.json").exists());
    assert!(!output.join("fy.json").exists());
}

#[test]
fn empty_input_directory() {
    let dir = tempdir().unwrap();
    let mut reporter = Reporter::new(Vec::new());
    let summary = extract_directory(dir.path(), &dir.path().join("out"), &Config::default(), &mut reporter).unwrap();
    assert_eq!(summary, Summary::default());
    assert!(dir.path().join("out").is_dir());
}
