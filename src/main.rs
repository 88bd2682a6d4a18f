use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use sheet_tables::batch::clean_directory;
use sheet_tables::batch::extract_directory;
use sheet_tables::config::Config;
use sheet_tables::report::Reporter;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

#[derive(Parser)]
#[command(name = "sheet-tables")]
#[command(about = "Extract table structure (cells, attributes, header trees) from filing spreadsheets")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the general and skipped logs (overrides the configuration)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract one table document per workbook
    Extract {
        /// Directory searched recursively for workbooks
        input_dir: PathBuf,
        /// Directory receiving the JSON documents
        output_dir: PathBuf,
    },
    /// Post process extracted documents, dropping sparse tables and rows
    Clean {
        /// Directory searched recursively for JSON documents
        input_dir: PathBuf,
        /// Directory receiving the cleaned documents
        output_dir: PathBuf,
    },
}

/// Installs the general log: a file in `log_dir` plus stderr, filtered by `RUST_LOG`.
fn init_logging(log_dir: &Path, file_name: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir).with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .boxed();
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .boxed();

    Registry::default()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();
    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(log_dir) = cli.log_dir {
        config.logging.log_dir = log_dir;
    }
    let log_dir = config.logging.log_dir.clone();

    let summary = match &cli.command {
        Command::Extract { input_dir, output_dir } => {
            let _guard = init_logging(&log_dir, &config.logging.output_log)?;
            let mut reporter = Reporter::create(&log_dir.join(&config.logging.skipped_log))?;
            let summary = extract_directory(input_dir, output_dir, &config, &mut reporter)?;
            reporter.finish()?;
            summary
        }
        Command::Clean { input_dir, output_dir } => {
            let _guard = init_logging(&log_dir, &config.logging.cleaning_output_log)?;
            let mut reporter = Reporter::create(&log_dir.join(&config.logging.cleaning_skipped_log))?;
            let summary = clean_directory(input_dir, output_dir, &config, &mut reporter)?;
            reporter.finish()?;
            summary
        }
    };

    println!(
        "Processed {} files ({} tables), skipped {} files, {} sheets, {} tables.",
        summary.processed_files, summary.tables, summary.failed_files, summary.skipped_sheets, summary.dropped_tables
    );
    Ok(())
}
