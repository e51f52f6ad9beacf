//! CLI entry point for the SIRI-SX disruption pipeline.
//!
//! Provides subcommands for turning a situation document into the
//! categorised CSV dataset, summarising an exported dataset, and checking
//! how a single text would be classified.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sirisx_disruptions::{
    config::load_classifier,
    fetch::load_document,
    output::{print_json, print_pretty, read_records, write_records},
    pipeline::process_document,
    stats::DatasetSummary,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sirisx_disruptions")]
#[command(about = "Extract and categorise public transport disruptions from SIRI-SX", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a SIRI-SX document from a file or URL into a CSV dataset
    Process {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to write the dataset to
        #[arg(short, long, default_value = "Causes_all_disruption_data.csv")]
        output: String,

        /// JSON file overriding the category tables
        #[arg(short, long)]
        categories: Option<String>,

        /// Also print a summary of the dataset
        #[arg(long, default_value_t = false)]
        summary: bool,
    },
    /// Print a summary of a previously exported CSV dataset
    Summarize {
        /// CSV file produced by `process`
        #[arg(value_name = "CSV")]
        input: String,
    },
    /// Classify a single summary or description text
    Classify {
        text: String,

        /// JSON file overriding the category tables
        #[arg(short, long)]
        categories: Option<String>,
    },
}

fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/sirisx_disruptions.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sirisx_disruptions.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            source,
            output,
            categories,
            summary,
        } => {
            let classifier = load_classifier(categories.as_deref())?;
            let bytes = load_document(&source).await?;
            let records = process_document(&bytes, &classifier)?;

            write_records(&output, &records)?;
            info!(output = %output, rows = records.len(), "Dataset written");

            let dataset_summary = DatasetSummary::from_records(&records);
            print_pretty(&dataset_summary);
            if summary {
                print_json(&dataset_summary)?;
            }
        }
        Commands::Summarize { input } => {
            let records = read_records(&input)?;
            print_json(&DatasetSummary::from_records(&records))?;
        }
        Commands::Classify { text, categories } => {
            let classifier = load_classifier(categories.as_deref())?;
            let detailed = classifier.table().classify(&text);
            let broad = classifier.fold().fold(detailed);
            info!(detailed, broad, "Classified text");
        }
    }

    Ok(())
}
