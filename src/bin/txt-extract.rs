use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use txt_stats::config::AppConfig;
use txt_stats::extract::extract_messages;
use txt_stats::file_io::write_messages_csv;
use txt_stats::logging::{init_logging, OperationTimer};
use txt_stats::validation::InputValidator;
use txt_stats::ChatDbRepository;

/// Extract a two-person iMessage conversation into messages.csv
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Message store handle id of the first participant
    handle_a: String,

    /// Message store handle id of the second participant
    handle_b: String,

    /// Path to chat.db (defaults to the configured or platform location)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    let _guard = init_logging(&config.logging)?;

    if let Err(err) = run(&cli, &config) {
        error!("Extraction failed: {err:#}");
        return Err(err);
    }
    Ok(())
}

fn run(cli: &Cli, config: &AppConfig) -> Result<()> {
    let handles = InputValidator::validate_handle_pair(&cli.handle_a, &cli.handle_b)?;

    let db_path = match cli.database.clone().or_else(|| config.get_imessage_db_path()) {
        Some(path) => path,
        None => ChatDbRepository::default_path().context("Failed to locate iMessage database")?,
    };
    InputValidator::validate_source_db(&db_path)?;
    info!("Using iMessage database at: {}", db_path.display());

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.extract.output_path));
    InputValidator::validate_output_file(&output)?;

    let zone = config.display_zone()?;
    let repo = ChatDbRepository::open(&db_path)
        .with_context(|| format!("Failed to open message store {}", db_path.display()))?;

    let timer = OperationTimer::new("extract");
    let extraction = extract_messages(&repo, &handles, zone)?;
    info!(
        "Kept {} messages ({} without text) across {} weeks",
        extraction.records.len(),
        extraction.dropped,
        extraction.buckets.periods()
    );

    write_messages_csv(&extraction.records, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    timer.finish();

    Ok(())
}
