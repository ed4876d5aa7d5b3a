use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use txt_stats::charts::{install_font, render_all, ChartSettings};
use txt_stats::config::AppConfig;
use txt_stats::file_io::read_messages_csv;
use txt_stats::logging::{init_logging, OperationTimer};
use txt_stats::validation::InputValidator;
use txt_stats::{NlpProcessor, Party, RenderContext};

/// Render charts from a messages.csv produced by txt-extract
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file written by txt-extract
    csv_path: PathBuf,

    /// Chart style, e.g. ggplot, seaborn, dark_background
    style: String,

    /// Directory receiving the PNG files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Render charts one at a time
    #[arg(long)]
    sequential: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    let _guard = init_logging(&config.logging)?;

    if let Err(err) = run(cli, &config).await {
        error!("Rendering failed: {err:#}");
        return Err(err);
    }
    Ok(())
}

async fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    let style = InputValidator::validate_style(&cli.style)?;
    InputValidator::validate_input_csv(&cli.csv_path)?;

    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.charts.output_dir));
    InputValidator::ensure_output_dir(&output_dir)?;

    let table = read_messages_csv(&cli.csv_path)
        .with_context(|| format!("Failed to load {}", cli.csv_path.display()))?;
    info!(
        rows = table.len(),
        receiver = table.count(Party::Receiver),
        sender = table.count(Party::Sender),
        weeks = table.week_buckets().periods(),
        "Loaded {}",
        cli.csv_path.display()
    );

    install_font(config.font_path().as_deref())?;

    let ctx = RenderContext {
        style,
        settings: ChartSettings::from(&config.charts),
        nlp: NlpProcessor::new(config.charts.extra_stopwords.as_slice())?,
    };

    let parallel = config.charts.parallel && !cli.sequential;
    info!(style = %style, parallel, "Rendering charts into {}", output_dir.display());

    let timer = OperationTimer::new("render charts");
    let written = render_all(Arc::new(table), Arc::new(ctx), &output_dir, parallel).await?;
    timer.finish();

    info!("Wrote {} charts", written.len());
    Ok(())
}
