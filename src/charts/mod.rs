//! Chart rendering.
//!
//! Each chart pairs a data-preparation function, which is plain Rust over a
//! [`MessageTable`], with a drawing routine that paints into an in-memory
//! [`Figure`]. [`render_all`] draws all nine and writes them as PNG files.

pub mod distribution;
pub mod figure;
pub mod format;
pub mod hourly;
pub mod ratio;
pub mod sentiment;
pub mod stats;
pub mod style;
pub mod weekday;
pub mod weekly;
pub mod wordcloud;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::config::ChartsConfig;
use crate::error::{Result, TxtStatsError};
use crate::logging::OperationTimer;
use crate::models::{MessageTable, Party};
use crate::nlp::NlpProcessor;

pub use figure::{install_font, resolve_font_path, Figure};
pub use style::ChartStyle;

/// The nine charts, in rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Split violins of send hour per weekday
    MessagesByHour,
    /// Bars of messages per weekday
    MessagesByDay,
    /// Pie of messages per party
    SentRatio,
    /// Bar pairs of messages per week
    WeeklyMessages,
    /// Histograms of characters per message
    TextLengthHistogram,
    /// Histograms of words per message
    NumWordsHistogram,
    /// Counterpart vocabulary
    ReceiverWordCloud,
    /// Local user vocabulary
    SenderWordCloud,
    /// Paired polarity density
    Positivity,
}

impl ChartKind {
    /// Every chart
    pub const ALL: [Self; 9] = [
        Self::MessagesByHour,
        Self::MessagesByDay,
        Self::SentRatio,
        Self::WeeklyMessages,
        Self::TextLengthHistogram,
        Self::NumWordsHistogram,
        Self::ReceiverWordCloud,
        Self::SenderWordCloud,
        Self::Positivity,
    ];

    /// Output file name
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::MessagesByHour => "messages_by_hour.png",
            Self::MessagesByDay => "messages_by_day.png",
            Self::SentRatio => "pie_chart.png",
            Self::WeeklyMessages => "weekly_messages_sent.png",
            Self::TextLengthHistogram => "text_length_hist.png",
            Self::NumWordsHistogram => "num_words_hist.png",
            Self::ReceiverWordCloud => "receiver_wordcloud.png",
            Self::SenderWordCloud => "sender_wordcloud.png",
            Self::Positivity => "positivity_graph.png",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name().trim_end_matches(".png"))
    }
}

/// Numeric knobs for the distribution charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSettings {
    /// Exclusive upper bound on characters in the length histogram
    pub text_length_cap: usize,
    /// Exclusive upper bound on words in the word-count histogram
    pub num_words_cap: usize,
    /// Bins per histogram
    pub histogram_bins: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            text_length_cap: 800,
            num_words_cap: 202,
            histogram_bins: 50,
        }
    }
}

impl From<&ChartsConfig> for ChartSettings {
    fn from(config: &ChartsConfig) -> Self {
        Self {
            text_length_cap: config.text_length_cap,
            num_words_cap: config.num_words_cap,
            histogram_bins: config.histogram_bins,
        }
    }
}

/// Everything a chart needs besides the table
pub struct RenderContext {
    /// Colors for every chart
    pub style: ChartStyle,
    /// Histogram caps and bins
    pub settings: ChartSettings,
    /// Tokenizer and polarity scorer
    pub nlp: NlpProcessor,
}

/// Draw one chart
pub fn render_chart(kind: ChartKind, table: &MessageTable, ctx: &RenderContext) -> Result<Figure> {
    let style = &ctx.style;
    match kind {
        ChartKind::MessagesByHour => hourly::render(table, style),
        ChartKind::MessagesByDay => weekday::render(table, style),
        ChartKind::SentRatio => ratio::render(table, style),
        ChartKind::WeeklyMessages => weekly::render(table, style),
        ChartKind::TextLengthHistogram => distribution::render_text_length(table, style, &ctx.settings),
        ChartKind::NumWordsHistogram => distribution::render_num_words(table, style, &ctx.settings),
        ChartKind::ReceiverWordCloud => wordcloud::render(table, Party::Receiver, &ctx.nlp),
        ChartKind::SenderWordCloud => wordcloud::render(table, Party::Sender, &ctx.nlp),
        ChartKind::Positivity => sentiment::render(table, style, &ctx.nlp),
    }
}

/// Draw `kind` and write it into `output_dir`
pub fn render_and_save(kind: ChartKind, table: &MessageTable, ctx: &RenderContext, output_dir: &Path) -> Result<PathBuf> {
    let timer = OperationTimer::new(&format!("render {kind}"));
    let figure = render_chart(kind, table, ctx)?;
    let path = output_dir.join(kind.file_name());
    figure.save_png(&path)?;
    timer.finish();
    Ok(path)
}

/// Render all nine charts into `output_dir`.
///
/// With `parallel` set each chart runs on tokio's blocking pool; otherwise
/// they run one after another. Every chart is attempted either way, and the
/// run fails if any of them did.
pub async fn render_all(
    table: Arc<MessageTable>,
    ctx: Arc<RenderContext>,
    output_dir: &Path,
    parallel: bool,
) -> Result<Vec<PathBuf>> {
    let mut outcomes = Vec::with_capacity(ChartKind::ALL.len());

    if parallel {
        let mut tasks = Vec::with_capacity(ChartKind::ALL.len());
        for kind in ChartKind::ALL {
            let table = Arc::clone(&table);
            let ctx = Arc::clone(&ctx);
            let dir = output_dir.to_path_buf();
            tasks.push((
                kind,
                tokio::task::spawn_blocking(move || render_and_save(kind, &table, &ctx, &dir)),
            ));
        }

        for (kind, task) in tasks {
            let outcome = task
                .await
                .map_err(|e| TxtStatsError::Render(format!("{kind} task did not complete: {e}")))
                .and_then(std::convert::identity);
            outcomes.push((kind, outcome));
        }
    } else {
        for kind in ChartKind::ALL {
            outcomes.push((kind, render_and_save(kind, &table, &ctx, output_dir)));
        }
    }

    collect_outcomes(outcomes)
}

fn collect_outcomes(outcomes: Vec<(ChartKind, Result<PathBuf>)>) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(outcomes.len());
    let mut failed = Vec::new();

    for (kind, outcome) in outcomes {
        match outcome {
            Ok(path) => {
                info!(chart = %kind, path = %path.display(), "Chart written");
                written.push(path);
            }
            Err(err) => {
                error!(chart = %kind, error = %err, "Chart failed");
                failed.push(kind.to_string());
            }
        }
    }

    if failed.is_empty() {
        Ok(written)
    } else {
        Err(TxtStatsError::ChartsFailed(failed.join(", ")))
    }
}
