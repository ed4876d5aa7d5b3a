//! Logging setup and operation timing

use std::path::Path;

use tracing::info;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;
use crate::error::{Result, TxtStatsError};

/// Initialize structured logging system.
///
/// Console output goes to stderr, as plain text or JSON depending on
/// `logging.format`. When a log file is configured, a JSON copy of every
/// event is appended to a daily-rotated file next to it; the returned guard
/// must be held until the process exits or buffered lines are lost.
pub fn init_logging(settings: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| TxtStatsError::InvalidConfig(format!("Failed to create log filter: {e}")))?;

    let (json_console, text_console) = if settings.format == "json" {
        (Some(fmt::layer().with_writer(std::io::stderr).json()), None)
    } else {
        (
            None,
            Some(fmt::layer().with_writer(std::io::stderr).with_ansi(true).with_target(true)),
        )
    };

    let (file_layer, guard) = match settings.file_path.as_deref().map(Path::new) {
        Some(log_path) => {
            let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = log_path
                .file_name()
                .map_or_else(|| "txt-stats.log".into(), |name| name.to_string_lossy().into_owned());
            let (writer, guard) = non_blocking(rolling::daily(directory, file_name));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .json();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(env_filter)
        .with(text_console)
        .with(json_console)
        .with(file_layer)
        .try_init()
        .map_err(|e| TxtStatsError::InvalidConfig(format!("Failed to install logger: {e}")))?;

    info!(format = %settings.format, "Logging system initialized");
    Ok(guard)
}

/// Performance timing utilities
pub struct OperationTimer {
    operation: String,
    start: std::time::Instant,
}

impl OperationTimer {
    /// Start timing `operation`
    #[must_use]
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: std::time::Instant::now(),
        }
    }

    /// Log the elapsed time and return it in milliseconds
    pub fn finish(self) -> u128 {
        let duration = self.start.elapsed().as_millis();
        tracing::info!(
            operation = %self.operation,
            duration_ms = duration as u64,
            "Operation completed"
        );
        duration
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            let duration = self.start.elapsed().as_millis();
            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration as u64,
                "Operation finished"
            );
        }
    }
}
