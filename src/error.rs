//! Error types for the txt-stats library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages across both pipeline stages.

use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Errors that can occur while extracting or charting a message history.
#[derive(Error, Debug)]
pub enum TxtStatsError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The message store does not exist at the given path
    #[error("Message store not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Neither participant handle matched a usable message
    #[error("No text messages found for handles {first} and {second}")]
    NoMessages {
        /// First participant handle
        first: i64,
        /// Second participant handle
        second: i64,
    },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// PNG encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration loaded but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid command-line or caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unrecognized chart style name
    #[error("Unknown chart style '{name}'. Available styles: {available}")]
    InvalidStyle {
        /// Name that was requested
        name: String,
        /// Comma-separated list of recognized names
        available: String,
    },

    /// Timestamp outside the representable range
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The interchange file lacks required columns
    #[error("Input file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The loaded table holds no rows
    #[error("No messages to chart in {0}")]
    EmptyDataset(String),

    /// Chart drawing failed
    #[error("Render error: {0}")]
    Render(String),

    /// No usable font for chart text
    #[error("Font error: {0}")]
    Font(String),

    /// One or more charts failed during a render run
    #[error("Chart rendering failed for: {0}")]
    ChartsFailed(String),
}

/// Convenience type alias for Result with TxtStatsError
pub type Result<T> = std::result::Result<T, TxtStatsError>;

impl<E> From<DrawingAreaErrorKind<E>> for TxtStatsError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Render(err.to_string())
    }
}
