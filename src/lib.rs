//! Text Stats - Conversation Extraction and Charts
//!
//! A Rust library for pulling a two-person conversation out of an iMessage
//! store and summarizing it as a set of PNG charts.
//!
//! # Features
//!
//! - Extract one conversation from `chat.db` into a versioned CSV file
//! - Derive week, weekday, hour, length and word-count columns
//! - Render nine charts: volume, timing, length, vocabulary and sentiment
//! - Layered configuration and structured logging

/// Chart rendering
pub mod charts;
/// Configuration management
pub mod config;
/// Timestamp conversion and week buckets
pub mod dates;
/// Error types
pub mod error;
/// Conversation cleaning and derived columns
pub mod extract;
/// Interchange file reading and writing
pub mod file_io;
/// Logging setup and utilities
pub mod logging;
/// Data models and structures
pub mod models;
/// NLP processing
pub mod nlp;
/// Repository pattern for data access
pub mod repository;
/// Message store and interchange schema definitions
pub mod schema;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use charts::{ChartKind, ChartStyle, RenderContext};
pub use error::{Result, TxtStatsError};
pub use models::{HandlePair, MessageRecord, MessageTable, Party};
pub use nlp::NlpProcessor;
pub use repository::{ChatDbRepository, MessageRepository};
