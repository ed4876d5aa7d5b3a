use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::dates::DisplayZone;
use crate::error::{Result, TxtStatsError};
use crate::nlp::EXTRA_STOPWORDS;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level, destination and format
    pub logging: LoggingConfig,
    /// Where the message store lives and how its clock is read
    pub imessage: IMessageConfig,
    /// Extractor output
    pub extract: ExtractConfig,
    /// Chart renderer settings
    pub charts: ChartsConfig,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset
    pub level: String,
    /// Optional log file; rotated daily
    pub file_path: Option<String>,
    /// "json" or "text"
    pub format: String,
}

/// Message store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IMessageConfig {
    /// Path to chat.db; empty means the platform default
    pub database_path: String,
    /// "utc" or "local"
    pub timezone: String,
}

/// Extractor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Where the enriched CSV is written
    pub output_path: String,
}

/// Chart renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Directory receiving the PNG files
    pub output_dir: String,
    /// TrueType font for chart text; empty means search the usual system locations
    pub font_path: String,
    /// Messages at or above this many characters are left out of the length histogram
    pub text_length_cap: usize,
    /// Messages at or above this many words are left out of the word-count histogram
    pub num_words_cap: usize,
    /// Bin count for both histograms
    pub histogram_bins: usize,
    /// Words dropped from word clouds on top of the English stopword list
    pub extra_stopwords: Vec<String>,
    /// Render the charts concurrently
    pub parallel: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            imessage: IMessageConfig {
                database_path: String::new(),
                timezone: "utc".to_string(),
            },
            extract: ExtractConfig {
                output_path: "messages.csv".to_string(),
            },
            charts: ChartsConfig {
                output_dir: ".".to_string(),
                font_path: String::new(),
                text_length_cap: 800,
                num_words_cap: 202,
                histogram_bins: 50,
                extra_stopwords: EXTRA_STOPWORDS.iter().map(ToString::to_string).collect(),
                parallel: true,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&Self::default())?)
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("txt-stats").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("TXT_STATS").separator("__").try_parsing(true))
            .build()?;

        let app_config: Self = config.try_deserialize()?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(TxtStatsError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                self.logging.level
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(TxtStatsError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {valid_formats:?}",
                self.logging.format
            )));
        }

        self.display_zone()?;

        if self.extract.output_path.trim().is_empty() {
            return Err(TxtStatsError::InvalidConfig("extract.output_path cannot be empty".to_string()));
        }

        if self.charts.histogram_bins == 0 {
            return Err(TxtStatsError::InvalidConfig("histogram_bins must be greater than 0".to_string()));
        }
        if self.charts.text_length_cap == 0 {
            return Err(TxtStatsError::InvalidConfig("text_length_cap must be greater than 0".to_string()));
        }
        if self.charts.num_words_cap == 0 {
            return Err(TxtStatsError::InvalidConfig("num_words_cap must be greater than 0".to_string()));
        }

        Ok(())
    }

    /// Get iMessage database path from environment or config.
    ///
    /// Returns `None` when neither is set, leaving the caller to fall back to
    /// the platform default.
    #[must_use]
    pub fn get_imessage_db_path(&self) -> Option<PathBuf> {
        std::env::var("IMESSAGE_DB_PATH")
            .ok()
            .or_else(|| Some(self.imessage.database_path.clone()))
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Clock used to turn stored timestamps into calendar times
    pub fn display_zone(&self) -> Result<DisplayZone> {
        self.imessage.timezone.parse()
    }

    /// Configured font path, if any
    #[must_use]
    pub fn font_path(&self) -> Option<PathBuf> {
        Some(self.charts.font_path.trim())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }
}
