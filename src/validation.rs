use std::path::Path;

use crate::charts::ChartStyle;
use crate::error::{Result, TxtStatsError};
use crate::models::HandlePair;

/// Validation utilities for command-line input
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a participant handle: the store's numeric handle row id
    pub fn validate_handle_id(handle: &str) -> Result<i64> {
        let trimmed = handle.trim();
        if trimmed.is_empty() {
            return Err(TxtStatsError::InvalidInput("Handle id cannot be empty".to_string()));
        }

        let id: i64 = trimmed
            .parse()
            .map_err(|_| TxtStatsError::InvalidInput(format!("Handle id must be an integer, got '{trimmed}'")))?;

        if id < 0 {
            return Err(TxtStatsError::InvalidInput(format!("Handle id cannot be negative: {id}")));
        }

        Ok(id)
    }

    /// Validate both participant handles
    pub fn validate_handle_pair(first: &str, second: &str) -> Result<HandlePair> {
        let pair = HandlePair {
            first: Self::validate_handle_id(first)?,
            second: Self::validate_handle_id(second)?,
        };

        if pair.first == pair.second {
            tracing::warn!("Both handles are {}; extracting a single handle", pair.first);
        }

        Ok(pair)
    }

    /// Validate the message store path
    pub fn validate_source_db(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(TxtStatsError::SourceNotFound(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(TxtStatsError::InvalidInput(format!(
                "Message store path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Validate the interchange file handed to the renderer
    pub fn validate_input_csv(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(TxtStatsError::InvalidInput("CSV path cannot be empty".to_string()));
        }

        if !path.is_file() {
            return Err(TxtStatsError::InvalidInput(format!(
                "CSV file does not exist: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Validate an output file path: its directory must exist
    pub fn validate_output_file(path: &Path) -> Result<()> {
        if path.file_name().is_none() {
            return Err(TxtStatsError::InvalidInput(format!(
                "Output path has no file name: {}",
                path.display()
            )));
        }

        if path.is_dir() {
            return Err(TxtStatsError::InvalidInput(format!(
                "Output path is a directory: {}",
                path.display()
            )));
        }

        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(TxtStatsError::InvalidInput(
                format!("Output directory does not exist: {}", parent.display()),
            )),
            _ => Ok(()),
        }
    }

    /// Validate an output directory, creating it when missing
    pub fn ensure_output_dir(path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(TxtStatsError::InvalidInput(format!(
                "Output path is not a directory: {}",
                path.display()
            )));
        }

        std::fs::create_dir_all(path)?;
        Ok(())
    }

    /// Validate a chart style name
    pub fn validate_style(name: &str) -> Result<ChartStyle> {
        name.parse()
    }
}
