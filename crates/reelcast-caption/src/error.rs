//! Error types for caption operations.
//!
//! Font resolution recovers from all of these internally; they surface only
//! from the lower-level loading helpers.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for caption operations.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Errors that can occur while loading fonts.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Failed to read font file {path}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse font file {path}: {message}")]
    FontParse { path: PathBuf, message: String },
}

impl CaptionError {
    /// Create a font parse error.
    pub fn font_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::FontParse {
            path: path.into(),
            message: message.into(),
        }
    }
}
