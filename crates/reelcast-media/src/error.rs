//! Error types for media operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during composition.
///
/// None of these are retried internally; they carry enough detail for the
/// caller to decide.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("Media source unavailable: {path}: {message}")]
    MediaSource { path: PathBuf, message: String },

    #[error("Invalid media: {path}: {message}")]
    InvalidMedia { path: PathBuf, message: String },

    #[error("Encoding failed: {message}")]
    Encode {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a media source error.
    pub fn media_source(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::MediaSource {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an invalid media error.
    pub fn invalid_media(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::InvalidMedia {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an encoding error.
    pub fn encode(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::Encode {
            message: message.into(),
            stderr,
            exit_code,
        }
    }
}
