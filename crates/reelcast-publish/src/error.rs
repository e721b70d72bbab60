//! Publish error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type UploadResult<T> = Result<T, UploadError>;

/// Errors raised while moving a reel through the upload protocol.
///
/// Nothing here is retried internally; each variant carries the raw API
/// payload, status code or OS error the caller needs to decide.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported format: {0} (only .mp4 is accepted)")]
    UnsupportedFormat(PathBuf),

    #[error("Container creation failed: {api_response}")]
    ContainerCreation { api_response: String },

    #[error("File transfer rejected with status {status}: {body}")]
    FileTransfer { status: u16, body: String },

    #[error("Processing failed: {detail}")]
    Processing { detail: String },

    #[error("Upload container expired before processing finished")]
    ContainerExpired,

    #[error("Processing still not finished after {attempts} status checks")]
    ProcessingTimeout { attempts: u32 },

    #[error("Publish failed: {api_response}")]
    Publish { api_response: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Create a file-not-found error.
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::FileNotFound(path.as_ref().to_path_buf())
    }

    /// Create an unsupported-format error.
    pub fn unsupported_format(path: impl AsRef<Path>) -> Self {
        Self::UnsupportedFormat(path.as_ref().to_path_buf())
    }

    /// Create a container-creation error carrying the raw API payload.
    pub fn container_creation(api_response: impl Into<String>) -> Self {
        Self::ContainerCreation {
            api_response: api_response.into(),
        }
    }

    /// Create a processing error with the server-reported detail.
    pub fn processing(detail: impl Into<String>) -> Self {
        Self::Processing {
            detail: detail.into(),
        }
    }

    /// Create a publish error carrying the raw API payload.
    pub fn publish(api_response: impl Into<String>) -> Self {
        Self::Publish {
            api_response: api_response.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
