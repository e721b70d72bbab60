//! Engine error types.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Asset error: {0}")]
    Assets(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Caption source failed: {0}")]
    CaptionSource(String),

    #[error("Invalid reel request: {0}")]
    Spec(#[from] reelcast_models::ReelSpecError),

    #[error("Caption error: {0}")]
    Caption(#[from] reelcast_caption::CaptionError),

    #[error("Media error: {0}")]
    Media(#[from] reelcast_media::MediaError),

    #[error("Upload error: {0}")]
    Upload(#[from] reelcast_publish::UploadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn assets(msg: impl Into<String>) -> Self {
        Self::Assets(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn caption_source(msg: impl Into<String>) -> Self {
        Self::CaptionSource(msg.into())
    }
}
