//! Reel generation requests.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Shortest reel the pipeline will produce, in seconds.
pub const MIN_DURATION_SECS: u32 = 5;
/// Longest reel the pipeline will produce, in seconds.
pub const MAX_DURATION_SECS: u32 = 60;
/// Duration used when the caller does not specify one.
pub const DEFAULT_DURATION_SECS: u32 = 15;

/// A single reel generation request.
///
/// Constructed per request and consumed once; the pipeline does not retain
/// it after the output file is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelSpec {
    /// Caption text drawn over the video.
    pub caption: String,
    /// Output file name (the caller owns collision avoidance).
    pub output_name: String,
    /// Target duration in seconds.
    pub duration_secs: u32,
    /// Background video source.
    pub video_path: PathBuf,
    /// Audio track source.
    pub audio_path: PathBuf,
}

impl ReelSpec {
    /// Create a validated reel request.
    pub fn new(
        caption: impl Into<String>,
        output_name: impl Into<String>,
        duration_secs: u32,
        video_path: impl Into<PathBuf>,
        audio_path: impl Into<PathBuf>,
    ) -> Result<Self, ReelSpecError> {
        let output_name = output_name.into();
        if output_name.trim().is_empty() {
            return Err(ReelSpecError::EmptyOutputName);
        }
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&duration_secs) {
            return Err(ReelSpecError::DurationOutOfRange(duration_secs));
        }
        Ok(Self {
            caption: caption.into(),
            output_name,
            duration_secs,
            video_path: video_path.into(),
            audio_path: audio_path.into(),
        })
    }

    /// Target duration as the float ffmpeg arguments expect.
    pub fn duration(&self) -> f64 {
        f64::from(self.duration_secs)
    }

    /// File name of the video template, used to key per-template render
    /// configuration.
    pub fn template_name(&self) -> Option<&str> {
        self.video_path.file_name().and_then(|n| n.to_str())
    }
}

#[derive(Debug, Error)]
pub enum ReelSpecError {
    #[error(
        "duration must be between {MIN_DURATION_SECS} and {MAX_DURATION_SECS} seconds, got {0}"
    )]
    DurationOutOfRange(u32),
    #[error("output name cannot be empty")]
    EmptyOutputName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_bounds() {
        assert!(ReelSpec::new("a joke", "out.mp4", 5, "v.mp4", "a.mp3").is_ok());
        assert!(ReelSpec::new("a joke", "out.mp4", 60, "v.mp4", "a.mp3").is_ok());
        assert!(matches!(
            ReelSpec::new("a joke", "out.mp4", 4, "v.mp4", "a.mp3"),
            Err(ReelSpecError::DurationOutOfRange(4))
        ));
        assert!(matches!(
            ReelSpec::new("a joke", "out.mp4", 61, "v.mp4", "a.mp3"),
            Err(ReelSpecError::DurationOutOfRange(61))
        ));
    }

    #[test]
    fn test_empty_output_name() {
        assert!(matches!(
            ReelSpec::new("a joke", "  ", 15, "v.mp4", "a.mp3"),
            Err(ReelSpecError::EmptyOutputName)
        ));
    }

    #[test]
    fn test_template_name() {
        let spec =
            ReelSpec::new("a joke", "out.mp4", 15, "/templates/beach.mp4", "a.mp3").unwrap();
        assert_eq!(spec.template_name(), Some("beach.mp4"));
    }
}
