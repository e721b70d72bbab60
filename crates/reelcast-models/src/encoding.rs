//! Output format constants and encoding configuration.
//!
//! Every reel is encoded to the same fixed target: vertical 1080x1920 mp4,
//! H.264 video, AAC audio, 24 fps.

use serde::{Deserialize, Serialize};

/// Output frame width.
pub const REEL_WIDTH: u32 = 1080;
/// Output frame height.
pub const REEL_HEIGHT: u32 = 1920;
/// Output frame rate.
pub const REEL_FPS: u32 = 24;
/// How far a source may deviate from 9:16 before it is cropped instead of
/// scaled directly.
pub const RATIO_TOLERANCE: f64 = 0.1;

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "fast";
/// Default CRF (Constant Rate Factor)
pub const DEFAULT_CRF: u8 = 23;
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";
/// Pixel format required by the publish endpoint's players
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";

/// The 9:16 target aspect ratio as a decimal.
pub fn target_ratio() -> f64 {
    f64::from(REEL_WIDTH) / f64::from(REEL_HEIGHT)
}

/// Encoder settings for the final mux pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingProfile {
    /// Video codec (e.g. "libx264")
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Encoding preset (e.g. "fast", "medium")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant Rate Factor (0-51, lower is better)
    #[serde(default = "default_crf")]
    pub crf: u8,

    /// Audio bitrate
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Pixel format
    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,

    /// Move the moov atom to the front for progressive playback.
    #[serde(default = "default_faststart")]
    pub faststart: bool,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_crf() -> u8 {
    DEFAULT_CRF
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}
fn default_pixel_format() -> String {
    DEFAULT_PIXEL_FORMAT.to_string()
}
fn default_faststart() -> bool {
    true
}

impl Default for EncodingProfile {
    fn default() -> Self {
        Self {
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            crf: DEFAULT_CRF,
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            pixel_format: DEFAULT_PIXEL_FORMAT.to_string(),
            faststart: true,
        }
    }
}

impl EncodingProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new profile with updated CRF.
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf;
        self
    }

    /// Returns a new profile with updated preset.
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }
}
