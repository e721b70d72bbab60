//! Engine configuration.

use std::path::PathBuf;

use reelcast_models::DEFAULT_DURATION_SECS;

/// Asset directories and production defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Background video templates, with an optional `config.json`
    pub templates_dir: PathBuf,
    /// Music tracks
    pub music_dir: PathBuf,
    /// Caption fonts
    pub fonts_dir: PathBuf,
    /// Where finished reels land
    pub output_dir: PathBuf,
    /// Duration used when a request does not specify one
    pub default_duration_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("assets/templates"),
            music_dir: PathBuf::from("assets/music"),
            fonts_dir: PathBuf::from("assets/fonts"),
            output_dir: PathBuf::from("output"),
            default_duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            templates_dir: std::env::var("REELCAST_TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.templates_dir),
            music_dir: std::env::var("REELCAST_MUSIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.music_dir),
            fonts_dir: std::env::var("REELCAST_FONTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.fonts_dir),
            output_dir: std::env::var("REELCAST_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            default_duration_secs: std::env::var("REELCAST_DEFAULT_DURATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DURATION_SECS),
        }
    }
}
