//! Asset library: background templates, music tracks and per-template
//! render configuration.
//!
//! Directories are scanned once at construction. Empty directories are
//! tolerated until something tries to pick from them; a malformed
//! `config.json` fails the scan outright.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rand::prelude::IndexedRandom;
use tracing::{debug, info, warn};

use reelcast_models::RenderConfig;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Accepted background template extensions.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov"];
/// Accepted music track extensions.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a"];
/// Per-template render configuration, keyed by template file name. Lives
/// inside the templates directory.
const RENDER_CONFIG_FILE: &str = "config.json";

/// Scanned production assets.
#[derive(Debug)]
pub struct AssetLibrary {
    templates: Vec<PathBuf>,
    music: Vec<PathBuf>,
    render_configs: HashMap<String, RenderConfig>,
    fonts_dir: PathBuf,
}

impl AssetLibrary {
    /// Scan the configured asset directories.
    pub fn scan(config: &EngineConfig) -> EngineResult<Self> {
        let templates = files_with_extensions(&config.templates_dir, VIDEO_EXTENSIONS);
        let music = files_with_extensions(&config.music_dir, AUDIO_EXTENSIONS);
        let render_configs = load_render_configs(&config.templates_dir)?;

        info!(
            templates = templates.len(),
            tracks = music.len(),
            configured = render_configs.len(),
            "asset library scanned"
        );

        Ok(Self {
            templates,
            music,
            render_configs,
            fonts_dir: config.fonts_dir.clone(),
        })
    }

    /// Pick a random background template.
    pub fn pick_template(&self) -> EngineResult<&Path> {
        self.templates
            .choose(&mut rand::rng())
            .map(PathBuf::as_path)
            .ok_or_else(|| EngineError::assets("no video templates found"))
    }

    /// Pick a random music track.
    pub fn pick_music(&self) -> EngineResult<&Path> {
        self.music
            .choose(&mut rand::rng())
            .map(PathBuf::as_path)
            .ok_or_else(|| EngineError::assets("no music tracks found"))
    }

    /// Render configuration for a template file name, if one is configured.
    pub fn render_config_for(&self, template_name: &str) -> Option<&RenderConfig> {
        self.render_configs.get(template_name)
    }

    pub fn fonts_dir(&self) -> &Path {
        &self.fonts_dir
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn music_count(&self) -> usize {
        self.music.len()
    }
}

/// Regular files under `dir` with one of the given extensions, sorted for
/// stable iteration.
fn files_with_extensions(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "asset directory not readable");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

fn load_render_configs(templates_dir: &Path) -> EngineResult<HashMap<String, RenderConfig>> {
    let path = templates_dir.join(RENDER_CONFIG_FILE);
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let raw = fs::read_to_string(&path)?;
    let configs: HashMap<String, RenderConfig> = serde_json::from_str(&raw)
        .map_err(|e| EngineError::config(format!("invalid {}: {e}", path.display())))?;
    debug!(templates = configs.len(), "per-template render config loaded");
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(templates: &Path, music: &Path) -> EngineConfig {
        EngineConfig {
            templates_dir: templates.to_path_buf(),
            music_dir: music.to_path_buf(),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_empty_library_fails_at_pick_time() {
        let dir = tempfile::tempdir().unwrap();
        let library = AssetLibrary::scan(&config_with(dir.path(), dir.path())).unwrap();
        assert!(matches!(
            library.pick_template(),
            Err(EngineError::Assets(_))
        ));
        assert!(matches!(library.pick_music(), Err(EngineError::Assets(_))));
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["beach.mp4", "city.MOV", "notes.txt", "track.mp3", "b.wav"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let library = AssetLibrary::scan(&config_with(dir.path(), dir.path())).unwrap();
        assert_eq!(library.template_count(), 2);
        assert_eq!(library.music_count(), 2);

        let picked = library.pick_template().unwrap();
        let name = picked.file_name().unwrap().to_str().unwrap();
        assert!(name == "beach.mp4" || name == "city.MOV");
    }

    #[test]
    fn test_render_config_lookup() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("beach.mp4"), b"x").unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"beach.mp4": {"font_size": 48, "alignment": "left"}}"#,
        )
        .unwrap();

        let library = AssetLibrary::scan(&config_with(dir.path(), dir.path())).unwrap();
        let config = library.render_config_for("beach.mp4").unwrap();
        assert_eq!(config.font_size, 48);
        assert!(library.render_config_for("city.mp4").is_none());
    }

    #[test]
    fn test_malformed_config_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), b"{not json").unwrap();

        let err = AssetLibrary::scan(&config_with(dir.path(), dir.path())).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_missing_config_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let library = AssetLibrary::scan(&config_with(dir.path(), dir.path())).unwrap();
        assert!(library.render_config_for("beach.mp4").is_none());
    }
}
