//! Font resolution with ordered fallback.
//!
//! Resolution never fails: strategies are tried in sequence (configured
//! weight variant, configured base font, random asset, system face) and
//! each miss logs a warning and moves on. When everything is exhausted the
//! returned handle measures zero and draws nothing, so rendering still
//! succeeds with a blank text layer.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontdue::{Font, FontSettings, Metrics};
use rand::prelude::IndexedRandom;
use tracing::{debug, warn};

use crate::error::{CaptionError, CaptionResult};
use reelcast_models::FontWeight;

/// File extensions recognized as loadable fonts.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// Directories scanned for a last-resort face when the fonts directory
/// has nothing usable.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// How deep the system font scan descends below each root.
const SYSTEM_SCAN_DEPTH: u32 = 3;

// =============================================================================
// Resolved font handle
// =============================================================================

/// Where a resolved font came from, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontOrigin {
    /// Weight-variant file derived from the configured font name.
    WeightVariant(PathBuf),
    /// The configured base font file.
    Configured(PathBuf),
    /// Random pick from the fonts directory.
    RandomAsset(PathBuf),
    /// Last-resort face found on the host system.
    System(PathBuf),
    /// Nothing usable anywhere; the handle measures zero and draws nothing.
    Missing,
}

impl fmt::Display for FontOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontOrigin::WeightVariant(p) => write!(f, "weight variant {}", p.display()),
            FontOrigin::Configured(p) => write!(f, "configured font {}", p.display()),
            FontOrigin::RandomAsset(p) => write!(f, "random asset {}", p.display()),
            FontOrigin::System(p) => write!(f, "system font {}", p.display()),
            FontOrigin::Missing => write!(f, "missing"),
        }
    }
}

/// A font handle the layout engine and renderer can always work with.
#[derive(Clone)]
pub struct ResolvedFont {
    font: Option<Arc<Font>>,
    origin: FontOrigin,
}

impl ResolvedFont {
    /// Wrap a parsed face.
    pub fn from_font(font: Font, origin: FontOrigin) -> Self {
        Self {
            font: Some(Arc::new(font)),
            origin,
        }
    }

    /// The degenerate handle used when no font exists at all.
    pub fn missing() -> Self {
        Self {
            font: None,
            origin: FontOrigin::Missing,
        }
    }

    pub fn origin(&self) -> &FontOrigin {
        &self.origin
    }

    pub fn is_missing(&self) -> bool {
        self.font.is_none()
    }

    /// Glyph metrics at the given pixel size, if a face is loaded.
    pub fn metrics(&self, ch: char, px: f32) -> Option<Metrics> {
        self.font.as_ref().map(|f| f.metrics(ch, px))
    }

    /// Rasterize one glyph to an alpha coverage bitmap.
    pub fn rasterize(&self, ch: char, px: f32) -> Option<(Metrics, Vec<u8>)> {
        self.font.as_ref().map(|f| f.rasterize(ch, px))
    }
}

impl fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("origin", &self.origin)
            .field("loaded", &self.font.is_some())
            .finish()
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves a usable font for a render request.
#[derive(Debug, Clone)]
pub struct FontResolver {
    fonts_dir: PathBuf,
}

impl FontResolver {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
        }
    }

    pub fn fonts_dir(&self) -> &Path {
        &self.fonts_dir
    }

    /// Resolve a font for the given name and weight.
    ///
    /// Always returns a handle; see the module docs for the fallback order.
    pub fn resolve(&self, font_name: Option<&str>, weight: &FontWeight) -> ResolvedFont {
        if let Some(name) = font_name {
            // Weight variants replace the name's suffix with the weight
            // token; regular uses the base name verbatim.
            if !weight.is_regular() {
                let variant = variant_file_name(name, weight);
                let path = self.fonts_dir.join(&variant);
                match load_font_file(&path) {
                    Ok(font) => {
                        debug!(font = %path.display(), "Loaded weight variant font");
                        return ResolvedFont::from_font(font, FontOrigin::WeightVariant(path));
                    }
                    Err(err) => {
                        warn!(
                            variant = variant.as_str(),
                            base = name,
                            error = %err,
                            "Weight variant unavailable, using base font"
                        );
                    }
                }
            }

            let path = self.fonts_dir.join(name);
            match load_font_file(&path) {
                Ok(font) => {
                    debug!(font = %path.display(), "Loaded configured font");
                    return ResolvedFont::from_font(font, FontOrigin::Configured(path));
                }
                Err(err) => {
                    warn!(font = name, error = %err, "Configured font unavailable");
                }
            }
        }

        // No usable configured font: pick one of the font assets at random.
        let candidates = font_files(&self.fonts_dir);
        if let Some(path) = candidates.choose(&mut rand::rng()) {
            match load_font_file(path) {
                Ok(font) => {
                    debug!(font = %path.display(), "Loaded random asset font");
                    return ResolvedFont::from_font(font, FontOrigin::RandomAsset(path.clone()));
                }
                Err(err) => {
                    warn!(font = %path.display(), error = %err, "Random asset font unusable");
                }
            }
        } else {
            warn!(
                dir = %self.fonts_dir.display(),
                "No font assets available, trying system fonts"
            );
        }

        if let Some(path) = find_system_font() {
            match load_font_file(&path) {
                Ok(font) => {
                    warn!(font = %path.display(), "Falling back to a system font");
                    return ResolvedFont::from_font(font, FontOrigin::System(path));
                }
                Err(err) => {
                    warn!(font = %path.display(), error = %err, "System font unusable");
                }
            }
        }

        warn!("No usable font found anywhere, captions will be blank");
        ResolvedFont::missing()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Derive the weight-variant file name from a base font name.
///
/// "Roboto.ttf" + semibold -> "Roboto-SemiBold.ttf"; a name that already
/// carries a suffix ("Roboto-Regular.ttf") has it replaced.
pub fn variant_file_name(font_name: &str, weight: &FontWeight) -> String {
    let base = if font_name.contains('-') {
        font_name.rsplit_once('-').map(|(b, _)| b).unwrap_or(font_name)
    } else {
        font_name.rsplit_once('.').map(|(b, _)| b).unwrap_or(font_name)
    };
    let ext = font_name.rsplit_once('.').map(|(_, e)| e).unwrap_or("ttf");
    format!("{}-{}.{}", base, weight.variant_token(), ext)
}

/// Read and parse a font file.
pub fn load_font_file(path: &Path) -> CaptionResult<Font> {
    let bytes = fs::read(path).map_err(|source| CaptionError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    Font::from_bytes(bytes, FontSettings::default())
        .map_err(|message| CaptionError::font_parse(path, message))
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FONT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// All font files directly inside a directory.
pub fn font_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_font_file(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// First parseable face under the well-known system font directories.
pub fn find_system_font() -> Option<PathBuf> {
    for dir in SYSTEM_FONT_DIRS {
        if let Some(path) = find_font_under(Path::new(dir), SYSTEM_SCAN_DEPTH) {
            return Some(path);
        }
    }
    None
}

fn find_font_under(dir: &Path, depth: u32) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if is_font_file(&path) && load_font_file(&path).is_ok() {
            return Some(path);
        }
    }
    if depth > 0 {
        subdirs.sort();
        for sub in subdirs {
            if let Some(found) = find_font_under(&sub, depth - 1) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_variant_file_name() {
        assert_eq!(
            variant_file_name("Roboto.ttf", &FontWeight::Bold),
            "Roboto-Bold.ttf"
        );
        assert_eq!(
            variant_file_name("Roboto-Regular.ttf", &FontWeight::SemiBold),
            "Roboto-SemiBold.ttf"
        );
        assert_eq!(
            variant_file_name("Roboto", &FontWeight::ExtraBold),
            "Roboto-ExtraBold.ttf"
        );
        assert_eq!(
            variant_file_name("Open-Sans-Regular.otf", &FontWeight::Light),
            "Open-Sans-Light.otf"
        );
        // Unknown weights title-case verbatim
        assert_eq!(
            variant_file_name("Roboto.ttf", &FontWeight::Custom("black".to_string())),
            "Roboto-Black.ttf"
        );
    }

    #[test]
    fn test_resolve_never_fails_with_empty_dir() {
        let dir = TempDir::new().unwrap();
        let resolver = FontResolver::new(dir.path());
        let font = resolver.resolve(None, &FontWeight::Regular);
        // Either a system face was found or the degenerate handle came back;
        // resolution must not panic or error in either case.
        assert!(matches!(
            font.origin(),
            FontOrigin::System(_) | FontOrigin::Missing
        ));
    }

    #[test]
    fn test_resolve_skips_unparseable_asset() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.ttf"), b"not a font").unwrap();
        let resolver = FontResolver::new(dir.path());
        let font = resolver.resolve(None, &FontWeight::Regular);
        assert!(!matches!(
            font.origin(),
            FontOrigin::RandomAsset(_) | FontOrigin::Configured(_)
        ));
    }

    #[test]
    fn test_resolve_prefers_weight_variant() {
        let Some(system) = find_system_font() else {
            eprintln!("no system font available, skipping");
            return;
        };
        let bytes = std::fs::read(system).unwrap();

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Test.ttf"), &bytes).unwrap();
        std::fs::write(dir.path().join("Test-Bold.ttf"), &bytes).unwrap();

        let resolver = FontResolver::new(dir.path());
        let font = resolver.resolve(Some("Test.ttf"), &FontWeight::Bold);
        match font.origin() {
            FontOrigin::WeightVariant(path) => {
                assert!(path.ends_with("Test-Bold.ttf"));
            }
            other => panic!("expected weight variant, got {}", other),
        }
    }

    #[test]
    fn test_resolve_falls_back_to_base_when_variant_missing() {
        let Some(system) = find_system_font() else {
            eprintln!("no system font available, skipping");
            return;
        };
        let bytes = std::fs::read(system).unwrap();

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Test.ttf"), &bytes).unwrap();

        let resolver = FontResolver::new(dir.path());
        let font = resolver.resolve(Some("Test.ttf"), &FontWeight::Bold);
        assert!(matches!(font.origin(), FontOrigin::Configured(_)));
    }

    #[test]
    fn test_missing_handle_measures_nothing() {
        let font = ResolvedFont::missing();
        assert!(font.is_missing());
        assert!(font.metrics('a', 32.0).is_none());
        assert!(font.rasterize('a', 32.0).is_none());
    }
}
