//! Caption render configuration.
//!
//! Templates carry an optional per-video configuration describing where and
//! how caption text is drawn. Absent fields fall back to the documented
//! defaults; an entirely absent configuration selects the full-frame
//! centered layout with a backing box behind the text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default font size in pixels when none is configured.
pub const DEFAULT_FONT_SIZE: u32 = 70;
/// Default padding subtracted from the text area on both axes.
pub const DEFAULT_PADDING: u32 = 0;
/// Default fill color.
pub const DEFAULT_TEXT_COLOR: &str = "white";
/// Default shadow color.
pub const DEFAULT_SHADOW_COLOR: &str = "black";

/// Pixel rectangle a caption is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TextArea {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Font weight variant requested by a template.
///
/// The set is open: weights outside the known list are preserved verbatim
/// and resolved by title-casing when deriving variant file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontWeight {
    Regular,
    Bold,
    SemiBold,
    Light,
    Medium,
    ExtraBold,
    Custom(String),
}

impl FontWeight {
    /// Token appended to a font family name to form the variant file name
    /// (e.g. "Roboto" + "SemiBold" -> "Roboto-SemiBold.ttf").
    pub fn variant_token(&self) -> String {
        match self {
            FontWeight::Regular => "Regular".to_string(),
            FontWeight::Bold => "Bold".to_string(),
            FontWeight::SemiBold => "SemiBold".to_string(),
            FontWeight::Light => "Light".to_string(),
            FontWeight::Medium => "Medium".to_string(),
            FontWeight::ExtraBold => "ExtraBold".to_string(),
            FontWeight::Custom(s) => title_case(s),
        }
    }

    /// Regular weight uses the base font file verbatim.
    pub fn is_regular(&self) -> bool {
        matches!(self, FontWeight::Regular)
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::Regular
    }
}

impl From<String> for FontWeight {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "regular" | "" => FontWeight::Regular,
            "bold" => FontWeight::Bold,
            "semibold" => FontWeight::SemiBold,
            "light" => FontWeight::Light,
            "medium" => FontWeight::Medium,
            "extrabold" => FontWeight::ExtraBold,
            _ => FontWeight::Custom(s),
        }
    }
}

impl From<FontWeight> for String {
    fn from(w: FontWeight) -> Self {
        match w {
            FontWeight::Regular => "regular".to_string(),
            FontWeight::Bold => "bold".to_string(),
            FontWeight::SemiBold => "semibold".to_string(),
            FontWeight::Light => "light".to_string(),
            FontWeight::Medium => "medium".to_string(),
            FontWeight::ExtraBold => "extrabold".to_string(),
            FontWeight::Custom(s) => s,
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from(self.clone()))
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Horizontal placement of each caption line.
///
/// Unrecognized values fall back to `Center` rather than failing the
/// whole configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

impl From<String> for Alignment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "left" => Alignment::Left,
            "right" => Alignment::Right,
            _ => Alignment::Center,
        }
    }
}

impl From<Alignment> for String {
    fn from(a: Alignment) -> Self {
        a.as_str().to_string()
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-template caption configuration.
///
/// Loaded from the templates directory's JSON map, keyed by video file
/// name. Immutable once constructed for a render call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Region the text is laid out in. Absent means the full canvas.
    #[serde(default)]
    pub text_area: Option<TextArea>,

    /// Requested font size in pixels; auto-fit may shrink it.
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Font file name inside the fonts directory (e.g. "Roboto.ttf").
    #[serde(default)]
    pub font: Option<String>,

    /// Weight variant used to derive the variant file name.
    #[serde(default)]
    pub font_weight: FontWeight,

    /// Horizontal line placement.
    #[serde(default)]
    pub alignment: Alignment,

    /// Fill color (named or "#rrggbb"/"#rrggbbaa").
    #[serde(default = "default_text_color")]
    pub color: String,

    /// Shadow color; explicit `null` disables the shadow pass.
    /// Older template maps used the key "shadow".
    #[serde(default = "default_shadow_color", alias = "shadow")]
    pub shadow_color: Option<String>,

    /// Padding subtracted from the text area on both axes.
    #[serde(default = "default_padding")]
    pub padding: u32,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}
fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}
fn default_shadow_color() -> Option<String> {
    Some(DEFAULT_SHADOW_COLOR.to_string())
}
fn default_padding() -> u32 {
    DEFAULT_PADDING
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            text_area: None,
            font_size: DEFAULT_FONT_SIZE,
            font: None,
            font_weight: FontWeight::Regular,
            alignment: Alignment::Center,
            color: DEFAULT_TEXT_COLOR.to_string(),
            shadow_color: Some(DEFAULT_SHADOW_COLOR.to_string()),
            padding: DEFAULT_PADDING,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new config with an explicit text area.
    pub fn with_text_area(mut self, area: TextArea) -> Self {
        self.text_area = Some(area);
        self
    }

    /// Returns a new config with the given font size.
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    /// Returns a new config with the shadow pass disabled.
    pub fn without_shadow(mut self) -> Self {
        self.shadow_color = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_from_string() {
        assert_eq!(FontWeight::from("bold".to_string()), FontWeight::Bold);
        assert_eq!(FontWeight::from("SEMIBOLD".to_string()), FontWeight::SemiBold);
        assert_eq!(
            FontWeight::from("black".to_string()),
            FontWeight::Custom("black".to_string())
        );
    }

    #[test]
    fn test_font_weight_variant_token() {
        assert_eq!(FontWeight::SemiBold.variant_token(), "SemiBold");
        assert_eq!(FontWeight::ExtraBold.variant_token(), "ExtraBold");
        // Unknown weights are title-cased verbatim
        assert_eq!(
            FontWeight::Custom("black".to_string()).variant_token(),
            "Black"
        );
        assert_eq!(
            FontWeight::Custom("extra black".to_string()).variant_token(),
            "Extra Black"
        );
    }

    #[test]
    fn test_alignment_fallback_to_center() {
        assert_eq!(Alignment::from("left".to_string()), Alignment::Left);
        assert_eq!(Alignment::from("RIGHT".to_string()), Alignment::Right);
        assert_eq!(Alignment::from("justified".to_string()), Alignment::Center);
        assert_eq!(Alignment::from(String::new()), Alignment::Center);
    }

    #[test]
    fn test_render_config_defaults() {
        let config: RenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(config.alignment, Alignment::Center);
        assert_eq!(config.color, "white");
        assert_eq!(config.shadow_color.as_deref(), Some("black"));
        assert_eq!(config.padding, DEFAULT_PADDING);
        assert!(config.text_area.is_none());
    }

    #[test]
    fn test_render_config_full() {
        let json = r##"{
            "text_area": {"x": 90, "y": 200, "width": 900, "height": 400},
            "font_size": 64,
            "font": "Roboto.ttf",
            "font_weight": "semibold",
            "alignment": "left",
            "color": "#ffcc00",
            "shadow_color": null,
            "padding": 30
        }"##;
        let config: RenderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.text_area.unwrap().width, 900);
        assert_eq!(config.font_weight, FontWeight::SemiBold);
        assert_eq!(config.alignment, Alignment::Left);
        // Explicit null disables the shadow, unlike an absent field
        assert!(config.shadow_color.is_none());
        assert_eq!(config.padding, 30);
    }

    #[test]
    fn test_unknown_alignment_in_json_falls_back() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"alignment": "middle"}"#).unwrap();
        assert_eq!(config.alignment, Alignment::Center);
    }

    #[test]
    fn test_shadow_legacy_alias() {
        let config: RenderConfig =
            serde_json::from_str(r##"{"shadow": "#333333"}"##).unwrap();
        assert_eq!(config.shadow_color.as_deref(), Some("#333333"));
    }
}
