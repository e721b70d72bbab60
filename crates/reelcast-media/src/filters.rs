//! FFmpeg filter graphs for portrait reel framing.
//!
//! Every background clip ends up as a 1080x1920 frame. Sources already close
//! to 9:16 are scaled straight to the target; everything else is scaled to
//! full height and center-cropped before padding.

use reelcast_models::{target_ratio, RATIO_TOLERANCE};

/// Framing for sources far from 9:16: scale to full height, center-crop to
/// the target width, pad narrow sources back out. The crop width is clamped
/// so portrait-but-skinny inputs survive.
pub const FILTER_CROP_PORTRAIT: &str = concat!(
    "scale=-2:1920,",
    "crop=min(iw\\,1080):ih,",
    "pad=1080:1920:(ow-iw)/2:(oh-ih)/2"
);

/// Framing for sources already near 9:16: direct scale. Any distortion is
/// bounded by the ratio tolerance.
pub const FILTER_SCALE_PORTRAIT: &str = "scale=1080:1920";

/// Whether a source's aspect ratio is close enough to 9:16 to scale directly.
pub fn is_near_target(width: u32, height: u32) -> bool {
    if height == 0 {
        return false;
    }
    let ratio = f64::from(width) / f64::from(height);
    (ratio - target_ratio()).abs() <= RATIO_TOLERANCE
}

/// Pick the framing filter chain for a source of the given dimensions.
pub fn framing_filter(width: u32, height: u32) -> &'static str {
    if is_near_target(width, height) {
        FILTER_SCALE_PORTRAIT
    } else {
        FILTER_CROP_PORTRAIT
    }
}

/// Build the full filter graph for the mux pass: frame the background video
/// (input 0) to 1080x1920, then composite the caption image (input 1) on top.
pub fn caption_overlay_graph(source_width: u32, source_height: u32) -> String {
    format!(
        "[0:v]{}[base];[base][1:v]overlay=0:0:format=auto[outv]",
        framing_filter(source_width, source_height)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcast_models::{REEL_HEIGHT, REEL_WIDTH};

    #[test]
    fn test_is_near_target() {
        // Exact 9:16
        assert!(is_near_target(1080, 1920));
        // Within tolerance
        assert!(is_near_target(1000, 1920));
        // Landscape is far off
        assert!(!is_near_target(1920, 1080));
        // Square is far off
        assert!(!is_near_target(1080, 1080));
        // Degenerate height
        assert!(!is_near_target(1080, 0));
    }

    #[test]
    fn test_framing_filter_branches() {
        assert_eq!(framing_filter(1080, 1920), FILTER_SCALE_PORTRAIT);
        assert_eq!(framing_filter(1920, 1080), FILTER_CROP_PORTRAIT);
    }

    #[test]
    fn test_overlay_graph_landscape() {
        let graph = caption_overlay_graph(1920, 1080);
        assert!(graph.starts_with("[0:v]scale=-2:1920,"));
        assert!(graph.contains("crop=min(iw\\,1080):ih"));
        assert!(graph.contains("[base][1:v]overlay=0:0"));
        assert!(graph.ends_with("[outv]"));
    }

    #[test]
    fn test_overlay_graph_portrait() {
        let graph = caption_overlay_graph(1080, 1920);
        assert!(graph.contains("[0:v]scale=1080:1920[base]"));
        assert!(!graph.contains("crop"));
    }

    #[test]
    fn test_target_constants_drive_filters() {
        assert!(FILTER_SCALE_PORTRAIT.contains(&REEL_WIDTH.to_string()));
        assert!(FILTER_CROP_PORTRAIT.contains(&REEL_HEIGHT.to_string()));
    }
}
