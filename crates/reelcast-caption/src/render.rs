//! Caption rasterization onto a transparent RGBA layer.
//!
//! The output buffer always matches the requested canvas size. Empty text
//! yields a fully transparent layer; a missing font yields blank text but
//! never an error.

use image::{Pixel, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::font::{FontResolver, ResolvedFont};
use crate::layout::layout_fitting;
use reelcast_models::{Alignment, RenderConfig};

/// Shadow pass offset in pixels.
const SHADOW_OFFSET: (i32, i32) = (3, 3);
/// Vertical padding of the backing box drawn when no text area is set.
const BOX_PADDING: i32 = 50;
/// Horizontal margin of the backing box from each canvas edge.
const BOX_MARGIN: u32 = 80;
/// Backing box fill.
const BOX_FILL: Rgba<u8> = Rgba([0, 0, 0, 200]);

/// Rasterizes caption text onto a transparent layer.
#[derive(Debug, Clone)]
pub struct CaptionRenderer {
    resolver: FontResolver,
}

impl CaptionRenderer {
    pub fn new(fonts_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            resolver: FontResolver::new(fonts_dir),
        }
    }

    pub fn resolver(&self) -> &FontResolver {
        &self.resolver
    }

    /// Render `text` onto a transparent `width` x `height` canvas.
    ///
    /// Without an explicit text area the block is centered on the full
    /// canvas and backed by a semi-opaque box for legibility. Lines are
    /// drawn shadow-first, then fill.
    pub fn render(
        &self,
        text: &str,
        width: u32,
        height: u32,
        config: Option<&RenderConfig>,
    ) -> RgbaImage {
        let cfg = config.cloned().unwrap_or_default();
        let mut canvas = RgbaImage::new(width, height);

        let (mut area_x, mut area_y, area_w, area_h) = match cfg.text_area {
            Some(area) => (area.x, area.y, area.width, area.height),
            None => (0, 0, width, height),
        };
        area_x += cfg.padding;
        area_y += cfg.padding;
        let area_w = area_w.saturating_sub(cfg.padding * 2);
        let area_h = area_h.saturating_sub(cfg.padding * 2);

        let font = self.resolver.resolve(cfg.font.as_deref(), &cfg.font_weight);
        let layout = layout_fitting(&font, text, cfg.font_size, area_w, area_h);
        if layout.lines.is_empty() {
            return canvas;
        }

        debug!(
            lines = layout.lines.len(),
            font_size = layout.font_size,
            font = %font.origin(),
            "Rendering caption layer"
        );

        let total = layout.total_height.round() as i32;
        let start_y = if cfg.text_area.is_some() {
            area_y as i32 + (area_h as i32 - total).div_euclid(2)
        } else {
            (height as i32 - total).div_euclid(2)
        };

        if cfg.text_area.is_none() {
            draw_backing_box(&mut canvas, start_y, total);
        }

        let fill = parse_color(&cfg.color);
        let shadow = cfg.shadow_color.as_deref().map(parse_color);

        let px = layout.font_size as f32;
        let mut current_y = start_y as f32;
        for line in &layout.lines {
            let line_w = line.width.round() as i32;
            let x = match cfg.alignment {
                Alignment::Left => area_x as i32,
                Alignment::Center => area_x as i32 + (area_w as i32 - line_w).div_euclid(2),
                Alignment::Right => area_x as i32 + area_w as i32 - line_w,
            };
            let y = current_y.round() as i32;
            if let Some(shadow) = shadow {
                draw_line(
                    &mut canvas,
                    &font,
                    &line.text,
                    px,
                    x + SHADOW_OFFSET.0,
                    y + SHADOW_OFFSET.1,
                    shadow,
                );
            }
            draw_line(&mut canvas, &font, &line.text, px, x, y, fill);
            current_y += line.height;
        }

        canvas
    }
}

/// Semi-opaque rectangle behind full-canvas captions.
fn draw_backing_box(canvas: &mut RgbaImage, start_y: i32, block_height: i32) {
    let (width, height) = canvas.dimensions();
    if width <= BOX_MARGIN * 2 {
        return;
    }
    let top = (start_y - BOX_PADDING).max(0);
    let bottom = (start_y + block_height + BOX_PADDING).min(height as i32);
    for y in top..bottom {
        for x in BOX_MARGIN..(width - BOX_MARGIN) {
            canvas.put_pixel(x, y as u32, BOX_FILL);
        }
    }
}

/// Draw one line with its baseline at the line's tallest ascent.
fn draw_line(
    canvas: &mut RgbaImage,
    font: &ResolvedFont,
    text: &str,
    px: f32,
    x: i32,
    y: i32,
    color: Rgba<u8>,
) {
    let mut max_ascent = 0i32;
    for ch in text.chars() {
        if let Some(m) = font.metrics(ch, px) {
            max_ascent = max_ascent.max(m.height as i32 + m.ymin);
        }
    }

    let (canvas_w, canvas_h) = canvas.dimensions();
    let mut cursor = x as f32;
    for ch in text.chars() {
        if let Some((metrics, bitmap)) = font.rasterize(ch, px) {
            let glyph_x = (cursor + metrics.xmin as f32).round() as i32;
            let glyph_y = y + max_ascent - (metrics.height as i32 + metrics.ymin);

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage == 0 {
                        continue;
                    }
                    let px_x = glyph_x + gx as i32;
                    let px_y = glyph_y + gy as i32;
                    if px_x < 0 || px_x as u32 >= canvas_w || px_y < 0 || px_y as u32 >= canvas_h {
                        continue;
                    }
                    let alpha = (coverage as u16 * color[3] as u16 / 255) as u8;
                    let glyph_px = Rgba([color[0], color[1], color[2], alpha]);
                    canvas
                        .get_pixel_mut(px_x as u32, px_y as u32)
                        .blend(&glyph_px);
                }
            }
            cursor += metrics.advance_width;
        }
    }
}

/// Parse a color spec: "#rrggbb", "#rrggbbaa" or a named color.
///
/// Unknown specs fall back to white with a warning rather than failing the
/// render.
pub fn parse_color(spec: &str) -> Rgba<u8> {
    let s = spec.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if let Some(color) = parse_hex(hex) {
            return color;
        }
    }
    match s.to_lowercase().as_str() {
        "white" => Rgba([255, 255, 255, 255]),
        "black" => Rgba([0, 0, 0, 255]),
        "red" => Rgba([255, 0, 0, 255]),
        "green" => Rgba([0, 128, 0, 255]),
        "blue" => Rgba([0, 0, 255, 255]),
        "yellow" => Rgba([255, 255, 0, 255]),
        "orange" => Rgba([255, 165, 0, 255]),
        "purple" => Rgba([128, 0, 128, 255]),
        "pink" => Rgba([255, 192, 203, 255]),
        "gray" | "grey" => Rgba([128, 128, 128, 255]),
        "cyan" => Rgba([0, 255, 255, 255]),
        "magenta" => Rgba([255, 0, 255, 255]),
        _ => {
            warn!(color = s, "Unknown color spec, using white");
            Rgba([255, 255, 255, 255])
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(Rgba([
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
            255,
        ])),
        8 => Some(Rgba([
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
            u8::from_str_radix(&hex[6..8], 16).ok()?,
        ])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcast_models::TextArea;
    use tempfile::TempDir;

    fn renderer() -> (CaptionRenderer, TempDir) {
        let dir = TempDir::new().unwrap();
        (CaptionRenderer::new(dir.path()), dir)
    }

    fn ink_bounds(img: &RgbaImage) -> Option<(u32, u32)> {
        let mut min_x = None;
        let mut max_x = None;
        for (x, _, p) in img.enumerate_pixels() {
            if p[3] > 200 {
                min_x = Some(min_x.map_or(x, |m: u32| m.min(x)));
                max_x = Some(max_x.map_or(x, |m: u32| m.max(x)));
            }
        }
        Some((min_x?, max_x?))
    }

    #[test]
    fn test_output_dimensions_match_request() {
        let (renderer, _dir) = renderer();
        let img = renderer.render("hello world", 640, 480, None);
        assert_eq!(img.dimensions(), (640, 480));

        let config = RenderConfig::default().with_text_area(TextArea::new(10, 10, 200, 100));
        let img = renderer.render("hello world", 320, 240, Some(&config));
        assert_eq!(img.dimensions(), (320, 240));
    }

    #[test]
    fn test_empty_text_yields_blank_layer() {
        let (renderer, _dir) = renderer();
        let img = renderer.render("", 200, 200, None);
        assert!(img.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_backing_box_drawn_without_text_area() {
        let (renderer, _dir) = renderer();
        let img = renderer.render("a joke", 400, 400, None);
        // The box spans the vertical center with an 80px side margin
        assert!(img.get_pixel(200, 200)[3] >= 200);
        assert_eq!(img.get_pixel(10, 200)[3], 0);
    }

    #[test]
    fn test_no_backing_box_with_text_area() {
        let (renderer, _dir) = renderer();
        let config = RenderConfig::default().with_text_area(TextArea::new(100, 300, 200, 80));
        let img = renderer.render("a joke", 400, 400, Some(&config));
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(399, 399)[3], 0);
    }

    #[test]
    fn test_alignment_moves_ink() {
        let (renderer, _dir) = renderer();
        let area = TextArea::new(0, 0, 600, 200);

        let mut left_cfg = RenderConfig::default().with_text_area(area);
        left_cfg.alignment = Alignment::Left;
        let mut right_cfg = RenderConfig::default().with_text_area(area);
        right_cfg.alignment = Alignment::Right;

        let left = renderer.render("hi", 600, 200, Some(&left_cfg));
        let right = renderer.render("hi", 600, 200, Some(&right_cfg));

        let (Some((left_min, _)), Some((_, right_max))) =
            (ink_bounds(&left), ink_bounds(&right))
        else {
            eprintln!("no usable font on this host, skipping");
            return;
        };
        assert!(left_min < 300);
        assert!(right_max > 300);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("white"), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("BLACK"), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_color("#ff8000"), Rgba([255, 128, 0, 255]));
        assert_eq!(parse_color("#ff800080"), Rgba([255, 128, 0, 128]));
        // Unknown specs fall back to white
        assert_eq!(parse_color("chartreuse-ish"), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("#zz0000"), Rgba([255, 255, 255, 255]));
    }
}
