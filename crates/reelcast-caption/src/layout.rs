//! Greedy word-wrap with pixel-accurate measurement and auto-fit.

use tracing::debug;

use crate::font::ResolvedFont;

/// Smallest font size the auto-fit loop will shrink to.
pub const FONT_SIZE_FLOOR: u32 = 16;
/// Step the auto-fit loop shrinks by.
pub const FONT_SIZE_STEP: u32 = 4;

/// One wrapped caption line.
#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    /// Rendered pixel width.
    pub width: f32,
    /// Glyph bounding-box height plus the line spacing term.
    pub height: f32,
}

/// Result of wrapping and measuring a text against an area.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub lines: Vec<Line>,
    /// Sum of all line heights.
    pub total_height: f32,
    /// Font size actually used (the auto-fit loop may have shrunk it).
    pub font_size: u32,
}

fn line_spacing(font_size: u32) -> f32 {
    ((font_size as f32 * 0.3) as u32).max(8) as f32
}

/// Measure a single line: summed advance width and tight bbox height.
pub fn measure_line(font: &ResolvedFont, text: &str, px: f32) -> (f32, f32) {
    let mut width = 0.0f32;
    let mut max_ascent = 0i32;
    let mut max_descent = 0i32;
    for ch in text.chars() {
        if let Some(m) = font.metrics(ch, px) {
            let ascent = m.height as i32 + m.ymin;
            let descent = -m.ymin;
            max_ascent = max_ascent.max(ascent);
            max_descent = max_descent.max(descent);
            width += m.advance_width;
        }
    }
    (width, (max_ascent + max_descent).max(0) as f32)
}

/// Greedy word-wrap against `area_width`.
///
/// Words accumulate into the current line while its measured width stays
/// within the area; on overflow the line is closed and the overflowing word
/// starts the next one. A single word wider than the area is still placed
/// alone, never split.
pub fn wrap_and_measure(
    font: &ResolvedFont,
    text: &str,
    font_size: u32,
    area_width: u32,
) -> LayoutResult {
    let px = font_size as f32;
    let mut raw_lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        let (width, _) = measure_line(font, &candidate, px);
        if width <= area_width as f32 {
            current = candidate;
        } else {
            if !current.is_empty() {
                raw_lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        raw_lines.push(current);
    }

    let spacing = line_spacing(font_size);
    let mut lines = Vec::with_capacity(raw_lines.len());
    let mut total_height = 0.0f32;
    for text in raw_lines {
        let (width, height) = measure_line(font, &text, px);
        let height = height + spacing;
        total_height += height;
        lines.push(Line {
            text,
            width,
            height,
        });
    }

    LayoutResult {
        lines,
        total_height,
        font_size,
    }
}

/// Wrap and measure, shrinking the font size until the block fits the area
/// height or the floor is reached.
///
/// A requested size at or below the floor is used as-is. Past the floor the
/// overflowing layout is accepted.
pub fn layout_fitting(
    font: &ResolvedFont,
    text: &str,
    font_size: u32,
    area_width: u32,
    area_height: u32,
) -> LayoutResult {
    let requested = font_size;
    let mut size = font_size;
    let mut layout = wrap_and_measure(font, text, size, area_width);

    while layout.total_height > area_height as f32 && size > FONT_SIZE_FLOOR {
        size = (size - FONT_SIZE_STEP).max(FONT_SIZE_FLOOR);
        layout = wrap_and_measure(font, text, size, area_width);
    }

    if layout.font_size != requested {
        debug!(
            from = requested,
            to = layout.font_size,
            "Auto-scaled caption font to fit text area"
        );
    }
    layout
}
