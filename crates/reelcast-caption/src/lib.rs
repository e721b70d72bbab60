//! Caption rendering for Reelcast.
//!
//! This crate provides:
//! - Font resolution with deterministic fallback (configured variant,
//!   base font, random asset, system face)
//! - Greedy pixel word-wrap with an auto-fit shrink loop
//! - RGBA caption rasterization with shadow, fill and alignment

pub mod error;
pub mod font;
pub mod layout;
pub mod render;

// Re-export common types
pub use error::{CaptionError, CaptionResult};
pub use font::{FontOrigin, FontResolver, ResolvedFont};
pub use layout::{
    layout_fitting, measure_line, wrap_and_measure, LayoutResult, Line, FONT_SIZE_FLOOR,
    FONT_SIZE_STEP,
};
pub use render::{parse_color, CaptionRenderer};
