//! Shared data models for the Reelcast pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Per-template caption render configuration
//! - Reel generation requests
//! - The fixed output format and encoding configuration
//! - Publish receipts

pub mod encoding;
pub mod publish;
pub mod reel;
pub mod render;

// Re-export common types
pub use encoding::{
    target_ratio, EncodingProfile, RATIO_TOLERANCE, REEL_FPS, REEL_HEIGHT, REEL_WIDTH,
};
pub use publish::PublishReceipt;
pub use reel::{
    ReelSpec, ReelSpecError, DEFAULT_DURATION_SECS, MAX_DURATION_SECS, MIN_DURATION_SECS,
};
pub use render::{Alignment, FontWeight, RenderConfig, TextArea};
