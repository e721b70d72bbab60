//! Reel production engine.
//!
//! This crate provides:
//! - Asset library (background templates, music tracks, per-template
//!   render configuration)
//! - The production pipeline wiring caption rendering, composition and
//!   publishing together
//! - Caption sources for topic-driven production
//! - Engine configuration from the environment

pub mod assets;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;

pub use assets::AssetLibrary;
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use pipeline::{Pipeline, ProduceRequest};
pub use source::{CaptionSource, FixedCaption};
