//! Caption sources.
//!
//! The ideation layer (an LLM collaborator that turns a topic into joke
//! text) lives outside this repo behind this trait. Anything resilience
//! related, like repairing malformed model output, belongs in the
//! implementation, not here.

use async_trait::async_trait;

use crate::error::EngineResult;

/// Turns a topic into caption text.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn caption(&self, topic: &str) -> EngineResult<String>;
}

/// Caption source that always returns the same text. Covers direct-text
/// production and tests.
#[derive(Debug, Clone)]
pub struct FixedCaption(pub String);

#[async_trait]
impl CaptionSource for FixedCaption {
    async fn caption(&self, _topic: &str) -> EngineResult<String> {
        Ok(self.0.clone())
    }
}
