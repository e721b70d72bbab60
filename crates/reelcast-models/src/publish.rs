//! Publish results.

use serde::{Deserialize, Serialize};

/// Proof of a successful publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Published media id assigned by the remote endpoint.
    pub media_id: String,
    /// Public permalink, when the endpoint returned one. Fetching it is
    /// best-effort; `None` does not mean the publish failed.
    pub permalink: Option<String>,
    /// Container the media was uploaded through.
    pub container_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_round_trips_without_permalink() {
        let receipt = PublishReceipt {
            media_id: "17900001".to_string(),
            permalink: None,
            container_id: "18000001".to_string(),
        };
        let json = serde_json::to_string(&receipt).unwrap();
        let back: PublishReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back.media_id, "17900001");
        assert!(back.permalink.is_none());
    }
}
