//! Publisher configuration.

use std::time::Duration;

use crate::error::{UploadError, UploadResult};

/// Graph API base for container create, status, publish and permalink calls.
pub const GRAPH_BASE_URL: &str = "https://graph.facebook.com/v22.0";
/// Binary upload base.
pub const UPLOAD_BASE_URL: &str = "https://rupload.facebook.com/ig-api-upload";
/// Time between processing status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Status checks before giving up on processing.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;
/// Per-request timeout; the binary transfer is the slowest call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the publish client.
///
/// Both base URLs are overridable so tests can point the client at a local
/// mock server; the poll knobs exist for the same reason.
#[derive(Clone)]
pub struct PublisherConfig {
    /// Graph API base URL
    pub graph_base_url: String,
    /// Binary upload base URL
    pub upload_base_url: String,
    /// Account access token
    pub access_token: String,
    /// Account the reel is published under
    pub ig_user_id: String,
    /// Time between processing status checks
    pub poll_interval: Duration,
    /// Status checks before giving up
    pub poll_attempts: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            graph_base_url: GRAPH_BASE_URL.to_string(),
            upload_base_url: UPLOAD_BASE_URL.to_string(),
            access_token: String::new(),
            ig_user_id: String::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl PublisherConfig {
    /// Create a config with credentials and default endpoints.
    pub fn new(access_token: impl Into<String>, ig_user_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ig_user_id: ig_user_id.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> UploadResult<Self> {
        let access_token = std::env::var("INSTAGRAM_ACCESS_TOKEN")
            .map_err(|_| UploadError::config("INSTAGRAM_ACCESS_TOKEN must be set to publish"))?;
        if access_token.is_empty() {
            return Err(UploadError::config("INSTAGRAM_ACCESS_TOKEN cannot be empty"));
        }

        let ig_user_id = std::env::var("INSTAGRAM_BUSINESS_ACCOUNT_ID").map_err(|_| {
            UploadError::config("INSTAGRAM_BUSINESS_ACCOUNT_ID must be set to publish")
        })?;
        if ig_user_id.is_empty() {
            return Err(UploadError::config(
                "INSTAGRAM_BUSINESS_ACCOUNT_ID cannot be empty",
            ));
        }

        Ok(Self::new(access_token, ig_user_id))
    }

    /// Override the Graph API base URL.
    pub fn with_graph_base_url(mut self, url: impl Into<String>) -> Self {
        self.graph_base_url = url.into();
        self
    }

    /// Override the binary upload base URL.
    pub fn with_upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.upload_base_url = url.into();
        self
    }

    /// Override the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the poll attempt ceiling.
    pub fn with_poll_attempts(mut self, attempts: u32) -> Self {
        self.poll_attempts = attempts;
        self
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PublisherConfig::default();
        assert_eq!(config.graph_base_url, GRAPH_BASE_URL);
        assert_eq!(config.upload_base_url, UPLOAD_BASE_URL);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.poll_attempts, 60);
    }

    #[test]
    fn test_builders() {
        let config = PublisherConfig::new("token", "123")
            .with_graph_base_url("http://localhost:9000")
            .with_poll_interval(Duration::from_millis(1))
            .with_poll_attempts(3);
        assert_eq!(config.access_token, "token");
        assert_eq!(config.ig_user_id, "123");
        assert_eq!(config.graph_base_url, "http://localhost:9000");
        assert_eq!(config.poll_attempts, 3);
    }
}
