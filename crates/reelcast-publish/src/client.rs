//! Graph API HTTP client.
//!
//! One thin method per protocol call. Responses are read as text first so
//! error variants can carry the raw payload.

use std::path::Path;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::PublisherConfig;
use crate::error::{UploadError, UploadResult};

/// Response envelope for calls that return an object id.
#[derive(Debug, Deserialize)]
struct IdResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status_code: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PermalinkResponse {
    permalink: Option<String>,
}

/// Container processing status as reported by the endpoint.
#[derive(Debug, Clone)]
pub struct ContainerStatus {
    /// Machine status code: FINISHED, ERROR, EXPIRED or an in-progress value
    pub code: String,
    /// Human-readable detail, when provided
    pub detail: Option<String>,
}

/// HTTP client for the publish endpoint.
pub struct GraphClient {
    http: Client,
    config: PublisherConfig,
}

impl GraphClient {
    /// Create a new client.
    pub fn new(config: PublisherConfig) -> UploadResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("reelcast/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Step 1: create a resumable upload container for a reel.
    ///
    /// Any response without an `id`, success or not, fails with the raw
    /// payload attached.
    pub async fn create_container(&self, caption: &str) -> UploadResult<String> {
        let url = format!(
            "{}/{}/media",
            self.config.graph_base_url, self.config.ig_user_id
        );
        let response = self
            .http
            .post(&url)
            .query(&[
                ("media_type", "REELS"),
                ("upload_type", "resumable"),
                ("caption", caption),
                ("access_token", self.config.access_token.as_str()),
            ])
            .send()
            .await?;

        let body = response.text().await?;
        let parsed: IdResponse = serde_json::from_str(&body).unwrap_or(IdResponse { id: None });
        match parsed.id {
            Some(id) => {
                debug!(container_id = %id, "upload container created");
                Ok(id)
            }
            None => Err(UploadError::container_creation(body)),
        }
    }

    /// Step 2: transfer the file bytes to the upload endpoint.
    ///
    /// Only offset 0 is used; a retried transfer starts over.
    pub async fn upload_file(&self, container_id: &str, path: &Path) -> UploadResult<()> {
        let bytes = tokio::fs::read(path).await?;
        let file_size = bytes.len();

        let url = format!("{}/{}", self.config.upload_base_url, container_id);
        let response = self
            .http
            .post(&url)
            .header(
                "Authorization",
                format!("OAuth {}", self.config.access_token),
            )
            .header("offset", "0")
            .header("file_size", file_size.to_string())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::FileTransfer {
                status: status.as_u16(),
                body,
            });
        }

        debug!(container_id, file_size, "file transferred");
        Ok(())
    }

    /// Step 3 primitive: one processing status check.
    pub async fn container_status(&self, container_id: &str) -> UploadResult<ContainerStatus> {
        let url = format!("{}/{}", self.config.graph_base_url, container_id);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("fields", "status_code,status"),
                ("access_token", self.config.access_token.as_str()),
            ])
            .send()
            .await?;

        let parsed: StatusResponse = response.json().await?;
        Ok(ContainerStatus {
            code: parsed.status_code.unwrap_or_default(),
            detail: parsed.status,
        })
    }

    /// Step 4: publish a processed container.
    pub async fn publish(&self, container_id: &str) -> UploadResult<String> {
        let url = format!(
            "{}/{}/media_publish",
            self.config.graph_base_url, self.config.ig_user_id
        );
        let response = self
            .http
            .post(&url)
            .query(&[
                ("creation_id", container_id),
                ("access_token", self.config.access_token.as_str()),
            ])
            .send()
            .await?;

        let body = response.text().await?;
        let parsed: IdResponse = serde_json::from_str(&body).unwrap_or(IdResponse { id: None });
        match parsed.id {
            Some(id) => {
                debug!(media_id = %id, "reel published");
                Ok(id)
            }
            None => Err(UploadError::publish(body)),
        }
    }

    /// Permalink of a published media object.
    ///
    /// A response without one (or a server error) is `None`; only transport
    /// failures surface, and the caller swallows those too.
    pub async fn permalink(&self, media_id: &str) -> UploadResult<Option<String>> {
        let url = format!("{}/{}", self.config.graph_base_url, media_id);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("fields", "permalink"),
                ("access_token", self.config.access_token.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(media_id, status = %response.status(), "permalink not available");
            return Ok(None);
        }

        let parsed: PermalinkResponse = response.json().await?;
        Ok(parsed.permalink)
    }
}
