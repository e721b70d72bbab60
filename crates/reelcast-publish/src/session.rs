//! Upload session state machine.
//!
//! One session moves one file through the protocol:
//! container create, binary transfer, processing poll, publish. Transitions
//! are strictly forward; a failure at any stage parks the session in
//! `Failed` and nothing moves it out again.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use reelcast_models::PublishReceipt;

use crate::client::GraphClient;
use crate::config::PublisherConfig;
use crate::error::{UploadError, UploadResult};

/// Protocol stage, one variant per step carrying only the data valid there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Pre-flight guards passed, nothing sent yet.
    Created,
    /// Container allocated on the server.
    ContainerReady { container_id: String },
    /// Bytes transferred.
    Uploaded { container_id: String },
    /// Server-side processing finished.
    Processed { container_id: String },
    /// Terminal: the reel is live.
    Published {
        media_id: String,
        container_id: String,
    },
    /// Terminal: a stage failed.
    Failed { message: String },
}

impl SessionState {
    /// Whether the session can still move forward.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Published { .. } | Self::Failed { .. })
    }

    fn stage_name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ContainerReady { .. } => "container_ready",
            Self::Uploaded { .. } => "uploaded",
            Self::Processed { .. } => "processed",
            Self::Published { .. } => "published",
            Self::Failed { .. } => "failed",
        }
    }
}

/// A single file's journey through the upload protocol.
///
/// Sessions are never reused across files; create one per upload.
pub struct UploadSession {
    client: GraphClient,
    file_path: PathBuf,
    caption: String,
    state: SessionState,
}

impl UploadSession {
    /// Create a session for one file.
    ///
    /// The pre-flight guards run here, before any network call: the file
    /// must exist and carry the `.mp4` extension.
    pub fn new(
        config: PublisherConfig,
        file_path: impl Into<PathBuf>,
        caption: impl Into<String>,
    ) -> UploadResult<Self> {
        let file_path = file_path.into();

        if !file_path.exists() {
            return Err(UploadError::file_not_found(&file_path));
        }
        let is_mp4 = file_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("mp4"));
        if !is_mp4 {
            return Err(UploadError::unsupported_format(&file_path));
        }

        Ok(Self {
            client: GraphClient::new(config)?,
            file_path,
            caption: caption.into(),
            state: SessionState::Created,
        })
    }

    /// Current protocol stage.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Perform one protocol step.
    ///
    /// On a terminal state this is a no-op. On failure the session moves to
    /// `Failed` and the error is returned.
    pub async fn advance(&mut self) -> UploadResult<&SessionState> {
        if self.state.is_terminal() {
            return Ok(&self.state);
        }

        match self.step().await {
            Ok(next) => {
                info!(stage = next.stage_name(), "upload session advanced");
                self.state = next;
                Ok(&self.state)
            }
            Err(e) => {
                self.state = SessionState::Failed {
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Drive the session to publication and return the receipt.
    pub async fn run(mut self) -> UploadResult<PublishReceipt> {
        info!(file = %self.file_path.display(), "publishing reel");

        loop {
            match &self.state {
                SessionState::Published {
                    media_id,
                    container_id,
                } => {
                    // Best-effort: a published reel without a permalink is
                    // still a success.
                    let permalink = match self.client.permalink(media_id).await {
                        Ok(permalink) => permalink,
                        Err(e) => {
                            warn!(error = %e, "permalink fetch failed");
                            None
                        }
                    };
                    return Ok(PublishReceipt {
                        media_id: media_id.clone(),
                        permalink,
                        container_id: container_id.clone(),
                    });
                }
                SessionState::Failed { message } => {
                    return Err(UploadError::config(format!(
                        "session already failed: {message}"
                    )));
                }
                _ => {
                    self.advance().await?;
                }
            }
        }
    }

    async fn step(&self) -> UploadResult<SessionState> {
        match &self.state {
            SessionState::Created => {
                let container_id = self.client.create_container(&self.caption).await?;
                Ok(SessionState::ContainerReady { container_id })
            }
            SessionState::ContainerReady { container_id } => {
                self.client
                    .upload_file(container_id, &self.file_path)
                    .await?;
                Ok(SessionState::Uploaded {
                    container_id: container_id.clone(),
                })
            }
            SessionState::Uploaded { container_id } => {
                self.wait_for_processing(container_id).await?;
                Ok(SessionState::Processed {
                    container_id: container_id.clone(),
                })
            }
            SessionState::Processed { container_id } => {
                let media_id = self.client.publish(container_id).await?;
                Ok(SessionState::Published {
                    media_id,
                    container_id: container_id.clone(),
                })
            }
            terminal => Ok(terminal.clone()),
        }
    }

    /// Poll the container status until it reaches a terminal value.
    async fn wait_for_processing(&self, container_id: &str) -> UploadResult<()> {
        let interval = self.client.config().poll_interval;
        let attempts = self.client.config().poll_attempts;

        for attempt in 1..=attempts {
            tokio::time::sleep(interval).await;

            let status = self.client.container_status(container_id).await?;
            match status.code.as_str() {
                "FINISHED" => {
                    info!(container_id, attempt, "processing finished");
                    return Ok(());
                }
                "ERROR" => {
                    return Err(UploadError::processing(
                        status
                            .detail
                            .unwrap_or_else(|| "no detail provided".to_string()),
                    ));
                }
                "EXPIRED" => return Err(UploadError::ContainerExpired),
                other => debug!(container_id, attempt, status = other, "still processing"),
            }
        }

        Err(UploadError::ProcessingTimeout { attempts })
    }
}

impl fmt::Debug for UploadSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadSession")
            .field("file_path", &self.file_path)
            .field("caption", &self.caption)
            .field("state", &self.state)
            .finish()
    }
}
