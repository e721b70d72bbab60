//! Reel publishing over a resumable-upload protocol.
//!
//! The protocol has four network steps, modeled as a state machine:
//! 1. Create an upload container
//! 2. Transfer the file bytes
//! 3. Poll server-side processing
//! 4. Publish the processed container
//!
//! plus a best-effort permalink fetch after publication. See
//! [`UploadSession`] for the entry point.

pub mod client;
pub mod config;
pub mod error;
pub mod session;

pub use client::{ContainerStatus, GraphClient};
pub use config::{
    PublisherConfig, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL, GRAPH_BASE_URL, UPLOAD_BASE_URL,
};
pub use error::{UploadError, UploadResult};
pub use session::{SessionState, UploadSession};
