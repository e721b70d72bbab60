//! Media processing for the Reelcast pipeline.
//!
//! This crate wraps FFmpeg and FFprobe behind a typed API:
//! - Command building and execution with progress tracking
//! - Media probing (duration, streams, dimensions)
//! - Portrait framing filter graphs
//! - The two-pass reel composition pipeline

pub mod command;
pub mod compose;
pub mod error;
pub mod filters;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, EncodeProgress, FfmpegCommand, FfmpegRunner};
pub use compose::{MediaArtifact, ReelComposer, DEFAULT_ENCODE_TIMEOUT_SECS};
pub use error::{MediaError, MediaResult};
pub use filters::{caption_overlay_graph, is_near_target};
pub use probe::{get_duration, probe_media, MediaInfo, VideoStream};
