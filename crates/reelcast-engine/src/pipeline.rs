//! The production pipeline: assets in, published reels out.
//!
//! `Pipeline` owns a scanned [`AssetLibrary`] and a [`ReelComposer`]. Each
//! `produce` call resolves a [`ProduceRequest`] into a validated `ReelSpec`
//! (picking a random template and track for whatever the request leaves
//! unset) and hands it to the composer. Publishing is a separate step so
//! callers can inspect or re-use the artifact before it goes out.

use std::path::PathBuf;

use tracing::{error, info};

use reelcast_media::{MediaArtifact, ReelComposer};
use reelcast_models::{PublishReceipt, ReelSpec};
use reelcast_publish::{PublisherConfig, UploadSession};

use crate::assets::AssetLibrary;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::source::CaptionSource;

/// One reel to produce. Unset fields fall back to engine defaults.
#[derive(Debug, Clone, Default)]
pub struct ProduceRequest {
    /// Caption text drawn over the video.
    pub caption: String,
    /// Target duration; engine default when absent.
    pub duration_secs: Option<u32>,
    /// Output file name; a unique timestamped name when absent.
    pub output_name: Option<String>,
    /// Background template override; random pick when absent.
    pub video: Option<PathBuf>,
    /// Music track override; random pick when absent.
    pub music: Option<PathBuf>,
}

impl ProduceRequest {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            ..Self::default()
        }
    }
}

/// End-to-end reel production.
pub struct Pipeline {
    library: AssetLibrary,
    composer: ReelComposer,
    default_duration_secs: u32,
}

impl Pipeline {
    /// Scan the asset directories and set up the composer.
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let library = AssetLibrary::scan(config)?;
        let composer = ReelComposer::new(&config.fonts_dir, &config.output_dir);
        Ok(Self {
            library,
            composer,
            default_duration_secs: config.default_duration_secs,
        })
    }

    /// Produce one reel.
    pub async fn produce(&self, request: &ProduceRequest) -> EngineResult<MediaArtifact> {
        let video = match &request.video {
            Some(path) => path.clone(),
            None => self.library.pick_template()?.to_path_buf(),
        };
        let music = match &request.music {
            Some(path) => path.clone(),
            None => self.library.pick_music()?.to_path_buf(),
        };
        let duration = request.duration_secs.unwrap_or(self.default_duration_secs);
        let output_name = request
            .output_name
            .clone()
            .unwrap_or_else(unique_output_name);

        let spec = ReelSpec::new(&request.caption, output_name, duration, video, music)?;
        let render_config = spec
            .template_name()
            .and_then(|name| self.library.render_config_for(name));

        info!(
            template = spec.template_name().unwrap_or("<none>"),
            output = %spec.output_name,
            "producing reel"
        );
        Ok(self.composer.compose(&spec, render_config).await?)
    }

    /// Produce a reel whose caption comes from a [`CaptionSource`].
    pub async fn produce_about<S>(&self, source: &S, topic: &str) -> EngineResult<MediaArtifact>
    where
        S: CaptionSource + ?Sized,
    {
        let caption = source.caption(topic).await?;
        self.produce(&ProduceRequest::new(caption)).await
    }

    /// Produce a batch of reels, continuing past failed items.
    ///
    /// Results come back in request order, one per request.
    pub async fn produce_batch(
        &self,
        requests: &[ProduceRequest],
    ) -> Vec<EngineResult<MediaArtifact>> {
        let mut results = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            match self.produce(request).await {
                Ok(artifact) => {
                    let output = artifact.file_name().unwrap_or("<none>");
                    info!(index, output, "batch item done");
                    results.push(Ok(artifact));
                }
                Err(e) => {
                    error!(index, error = %e, "batch item failed, continuing");
                    results.push(Err(e));
                }
            }
        }
        results
    }

    /// Publish a finished reel and return the receipt.
    pub async fn publish(
        &self,
        artifact: &MediaArtifact,
        caption: &str,
        publisher: PublisherConfig,
    ) -> EngineResult<PublishReceipt> {
        let session = UploadSession::new(publisher, &artifact.path, caption)?;
        Ok(session.run().await?)
    }

    pub fn library(&self) -> &AssetLibrary {
        &self.library
    }
}

/// Timestamped unique output name for requests that do not supply one.
fn unique_output_name() -> String {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let tag = uuid::Uuid::new_v4().simple().to_string();
    format!("reel_{stamp}_{}.mp4", &tag[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::fs;
    use std::path::Path;

    fn engine_config(dir: &Path) -> EngineConfig {
        EngineConfig {
            templates_dir: dir.join("templates"),
            music_dir: dir.join("music"),
            fonts_dir: dir.join("fonts"),
            output_dir: dir.join("output"),
            default_duration_secs: 15,
        }
    }

    fn seed_assets(dir: &Path) {
        let templates = dir.join("templates");
        let music = dir.join("music");
        fs::create_dir_all(&templates).unwrap();
        fs::create_dir_all(&music).unwrap();
        fs::write(templates.join("beach.mp4"), b"x").unwrap();
        fs::write(music.join("track.mp3"), b"x").unwrap();
    }

    #[test]
    fn test_unique_output_name_shape() {
        let a = unique_output_name();
        let b = unique_output_name();
        assert!(a.starts_with("reel_"));
        assert!(a.ends_with(".mp4"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_produce_with_no_assets_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::create_dir_all(dir.path().join("music")).unwrap();

        let pipeline = Pipeline::new(&engine_config(dir.path())).unwrap();
        let err = pipeline
            .produce(&ProduceRequest::new("a joke"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Assets(_)));
    }

    #[tokio::test]
    async fn test_duration_out_of_range_rejected_before_encoding() {
        let dir = tempfile::tempdir().unwrap();
        seed_assets(dir.path());

        let pipeline = Pipeline::new(&engine_config(dir.path())).unwrap();
        let mut request = ProduceRequest::new("a joke");
        request.duration_secs = Some(99);
        let err = pipeline.produce(&request).await.unwrap_err();
        assert!(matches!(err, EngineError::Spec(_)));
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::create_dir_all(dir.path().join("music")).unwrap();

        let pipeline = Pipeline::new(&engine_config(dir.path())).unwrap();
        let requests = vec![ProduceRequest::new("one"), ProduceRequest::new("two")];
        let results = pipeline.produce_batch(&requests).await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_err()));
    }
}
