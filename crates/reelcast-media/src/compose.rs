//! Reel composition pipeline.
//!
//! Turns a [`ReelSpec`] into a finished mp4 in two FFmpeg passes:
//!
//! 1. Audio pass: loop or trim the music track to the target duration and
//!    encode it into a scratch file.
//! 2. Mux pass: frame the background video to 1080x1920, loop it if it is
//!    shorter than the target, composite the caption still on top and mux
//!    the scratch audio in unchanged.
//!
//! The caption still and scratch audio live in a temporary directory that is
//! removed on every exit path.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use reelcast_caption::CaptionRenderer;
use reelcast_models::{EncodingProfile, ReelSpec, RenderConfig, REEL_FPS, REEL_HEIGHT, REEL_WIDTH};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::caption_overlay_graph;
use crate::probe::{probe_media, VideoStream};

/// Default per-pass encode timeout.
pub const DEFAULT_ENCODE_TIMEOUT_SECS: u64 = 600;

/// A finished reel on disk.
#[derive(Debug, Clone)]
pub struct MediaArtifact {
    /// Path of the encoded mp4
    pub path: PathBuf,
}

impl MediaArtifact {
    /// File name of the artifact.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Composes reels from a video template, a music track and a caption.
pub struct ReelComposer {
    renderer: CaptionRenderer,
    runner: FfmpegRunner,
    profile: EncodingProfile,
    output_dir: PathBuf,
}

impl ReelComposer {
    /// Create a composer rendering captions with fonts from `fonts_dir` and
    /// writing finished reels into `output_dir`.
    pub fn new(fonts_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer: CaptionRenderer::new(fonts_dir),
            runner: FfmpegRunner::new().with_timeout(DEFAULT_ENCODE_TIMEOUT_SECS),
            profile: EncodingProfile::default(),
            output_dir: output_dir.into(),
        }
    }

    /// Replace the encoding profile.
    pub fn with_profile(mut self, profile: EncodingProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Replace the per-pass encode timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.runner = FfmpegRunner::new().with_timeout(secs);
        self
    }

    /// Compose a reel.
    ///
    /// `config` is the per-template render configuration; `None` renders
    /// with defaults (centered white text on a backing box).
    pub async fn compose(
        &self,
        spec: &ReelSpec,
        config: Option<&RenderConfig>,
    ) -> MediaResult<MediaArtifact> {
        let video_info = probe_media(&spec.video_path).await?;
        let video = video_info
            .video
            .as_ref()
            .ok_or_else(|| MediaError::invalid_media(&spec.video_path, "no video stream"))?;
        if video_info.duration <= 0.0 {
            return Err(MediaError::invalid_media(
                &spec.video_path,
                "zero-length video",
            ));
        }

        let audio_info = probe_media(&spec.audio_path).await?;
        if !audio_info.has_audio {
            return Err(MediaError::invalid_media(
                &spec.audio_path,
                "no audio stream",
            ));
        }
        if audio_info.duration <= 0.0 {
            return Err(MediaError::invalid_media(
                &spec.audio_path,
                "zero-length audio",
            ));
        }

        info!(
            video = %spec.video_path.display(),
            audio = %spec.audio_path.display(),
            duration_secs = spec.duration_secs,
            "composing reel"
        );

        // Scratch space for the caption still and the audio pass; dropped
        // (and deleted) on every exit path.
        let scratch = tempfile::tempdir()?;

        let caption_path = scratch.path().join("caption.png");
        let caption = self
            .renderer
            .render(&spec.caption, REEL_WIDTH, REEL_HEIGHT, config);
        caption.save(&caption_path).map_err(|e| {
            MediaError::encode(format!("failed to write caption still: {e}"), None, None)
        })?;

        let scratch_audio = scratch.path().join("audio.m4a");
        let audio_pass = self.build_audio_pass(spec, audio_info.duration, &scratch_audio);
        self.runner.run(&audio_pass).await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output_path = self.output_dir.join(&spec.output_name);
        let mux_pass = self.build_mux_pass(
            spec,
            video,
            video_info.duration,
            &caption_path,
            &scratch_audio,
            &output_path,
        );
        self.runner
            .run_with_progress(&mux_pass, |p| {
                debug!(
                    out_time_ms = p.out_time_ms,
                    frame = p.frame,
                    speed = p.speed,
                    "encode progress"
                );
            })
            .await?;

        info!(output = %output_path.display(), "reel composed");
        Ok(MediaArtifact { path: output_path })
    }

    /// Audio pass: loop the track if it is shorter than the target, trim it
    /// if longer, and encode to the scratch file.
    fn build_audio_pass(
        &self,
        spec: &ReelSpec,
        audio_duration: f64,
        scratch_audio: &Path,
    ) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new(scratch_audio);
        cmd = if audio_duration < spec.duration() {
            cmd.input_with_args(&spec.audio_path, ["-stream_loop", "-1"])
        } else {
            cmd.input(&spec.audio_path)
        };
        cmd.no_video()
            .audio_codec(&self.profile.audio_codec)
            .audio_bitrate(&self.profile.audio_bitrate)
            .duration_limit(spec.duration())
    }

    /// Mux pass: framed video with the caption composited, scratch audio
    /// copied in without re-encoding.
    fn build_mux_pass(
        &self,
        spec: &ReelSpec,
        video: &VideoStream,
        video_duration: f64,
        caption_path: &Path,
        scratch_audio: &Path,
        output_path: &Path,
    ) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new(output_path);
        cmd = if video_duration < spec.duration() {
            cmd.input_with_args(&spec.video_path, ["-stream_loop", "-1"])
        } else {
            cmd.input(&spec.video_path)
        };
        cmd = cmd
            .input(caption_path)
            .input(scratch_audio)
            .filter_complex(caption_overlay_graph(video.width, video.height))
            .map("[outv]")
            .map("2:a")
            .video_codec(&self.profile.video_codec)
            .preset(&self.profile.preset)
            .crf(self.profile.crf)
            .pixel_format(&self.profile.pixel_format)
            .frame_rate(REEL_FPS)
            .audio_codec("copy")
            .duration_limit(spec.duration());
        if self.profile.faststart {
            cmd = cmd.faststart();
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(duration_secs: u32) -> ReelSpec {
        ReelSpec::new(
            "Why did the chicken cross the road?",
            "out.mp4",
            duration_secs,
            "/templates/beach.mp4",
            "/music/track.mp3",
        )
        .unwrap()
    }

    fn landscape() -> VideoStream {
        VideoStream {
            width: 1920,
            height: 1080,
            fps: 30.0,
            codec: "h264".to_string(),
        }
    }

    fn composer() -> ReelComposer {
        ReelComposer::new("/fonts", "/output")
    }

    #[test]
    fn test_audio_pass_loops_short_track() {
        let cmd = composer().build_audio_pass(&spec(15), 8.0, Path::new("/tmp/audio.m4a"));
        let args = cmd.build_args();
        assert!(args.contains(&"-stream_loop".to_string()));
        assert!(args.contains(&"-vn".to_string()));
        assert!(args.contains(&"15.000".to_string()));
    }

    #[test]
    fn test_audio_pass_trims_long_track() {
        let cmd = composer().build_audio_pass(&spec(15), 182.5, Path::new("/tmp/audio.m4a"));
        let args = cmd.build_args();
        assert!(!args.contains(&"-stream_loop".to_string()));
        assert!(args.contains(&"-t".to_string()));
        assert!(args.contains(&"15.000".to_string()));
    }

    #[test]
    fn test_mux_pass_loops_short_video() {
        // 8 second template, 15 second target: the video input is looped
        let cmd = composer().build_mux_pass(
            &spec(15),
            &landscape(),
            8.0,
            Path::new("/tmp/caption.png"),
            Path::new("/tmp/audio.m4a"),
            Path::new("/output/out.mp4"),
        );
        let args = cmd.build_args();
        let loop_pos = args.iter().position(|a| a == "-stream_loop").unwrap();
        let first_input = args.iter().position(|a| a == "-i").unwrap();
        assert!(loop_pos < first_input);
        assert!(args.contains(&"15.000".to_string()));
    }

    #[test]
    fn test_mux_pass_trims_long_video() {
        let cmd = composer().build_mux_pass(
            &spec(15),
            &landscape(),
            42.0,
            Path::new("/tmp/caption.png"),
            Path::new("/tmp/audio.m4a"),
            Path::new("/output/out.mp4"),
        );
        let args = cmd.build_args();
        assert!(!args.contains(&"-stream_loop".to_string()));
        assert!(args.contains(&"-t".to_string()));
    }

    #[test]
    fn test_mux_pass_output_shape() {
        let cmd = composer().build_mux_pass(
            &spec(15),
            &landscape(),
            42.0,
            Path::new("/tmp/caption.png"),
            Path::new("/tmp/audio.m4a"),
            Path::new("/output/out.mp4"),
        );
        let args = cmd.build_args();
        assert!(args.contains(&"[outv]".to_string()));
        assert!(args.contains(&"2:a".to_string()));
        // Scratch audio is muxed, not re-encoded
        let ca = args.iter().position(|a| a == "-c:a").unwrap();
        assert_eq!(args[ca + 1], "copy");
        let r = args.iter().position(|a| a == "-r").unwrap();
        assert_eq!(args[r + 1], "24");
        assert!(args.contains(&"+faststart".to_string()));
        assert_eq!(args.last().unwrap(), "/output/out.mp4");
        // Framing filter chosen from the probed dimensions
        let fc = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert!(args[fc + 1].contains("crop=min(iw\\,1080):ih"));
    }

    #[tokio::test]
    async fn test_compose_missing_video_fails_before_encoding() {
        let spec = ReelSpec::new(
            "a joke",
            "out.mp4",
            15,
            "/nonexistent/beach.mp4",
            "/nonexistent/track.mp3",
        )
        .unwrap();
        let err = composer().compose(&spec, None).await.unwrap_err();
        assert!(matches!(err, MediaError::MediaSource { .. }));
    }
}
