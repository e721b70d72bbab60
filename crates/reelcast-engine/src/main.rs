//! Reelcast CLI: produce and publish short vertical reels.
//!
//! Usage:
//!   reelcast produce --caption <TEXT> [OPTIONS]   Produce one reel
//!   reelcast batch <CAPTIONS_FILE> [OPTIONS]      Produce a reel per line
//!   reelcast doctor                               Check tools and assets

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reelcast_engine::{AssetLibrary, EngineConfig, Pipeline, ProduceRequest};
use reelcast_publish::PublisherConfig;

#[derive(Parser)]
#[command(
    name = "reelcast",
    about = "Produce and publish short vertical reels",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce a single reel
    Produce {
        /// Caption text drawn over the video
        #[arg(short, long)]
        caption: String,

        /// Target duration in seconds (5-60)
        #[arg(long)]
        duration: Option<u32>,

        /// Output file name
        #[arg(short, long)]
        output: Option<String>,

        /// Background template override (random pick when omitted)
        #[arg(long)]
        video: Option<PathBuf>,

        /// Music track override (random pick when omitted)
        #[arg(long)]
        music: Option<PathBuf>,

        /// Publish the finished reel
        #[arg(long)]
        publish: bool,
    },

    /// Produce one reel per caption line in a file
    Batch {
        /// File with one caption per line
        captions: PathBuf,

        /// Produce at most this many reels
        #[arg(long)]
        count: Option<usize>,

        /// Target duration in seconds (5-60)
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Check ffmpeg, ffprobe and the asset directories
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("reelcast_engine=info".parse().unwrap())
        .add_directive("reelcast_media=info".parse().unwrap())
        .add_directive("reelcast_publish=info".parse().unwrap())
        .add_directive("reelcast_caption=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let cli = Cli::parse();
    let config = EngineConfig::from_env();

    match cli.command {
        Commands::Produce {
            caption,
            duration,
            output,
            video,
            music,
            publish,
        } => produce(&config, caption, duration, output, video, music, publish).await,
        Commands::Batch {
            captions,
            count,
            duration,
        } => batch(&config, captions, count, duration).await,
        Commands::Doctor => doctor(&config),
    }
}

#[allow(clippy::too_many_arguments)]
async fn produce(
    config: &EngineConfig,
    caption: String,
    duration: Option<u32>,
    output: Option<String>,
    video: Option<PathBuf>,
    music: Option<PathBuf>,
    publish: bool,
) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(config)?;
    let request = ProduceRequest {
        caption: caption.clone(),
        duration_secs: duration,
        output_name: output,
        video,
        music,
    };

    let artifact = pipeline.produce(&request).await?;
    println!("{}", artifact.path.display());

    if publish {
        let publisher = PublisherConfig::from_env()?;
        let receipt = pipeline.publish(&artifact, &caption, publisher).await?;
        info!(media_id = %receipt.media_id, "reel published");
        if let Some(permalink) = receipt.permalink {
            println!("{permalink}");
        }
    }

    Ok(())
}

async fn batch(
    config: &EngineConfig,
    captions: PathBuf,
    count: Option<usize>,
    duration: Option<u32>,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&captions)?;
    let mut requests: Vec<ProduceRequest> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| ProduceRequest {
            caption: line.to_string(),
            duration_secs: duration,
            ..ProduceRequest::default()
        })
        .collect();
    if let Some(count) = count {
        requests.truncate(count);
    }
    if requests.is_empty() {
        anyhow::bail!("no captions found in {}", captions.display());
    }

    let pipeline = Pipeline::new(config)?;
    let results = pipeline.produce_batch(&requests).await;
    let produced = results.iter().filter(|r| r.is_ok()).count();
    info!(produced, failed = results.len() - produced, "batch finished");

    for artifact in results.into_iter().flatten() {
        println!("{}", artifact.path.display());
    }
    if produced == 0 {
        anyhow::bail!("all batch items failed");
    }

    Ok(())
}

fn doctor(config: &EngineConfig) -> anyhow::Result<()> {
    println!("Reelcast Doctor");
    println!("{}", "=".repeat(40));

    let mut ready = true;

    match reelcast_media::check_ffmpeg() {
        Ok(path) => println!("[OK]      ffmpeg: {}", path.display()),
        Err(_) => {
            ready = false;
            println!("[MISSING] ffmpeg: not found on PATH");
        }
    }
    match reelcast_media::check_ffprobe() {
        Ok(path) => println!("[OK]      ffprobe: {}", path.display()),
        Err(_) => {
            ready = false;
            println!("[MISSING] ffprobe: not found on PATH");
        }
    }

    match AssetLibrary::scan(config) {
        Ok(library) => {
            if library.template_count() > 0 {
                println!(
                    "[OK]      templates: {} in {}",
                    library.template_count(),
                    config.templates_dir.display()
                );
            } else {
                ready = false;
                println!(
                    "[MISSING] templates: none in {}",
                    config.templates_dir.display()
                );
            }
            if library.music_count() > 0 {
                println!(
                    "[OK]      music: {} track(s) in {}",
                    library.music_count(),
                    config.music_dir.display()
                );
            } else {
                ready = false;
                println!("[MISSING] music: none in {}", config.music_dir.display());
            }
        }
        Err(e) => {
            ready = false;
            println!("[BROKEN]  assets: {e}");
        }
    }

    // An empty fonts dir is not fatal; the renderer falls back to a
    // system face.
    let fonts = reelcast_caption::font::font_files(&config.fonts_dir);
    if fonts.is_empty() {
        println!(
            "[WARN]    fonts: none in {} (a system font will be used)",
            config.fonts_dir.display()
        );
    } else {
        println!(
            "[OK]      fonts: {} in {}",
            fonts.len(),
            config.fonts_dir.display()
        );
    }

    println!();
    if ready {
        println!("Reelcast is ready to produce.");
    } else {
        println!("Fix the missing pieces above before producing.");
    }

    Ok(())
}
