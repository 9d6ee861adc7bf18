//! Replay a detection recording through the sampler and print the result

use anyhow::Context;
use clap::Parser;
use emolens_eye::{
    wait_for_stop, ChartState, EyeConfig, FrameSampler, OverlayState, ReplayDetector, VirtualCamera,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "emolens")]
#[command(about = "Sample a (virtual) camera, classify expressions and chart the distribution", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON Lines recording of detection frames
    #[arg(long, short)]
    recording: PathBuf,

    /// Configuration file (TOML or JSON)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Stop after this many seconds (default: run until Ctrl+C)
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Simulated detection latency
    #[arg(long, default_value = "0")]
    latency_ms: u64,

    /// Frame width (overrides the config file)
    #[arg(long)]
    width: Option<u32>,

    /// Frame height (overrides the config file)
    #[arg(long)]
    height: Option<u32>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => EyeConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => EyeConfig::default(),
    };
    config.apply_env();
    if let Some(width) = cli.width {
        config.resolution.0 = width;
    }
    if let Some(height) = cli.height {
        config.resolution.1 = height;
    }
    config.validate()?;

    let detector = ReplayDetector::from_path(&cli.recording)
        .with_context(|| format!("Failed to load recording {:?}", cli.recording))?
        .with_latency(Duration::from_millis(cli.latency_ms));

    let (width, height) = config.resolution;
    let camera = VirtualCamera::new(width, height)?;
    let sampler = FrameSampler::new(
        &config,
        Arc::new(camera.clone()),
        Arc::new(detector),
        OverlayState::with_style(&config.overlay),
        ChartState::default(),
    )?;

    let stopper = camera.clone();
    let limit = cli.duration_secs.map(Duration::from_secs);
    tokio::spawn(async move {
        wait_for_stop(limit, signal::ctrl_c()).await;
        stopper.end();
    });

    camera.play();
    let report = sampler.run().await?;

    println!("{}", report.chart);
    println!("Faces in last frame: {}", report.stats.last_entity_count);
    for label in report.overlay.labels() {
        println!("  {}", label);
    }
    println!(
        "Frames rendered: {}, ticks skipped: {}, failed detections: {}",
        report.stats.frames_rendered, report.stats.ticks_skipped, report.stats.failures
    );

    Ok(())
}
