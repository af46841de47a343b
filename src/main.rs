//! xr-room - a room of random icosahedra explored with orbit controls and
//! XR controllers.
//!
//! Runs in a window by default; `--headless` replays a controller script
//! without a GPU.

mod config;
mod desktop;
mod headless;
mod scene;

use anyhow::Result;
use clap::Parser;
use config::{AppConfig, DEFAULT_CONFIG_PATH};
use headless::HeadlessOptions;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "xr-room", version, about)]
struct Cli {
    /// Configuration file; missing or malformed files fall back to defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Run without a window.
    #[arg(long)]
    headless: bool,
    /// Controller script replayed in headless mode.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Frames to run in headless mode.
    #[arg(long)]
    frames: Option<u64>,
    /// Write a JSONL frame recording in headless mode.
    #[arg(long)]
    record: Option<PathBuf>,
    /// Override the scene seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Write the effective configuration to this path and exit.
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting xr-room v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_from_path(&cli.config);
    if let Some(path) = &cli.save_config {
        config.save_to_path(path)?;
        info!(path = %path.display(), "configuration written");
        return Ok(());
    }

    if cli.headless {
        let summary = headless::run(
            &config,
            &HeadlessOptions {
                script: cli.script,
                frames: cli.frames,
                record: cli.record,
                seed: cli.seed,
            },
        )?;
        println!(
            "frames={} target={} highlight={} instances={}",
            summary.frames,
            summary
                .last_target
                .map_or_else(|| "none".to_string(), |id| id.to_string()),
            summary.highlight_visible,
            summary.instances
        );
        return Ok(());
    }

    if cli.script.is_some() || cli.frames.is_some() || cli.record.is_some() {
        warn!("--script, --frames and --record have no effect without --headless");
    }
    desktop::run(config, cli.seed)
}
