//! Application entry point for the 3D aggregation viewer.
//!
//! This binary parses the command line, builds the simulation
//! configuration, and hands everything to [`Viewer`] running inside
//! eframe/egui.

mod camera;
mod viewer;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sim_core::Config;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(about = "Diffusion-limited aggregation in a 3D box")]
struct Args {
    /// RNG seed; defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of free particles (overrides the config file).
    #[arg(short, long)]
    particles: Option<usize>,

    /// JSON file with simulation parameters; missing fields use defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(path: &Path) -> Result<Config> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let cfg = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the configuration is unusable or eframe fails to create
///   the native window or event loop.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => {
            info!("loading config from {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };
    if let Some(n) = args.particles {
        cfg.particle_count = n;
    }
    let seed = args.seed.unwrap_or_else(time_seed);

    let viewer = Viewer::new(cfg, seed).context("invalid simulation config")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Nanoparticle Aggregation")
            .with_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Nanoparticle Aggregation",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
