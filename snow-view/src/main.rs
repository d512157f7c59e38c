//! Application entry point for the snow pile viewer.
//!
//! This binary parses command-line options, loads the simulation config,
//! sets up eframe/egui and delegates all interactive logic and rendering
//! to [`Viewer`] from the `viewer` module.

mod ticker;
mod viewer;

use std::path::PathBuf;

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use snow_core::config::Config;
use viewer::{Mode, Viewer};

#[derive(Parser, Debug)]
#[command(name = "snowpile", version, about = "Snow accumulating along the bottom of a window")]
struct Args {
    /// TOML file with `[pile]` and `[drift]` sections.
    #[arg(long, env = "SNOW_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation shown at startup.
    #[arg(long, value_enum, default_value_t = Mode::Pile)]
    mode: Mode,

    /// Seconds between simulation ticks.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    tick_interval: f64,
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the config cannot be loaded or eframe fails to create the
///   native window or event loop.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => Config::load(path).inspect_err(|e| log::error!("{e}"))?,
        None => Config::default(),
    };

    let rng = match args.seed {
        Some(seed) => {
            log::info!("using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 540.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Snow Pile",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg, args.mode, rng, args.tick_interval)))),
    )?;
    Ok(())
}
