//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "orrery", about = "Time-scaled Sun, Moon and satellite positions")]
pub struct CliArgs {
    /// File with three-line orbital element sets.
    #[arg(long)]
    pub tle: Option<PathBuf>,

    /// Simulated seconds per wall second.
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Number of frames to compute (0 = until interrupted).
    #[arg(long)]
    pub frames: Option<u64>,

    /// Frames per wall second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.tle {
            self.catalog.tle_path = Some(path.clone());
        }
        if let Some(scale) = args.time_scale {
            self.clock.time_scale = scale;
        }
        if let Some(frames) = args.frames {
            self.simulation.frames = frames;
        }
        if let Some(fps) = args.fps {
            self.simulation.target_fps = fps;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
