//! `orrery`: computes Sun, Moon, Earth-rotation and satellite positions at a
//! fixed frame rate and logs what it sees.
//!
//! Run with `cargo run -p orrery-app -- --tle stations.txt --time-scale 100`.

use std::ops::ControlFlow;
use std::process::ExitCode;

use clap::Parser;
use orrery_app::error::AppError;
use orrery_app::frame_loop::FrameLoop;
use orrery_app::platform::PlatformDirs;
use orrery_app::session::Session;
use orrery_config::{CliArgs, Config};
use orrery_sky::wall_clock_millis;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match args.config.clone() {
        Some(config_dir) => PlatformDirs::with_config_dir(config_dir),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create directories: {e}");
    }

    let file_config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let mut config = file_config.clone();
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    match run(file_config, args, &dirs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(file_config: Config, args: CliArgs, dirs: &PlatformDirs) -> Result<(), AppError> {
    let mut session = Session::new(
        file_config,
        args,
        Some(dirs.config_dir.clone()),
        wall_clock_millis(),
    )?;
    let simulation = &session.config().simulation;
    let mut frame_loop = FrameLoop::new(simulation.target_fps, simulation.frames);

    frame_loop.run(|index, wall_ms| {
        session.step(index, wall_ms);
        ControlFlow::Continue(())
    });

    let totals = session.totals();
    info!(
        frames = totals.frames,
        positions = totals.positions,
        skipped = totals.skipped,
        late_frames = frame_loop.late_frames(),
        "Finished"
    );
    Ok(())
}
