//! Wiring between configuration and the sky engine.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use orrery_config::{CliArgs, ClockConfig, Config, DisplayConfig};
use orrery_sky::{
    Catalog, DisplayScale, SimClock, SimInstant, Sky, SkyFrame, parse_element_sets_nonempty,
};
use tracing::{info, warn};

use crate::error::AppError;

/// Map the display section onto the engine's scale.
pub fn display_scale(display: &DisplayConfig) -> DisplayScale {
    DisplayScale {
        earth_radius: display.earth_radius,
        real_earth_radius_km: display.real_earth_radius_km,
        sun_distance: display.sun_distance,
        moon_distance: display.moon_distance,
    }
}

/// Parse an RFC 3339 start epoch.
pub fn parse_start_epoch(value: Option<&str>) -> Result<Option<SimInstant>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(value.trim()).map_err(|source| {
        AppError::StartEpoch {
            value: value.to_string(),
            source,
        }
    })?;
    Ok(Some(SimInstant::from_datetime(&parsed.to_utc())))
}

/// Clock starting at `wall_ms`, at the configured epoch or at real time.
pub fn build_clock(clock: &ClockConfig, wall_ms: f64) -> Result<SimClock, AppError> {
    let start_sim_ms = parse_start_epoch(clock.start_epoch.as_deref())?
        .map_or(wall_ms, SimInstant::unix_millis);
    Ok(SimClock::new(wall_ms, start_sim_ms, clock.time_scale))
}

/// Read element-set text from disk and build the catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|source| AppError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    let sets = parse_element_sets_nonempty(&raw).map_err(|source| AppError::EmptyCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), element_sets = sets.len(), "Loaded element sets");
    Ok(Catalog::from_element_sets(&sets))
}

/// Running totals over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTotals {
    pub frames: u64,
    pub positions: u64,
    pub skipped: u64,
}

/// One run of the shell: the engine, its clock and the live config.
#[derive(Debug)]
pub struct Session {
    sky: Sky,
    clock: SimClock,
    /// Effective config: the file contents with CLI overrides applied.
    config: Config,
    /// Last config read from disk, the baseline for change detection.
    file_config: Config,
    overrides: CliArgs,
    config_dir: Option<PathBuf>,
    totals: SessionTotals,
}

impl Session {
    /// Build the session from the config as read from disk plus the CLI
    /// overrides. `config_dir` enables hot reload.
    pub fn new(
        file_config: Config,
        overrides: CliArgs,
        config_dir: Option<PathBuf>,
        wall_ms: f64,
    ) -> Result<Self, AppError> {
        let mut config = file_config.clone();
        config.apply_cli_overrides(&overrides);

        let path = config
            .catalog
            .tle_path
            .clone()
            .ok_or(AppError::MissingCatalog)?;
        let catalog = load_catalog(&path)?;
        let clock = build_clock(&config.clock, wall_ms)?;
        let sky = Sky::new(catalog, display_scale(&config.display));

        info!(
            tracked = sky.catalog().len(),
            rejected = sky.catalog().rejected().len(),
            time_scale = clock.scale(),
            start = ?clock.origin().to_datetime(),
            "Session ready"
        );

        Ok(Self {
            sky,
            clock,
            config,
            file_config,
            overrides,
            config_dir,
            totals: SessionTotals::default(),
        })
    }

    /// Compute one frame and fold it into the totals.
    pub fn step(&mut self, frame_index: u64, wall_ms: f64) -> SkyFrame {
        let frame = self.sky.frame(&self.clock, wall_ms);
        self.totals.frames += 1;
        self.totals.positions += frame.stats.tracked as u64;
        self.totals.skipped += frame.stats.skipped as u64;

        if frame_index % self.summary_every() == 0 {
            info!(
                frame = frame_index,
                instant = ?frame.instant.to_datetime(),
                tracked = frame.stats.tracked,
                skipped = frame.stats.skipped,
                earth_rotation = frame.earth_rotation,
                "Frame summary"
            );
            self.poll_config(wall_ms);
        }
        frame
    }

    /// Re-read `config.ron` and apply a changed time scale.
    ///
    /// CLI overrides keep precedence over edits to the file.
    pub fn poll_config(&mut self, wall_ms: f64) {
        let Some(ref dir) = self.config_dir else {
            return;
        };
        match self.file_config.reload(dir) {
            Ok(Some(new_file_config)) => {
                self.file_config = new_file_config.clone();
                let mut effective = new_file_config;
                effective.apply_cli_overrides(&self.overrides);
                self.apply_config(effective, wall_ms);
            }
            Ok(None) => {}
            Err(e) => warn!("Config reload failed: {e}"),
        }
    }

    /// Adopt a new config. Only the time scale takes effect mid-session.
    pub fn apply_config(&mut self, new_config: Config, wall_ms: f64) {
        if new_config.clock.time_scale != self.config.clock.time_scale {
            self.clock.set_scale(new_config.clock.time_scale, wall_ms);
            info!(time_scale = self.clock.scale(), "Time scale changed");
        }
        self.config = new_config;
    }

    fn summary_every(&self) -> u64 {
        u64::from(self.config.simulation.target_fps.max(1))
    }

    pub fn sky(&self) -> &Sky {
        &self.sky
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn totals(&self) -> SessionTotals {
        self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TLE: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
BROKEN
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236009
";

    fn config_with_catalog(dir: &Path) -> Config {
        let path = dir.join("stations.txt");
        std::fs::write(&path, TLE).unwrap();
        let mut config = Config::default();
        config.catalog.tle_path = Some(path);
        config.clock.start_epoch = Some("2020-07-12T21:30:00Z".to_string());
        config
    }

    #[test]
    fn test_parse_start_epoch() {
        assert_eq!(parse_start_epoch(None).unwrap(), None);
        let instant = parse_start_epoch(Some("2000-01-01T12:00:00Z")).unwrap().unwrap();
        assert_eq!(instant, SimInstant::J2000);
        let offset = parse_start_epoch(Some("2000-01-01T13:00:00+01:00")).unwrap().unwrap();
        assert_eq!(offset, SimInstant::J2000);
    }

    #[test]
    fn test_bad_start_epoch() {
        let err = parse_start_epoch(Some("yesterday")).unwrap_err();
        assert!(matches!(err, AppError::StartEpoch { .. }));
    }

    #[test]
    fn test_build_clock_defaults_to_wall_time() {
        let clock = build_clock(&ClockConfig::default(), 1_000.0).unwrap();
        assert_eq!(clock.now(1_000.0).unix_millis(), 1_000.0);
        assert_eq!(clock.scale(), 1.0);
    }

    #[test]
    fn test_load_catalog_isolates_bad_set() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_catalog(dir.path());
        let catalog = load_catalog(config.catalog.tle_path.as_deref().unwrap()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.rejected().len(), 1);
    }

    #[test]
    fn test_load_catalog_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_catalog(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(missing, AppError::ReadCatalog { .. }));

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "\n\n").unwrap();
        assert!(matches!(
            load_catalog(&empty).unwrap_err(),
            AppError::EmptyCatalog { .. }
        ));
    }

    #[test]
    fn test_session_requires_catalog() {
        let err = Session::new(Config::default(), CliArgs::default(), None, 0.0).unwrap_err();
        assert!(matches!(err, AppError::MissingCatalog));
    }

    #[test]
    fn test_session_steps_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let mut session =
            Session::new(config_with_catalog(dir.path()), CliArgs::default(), None, 0.0).unwrap();
        for i in 0..3 {
            let frame = session.step(i, i as f64 * 16.0);
            assert_eq!(frame.satellites.len(), 1);
            assert_eq!(frame.stats.build_failures, 1);
        }
        assert_eq!(
            session.totals(),
            SessionTotals {
                frames: 3,
                positions: 3,
                skipped: 0,
            }
        );
    }

    #[test]
    fn test_reload_changes_time_scale() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_catalog(dir.path());
        config.save(dir.path()).unwrap();
        let mut session = Session::new(
            config.clone(),
            CliArgs::default(),
            Some(dir.path().to_path_buf()),
            0.0,
        )
        .unwrap();

        let mut faster = config;
        faster.clock.time_scale = 1000.0;
        faster.save(dir.path()).unwrap();

        let before = session.clock().now(2_000.0);
        session.poll_config(2_000.0);
        assert_eq!(session.clock().scale(), 1000.0);
        assert_eq!(session.clock().now(2_000.0), before);
        assert_eq!(session.config().clock.time_scale, 1000.0);
    }

    #[test]
    fn test_cli_overrides_survive_first_poll() {
        let dir = tempfile::tempdir().unwrap();
        let tle_path = dir.path().join("stations.txt");
        std::fs::write(&tle_path, TLE).unwrap();

        let file_config = Config::load_or_create(dir.path()).unwrap();
        let args = CliArgs {
            tle: Some(tle_path.clone()),
            time_scale: Some(1000.0),
            ..Default::default()
        };
        let mut session =
            Session::new(file_config, args, Some(dir.path().to_path_buf()), 0.0).unwrap();

        session.step(0, 0.0);
        assert_eq!(session.clock().scale(), 1000.0);
        assert_eq!(session.config().clock.time_scale, 1000.0);
        assert_eq!(session.config().catalog.tle_path, Some(tle_path));
    }

    #[test]
    fn test_file_edit_does_not_beat_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let tle_path = dir.path().join("stations.txt");
        std::fs::write(&tle_path, TLE).unwrap();

        let file_config = Config::load_or_create(dir.path()).unwrap();
        let args = CliArgs {
            tle: Some(tle_path.clone()),
            time_scale: Some(1000.0),
            frames: Some(5),
            ..Default::default()
        };
        let mut session =
            Session::new(file_config.clone(), args, Some(dir.path().to_path_buf()), 0.0).unwrap();

        let mut edited = file_config;
        edited.clock.time_scale = 2.0;
        edited.simulation.target_fps = 30;
        edited.save(dir.path()).unwrap();

        session.poll_config(1_000.0);
        assert_eq!(session.clock().scale(), 1000.0);
        assert_eq!(session.config().simulation.target_fps, 30);
        assert_eq!(session.config().simulation.frames, 5);
        assert_eq!(session.config().catalog.tle_path, Some(tle_path));
    }
}
