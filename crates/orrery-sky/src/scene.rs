//! Per-frame assembly of every body's render position.

use tracing::{debug, trace};

use crate::catalog::{Catalog, ObjectId};
use crate::clock::SimClock;
use crate::ephemeris::{moon_position, sun_position};
use crate::error::PropagationError;
use crate::frame::{
    DisplayScale, RenderPosition, celestial_to_render, geodetic_to_render, inertial_to_geodetic,
};
use crate::instant::SimInstant;
use crate::rotation::{earth_rotation_angle, greenwich_mean_sidereal_time};

/// Object counts for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Objects with a render position this frame.
    pub tracked: usize,
    /// Objects whose propagation failed this frame.
    pub skipped: usize,
    /// Element sets rejected when the catalog was built.
    pub build_failures: usize,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct SkyFrame {
    /// Simulated instant every body was evaluated at.
    pub instant: SimInstant,
    /// Spin angle for the Earth mesh, radians, unbounded.
    pub earth_rotation: f64,
    /// Greenwich mean sidereal time, radians.
    pub gmst: f64,
    /// Sun at its fixed display distance.
    pub sun: RenderPosition,
    /// Directional light position; always equal to `sun`.
    pub sun_light: RenderPosition,
    /// Moon at its fixed display distance.
    pub moon: RenderPosition,
    /// Surviving objects in catalog order.
    pub satellites: Vec<(ObjectId, RenderPosition)>,
    /// Objects that failed to propagate this frame, in catalog order.
    pub skipped: Vec<(ObjectId, PropagationError)>,
    /// Counts for logging and diagnostics.
    pub stats: FrameStats,
}

/// The engine facade: a built catalog plus display scaling.
#[derive(Clone, Debug, Default)]
pub struct Sky {
    catalog: Catalog,
    scale: DisplayScale,
}

impl Sky {
    /// Wrap a built catalog with the scale used for every frame.
    pub fn new(catalog: Catalog, scale: DisplayScale) -> Self {
        Self { catalog, scale }
    }

    /// The catalog frames are computed from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Display scaling applied to every frame.
    pub fn scale(&self) -> &DisplayScale {
        &self.scale
    }

    /// Compute the frame for wall-clock time `wall_ms` under `clock`.
    ///
    /// All bodies are evaluated at the same simulated instant.
    pub fn frame(&self, clock: &SimClock, wall_ms: f64) -> SkyFrame {
        self.frame_at(clock.now(wall_ms), clock.simulated_elapsed_seconds(wall_ms))
    }

    /// Compute the frame at an explicit instant.
    ///
    /// `sim_elapsed_seconds` drives the Earth mesh spin.
    pub fn frame_at(&self, instant: SimInstant, sim_elapsed_seconds: f64) -> SkyFrame {
        let earth_rotation = earth_rotation_angle(sim_elapsed_seconds);
        let gmst = greenwich_mean_sidereal_time(instant);

        let sun = celestial_to_render(&sun_position(instant), self.scale.sun_distance);
        let moon = celestial_to_render(&moon_position(instant), self.scale.moon_distance);

        let outcomes = self.catalog.propagate_all(instant);
        let mut satellites = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(inertial) => {
                    let geodetic = inertial_to_geodetic(&inertial, gmst);
                    satellites.push((id, geodetic_to_render(&geodetic, gmst, &self.scale)));
                }
                Err(error) => {
                    trace!(id, %error, "Skipped object this frame");
                    skipped.push((id, error));
                }
            }
        }

        let stats = FrameStats {
            tracked: satellites.len(),
            skipped: skipped.len(),
            build_failures: self.catalog.rejected().len(),
        };
        debug!(
            instant_ms = instant.unix_millis(),
            tracked = stats.tracked,
            skipped = stats.skipped,
            build_failures = stats.build_failures,
            "Frame computed"
        );

        SkyFrame {
            instant,
            earth_rotation,
            gmst,
            sun,
            sun_light: sun,
            moon,
            satellites,
            skipped,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS: &str = "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    fn iss_sky() -> Sky {
        Sky::new(Catalog::from_text(ISS), DisplayScale::default())
    }

    #[test]
    fn test_sun_light_matches_sun() {
        let frame = iss_sky().frame_at(SimInstant::J2000, 0.0);
        assert_eq!(frame.sun, frame.sun_light);
        assert!((frame.sun.length() - 50.0).abs() < 1e-9);
        assert!((frame.moon.length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_satellite_above_display_earth() {
        let sky = iss_sky();
        let epoch = sky.catalog().objects()[0].state.epoch();
        let frame = sky.frame_at(epoch.plus_seconds(600.0), 600.0);
        assert_eq!(frame.satellites.len(), 1);
        assert!(frame.skipped.is_empty());
        let r = frame.satellites[0].1.length();
        // ~420 km altitude on a 5-unit Earth.
        assert!(r > 5.2 && r < 5.5, "render radius {r}");
    }

    #[test]
    fn test_frame_uses_clock() {
        let sky = iss_sky();
        let epoch = sky.catalog().objects()[0].state.epoch();
        let clock = SimClock::new(0.0, epoch.unix_millis(), 10.0);
        let frame = sky.frame(&clock, 43_200.0);
        assert_eq!(frame.instant, epoch.plus_seconds(432.0));
        assert!((frame.earth_rotation - earth_rotation_angle(432.0)).abs() < 1e-9);
    }

    #[test]
    fn test_failed_propagation_is_skipped_alone() {
        // The drag-free copy keeps its orbit; the ISS decays far before epoch.
        let text = format!(
            "{ISS}
NO DRAG
1 99999U 20001A   20194.88612269  .00000000  00000-0  00000-0 0  9996
2 99999  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896 10003"
        );
        let sky = Sky::new(Catalog::from_text(&text), DisplayScale::default());
        assert_eq!(sky.catalog().len(), 2);

        let epoch = sky.catalog().objects()[0].state.epoch();
        let frame = sky.frame_at(epoch.plus_seconds(-3.0e9), 0.0);

        let ids: Vec<ObjectId> = frame.satellites.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, [1]);
        assert_eq!(frame.skipped.len(), 1);
        assert_eq!(frame.skipped[0].0, 0);
        assert!(
            matches!(
                frame.skipped[0].1,
                PropagationError::Decayed { .. } | PropagationError::Propagation(_)
            ),
            "{:?}",
            frame.skipped[0].1
        );
        assert_eq!(
            frame.stats,
            FrameStats {
                tracked: 1,
                skipped: 1,
                build_failures: 0,
            }
        );
    }

    #[test]
    fn test_empty_sky_still_has_sun_and_moon() {
        let frame = Sky::default().frame_at(SimInstant::J2000, 0.0);
        assert!(frame.satellites.is_empty());
        assert_eq!(frame.stats, FrameStats::default());
        assert!(frame.sun.length() > 0.0);
    }
}
