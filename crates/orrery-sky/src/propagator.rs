//! SGP4 orbital state construction and propagation.
//!
//! An [`OrbitalState`] is built once per element set at load time. Each frame
//! calls [`OrbitalState::propagate`], which is a pure function of the state
//! and the requested instant. Results are TEME inertial positions in km.

use std::sync::Arc;

use glam::DVec3;
use sgp4::{Constants, Elements, MinutesSinceEpoch};

use crate::elements::OrbitalElementSet;
use crate::error::PropagationError;
use crate::instant::{SECONDS_PER_DAY, SimInstant};

/// Earth equatorial radius (WGS-84), km.
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;

/// Earth gravitational parameter, km^3/s^2.
pub const EARTH_MU_KM3_S2: f64 = 398_600.4418;

/// Cartesian state in the Earth-centered inertial (TEME) frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InertialPosition {
    /// Position in kilometers.
    pub position_km: DVec3,
    /// Velocity in kilometers per second.
    pub velocity_km_s: DVec3,
    /// Instant the state is valid for.
    pub instant: SimInstant,
}

impl InertialPosition {
    /// Geocentric distance in kilometers.
    pub fn radius_km(&self) -> f64 {
        self.position_km.length()
    }
}

/// Semi-major axis implied by a mean motion in revolutions per day.
pub fn mean_motion_to_semi_major_axis_km(n_revs_per_day: f64) -> f64 {
    let n_rad_s = n_revs_per_day * std::f64::consts::TAU / SECONDS_PER_DAY;
    (EARTH_MU_KM3_S2 / (n_rad_s * n_rad_s)).cbrt()
}

/// Mean altitude above the equatorial radius for a circular orbit with the
/// given mean motion.
pub fn mean_motion_to_altitude_km(n_revs_per_day: f64) -> f64 {
    mean_motion_to_semi_major_axis_km(n_revs_per_day) - EARTH_EQUATORIAL_RADIUS_KM
}

/// Propagator state derived once from an element set.
#[derive(Clone)]
pub struct OrbitalState {
    name: String,
    norad_id: u64,
    mean_motion: f64,
    eccentricity: f64,
    inclination_deg: f64,
    constants: Arc<Constants>,
    epoch: SimInstant,
    perigee_radius_km: f64,
}

impl OrbitalState {
    /// Parse both element lines (fixed-format fields and checksums), then
    /// initialize SGP4.
    pub fn build(set: &OrbitalElementSet) -> Result<Self, PropagationError> {
        let elements = Elements::from_tle(
            Some(set.name.clone()),
            set.line1.as_bytes(),
            set.line2.as_bytes(),
        )
        .map_err(|e| PropagationError::InvalidElements(format!("{e:?}")))?;
        Self::from_elements(&set.name, elements)
    }

    /// Initialize from already-parsed elements.
    pub fn from_elements(name: &str, elements: Elements) -> Result<Self, PropagationError> {
        if elements.mean_motion.is_nan() || elements.mean_motion <= 0.0 {
            return Err(PropagationError::NegativeMeanMotion(elements.mean_motion));
        }

        let semi_major_axis = mean_motion_to_semi_major_axis_km(elements.mean_motion);
        let perigee_radius_km = semi_major_axis * (1.0 - elements.eccentricity);
        if perigee_radius_km < EARTH_EQUATORIAL_RADIUS_KM {
            return Err(PropagationError::Decayed {
                radius_km: perigee_radius_km,
            });
        }

        let constants = Constants::from_elements(&elements)
            .map_err(|e| PropagationError::Initialization(format!("{e:?}")))?;
        let epoch = SimInstant::from_datetime(&elements.datetime.and_utc());

        Ok(Self {
            name: name.to_string(),
            norad_id: elements.norad_id,
            mean_motion: elements.mean_motion,
            eccentricity: elements.eccentricity,
            inclination_deg: elements.inclination,
            constants: Arc::new(constants),
            epoch,
            perigee_radius_km,
        })
    }

    /// Inertial position at `instant`.
    ///
    /// Accuracy degrades with distance from the element epoch; that is a
    /// property of the model, not an error.
    pub fn propagate(&self, instant: SimInstant) -> Result<InertialPosition, PropagationError> {
        let minutes = instant.minutes_since(self.epoch);
        if !minutes.is_finite() {
            return Err(PropagationError::Singular);
        }

        let prediction = self
            .constants
            .propagate(MinutesSinceEpoch(minutes))
            .map_err(|e| PropagationError::Propagation(format!("{e:?}")))?;

        let position_km = DVec3::from_array(prediction.position);
        let velocity_km_s = DVec3::from_array(prediction.velocity);
        if !position_km.is_finite() || !velocity_km_s.is_finite() {
            return Err(PropagationError::Singular);
        }

        let radius_km = position_km.length();
        if radius_km < EARTH_EQUATORIAL_RADIUS_KM {
            return Err(PropagationError::Decayed { radius_km });
        }

        Ok(InertialPosition {
            position_km,
            velocity_km_s,
            instant,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog number from the element lines.
    pub fn norad_id(&self) -> u64 {
        self.norad_id
    }

    /// Element epoch.
    pub fn epoch(&self) -> SimInstant {
        self.epoch
    }

    /// Mean motion in revolutions per day.
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// Orbital eccentricity.
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Inclination in degrees.
    pub fn inclination_deg(&self) -> f64 {
        self.inclination_deg
    }

    /// Perigee altitude above the equatorial radius, km.
    pub fn perigee_altitude_km(&self) -> f64 {
        self.perigee_radius_km - EARTH_EQUATORIAL_RADIUS_KM
    }

    /// Absolute distance in days between `instant` and the element epoch.
    pub fn epoch_age_days(&self, instant: SimInstant) -> f64 {
        (instant.unix_millis() - self.epoch.unix_millis()).abs() / (SECONDS_PER_DAY * 1000.0)
    }
}

impl std::fmt::Debug for OrbitalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrbitalState")
            .field("name", &self.name)
            .field("norad_id", &self.norad_id)
            .field("epoch_ms", &self.epoch.unix_millis())
            .field("mean_motion", &self.mean_motion)
            .field("eccentricity", &self.eccentricity)
            .finish()
    }
}
