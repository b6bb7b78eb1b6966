//! Time-scaled positions for the Sun, the Moon, Earth's rotation and a catalog
//! of SGP4-propagated satellites, expressed in one Y-up display frame.
//!
//! A frame is computed from a single simulated instant read off a shared
//! [`SimClock`]. Per-object failures never abort a frame.

mod catalog;
mod clock;
mod elements;
mod ephemeris;
mod error;
mod frame;
mod instant;
mod propagator;
mod rotation;
mod scene;

pub use catalog::{Catalog, ObjectId, PropagationOutcome, RejectedElementSet, TrackedObject};
pub use clock::{MAX_TIME_SCALE, SimClock, clamp_scale, wall_clock_millis};
pub use elements::{
    ElementSetIter, OrbitalElementSet, parse_element_sets, parse_element_sets_nonempty,
};
pub use ephemeris::{
    CelestialAngularPosition, mean_obliquity_deg, moon_position, sun_mean_anomaly_deg,
    sun_mean_longitude_deg, sun_orbit_eccentricity, sun_position,
};
pub use error::{ParseError, PropagationError};
pub use frame::{
    DisplayScale, GeodeticPosition, RenderPosition, WGS84_A_KM, WGS84_B_KM, celestial_to_render,
    geodetic_to_inertial, geodetic_to_render, inertial_to_geodetic, spherical_to_render,
};
pub use instant::{
    DAYS_PER_JULIAN_CENTURY, J2000_JD, MS_PER_DAY, SECONDS_PER_DAY, SimInstant, UNIX_EPOCH_JD,
};
pub use propagator::{
    EARTH_EQUATORIAL_RADIUS_KM, EARTH_MU_KM3_S2, InertialPosition, OrbitalState,
    mean_motion_to_altitude_km, mean_motion_to_semi_major_axis_km,
};
pub use rotation::{earth_rotation_angle, greenwich_mean_sidereal_time};
pub use scene::{FrameStats, Sky, SkyFrame};
