//! Earth rotation: the display spin angle and Greenwich mean sidereal time.

use std::f64::consts::TAU;

use crate::instant::{DAYS_PER_JULIAN_CENTURY, SECONDS_PER_DAY, SimInstant};

// IAU-82 GMST polynomial in degrees: value at J2000, rate per day, T² term.
const GMST_BASE_DEG: f64 = 280.460_618_37;
const GMST_ROTATION_PER_DAY: f64 = 360.985_647_366_29;
const GMST_CORRECTION: f64 = 0.000_387_933;

/// Earth spin angle in radians after `sim_elapsed_seconds` of simulated time.
///
/// One full turn per 86 400 s. Not wrapped.
pub fn earth_rotation_angle(sim_elapsed_seconds: f64) -> f64 {
    TAU * sim_elapsed_seconds / SECONDS_PER_DAY
}

/// Greenwich mean sidereal time (IAU-82) in radians, wrapped to `[0, 2π)`.
pub fn greenwich_mean_sidereal_time(instant: SimInstant) -> f64 {
    let days = instant.days_since_j2000();
    let centuries = days / DAYS_PER_JULIAN_CENTURY;
    let gmst_degrees = GMST_BASE_DEG
        + GMST_ROTATION_PER_DAY * days
        + GMST_CORRECTION * centuries * centuries
        - centuries * centuries * centuries / 38_710_000.0;
    gmst_degrees.rem_euclid(360.0).to_radians()
}
