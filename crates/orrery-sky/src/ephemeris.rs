//! Low-precision analytic Sun and Moon positions.
//!
//! Both models are short polynomials in Julian centuries since J2000.0 and
//! are meant for visual placement only. Precision degrades slowly away from
//! the reference epoch; the functions always return a value.
//!
//! The Sun's `latitude` is the declination-like angle `asin(sin λ · sin ε)`.
//! The Moon's angles are ecliptic longitude and latitude used directly,
//! without the ecliptic-to-equatorial rotation.

use crate::instant::SimInstant;

/// Angular position of a celestial body, in radians. Angles are not wrapped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CelestialAngularPosition {
    /// Longitude-like angle.
    pub longitude: f64,
    /// Latitude-like angle.
    pub latitude: f64,
}

/// Geometric mean longitude of the Sun in degrees (unwrapped).
pub fn sun_mean_longitude_deg(t: f64) -> f64 {
    280.46646 + 36_000.76983 * t
}

/// Mean anomaly of the Sun in degrees (unwrapped).
pub fn sun_mean_anomaly_deg(t: f64) -> f64 {
    357.52911 + 35_999.05029 * t
}

/// Eccentricity of the Earth's orbit.
pub fn sun_orbit_eccentricity(t: f64) -> f64 {
    0.016_708_634 - 0.000_042_037 * t
}

/// Mean obliquity of the ecliptic in degrees.
pub fn mean_obliquity_deg(t: f64) -> f64 {
    23.439_281 - 0.013_004_2 * t
}

/// Sun position at `instant`.
pub fn sun_position(instant: SimInstant) -> CelestialAngularPosition {
    let t = instant.julian_centuries();
    let l0 = sun_mean_longitude_deg(t);
    let m = sun_mean_anomaly_deg(t).to_radians();

    // Equation of center.
    let c = (1.914_602 - 0.004_817 * t) * m.sin() + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin();

    let lambda = (l0 + c).to_radians();
    let epsilon = mean_obliquity_deg(t).to_radians();

    CelestialAngularPosition {
        longitude: lambda,
        latitude: (lambda.sin() * epsilon.sin()).asin(),
    }
}

/// Moon position at `instant`.
pub fn moon_position(instant: SimInstant) -> CelestialAngularPosition {
    let t = instant.julian_centuries();
    let mean_longitude = 218.316_459_1 + 481_267.881_342_36 * t;
    let mean_anomaly = (134.963_411_4 + 477_198.867_631_3 * t).to_radians();
    let argument_of_latitude = (93.272_099_3 + 483_202.017_527_3 * t).to_radians();
    let elongation = (297.850_204_2 + 445_267.111_516_8 * t).to_radians();

    // Two leading periodic terms: equation of center and evection.
    let lambda = mean_longitude
        + 6.288_75 * mean_anomaly.sin()
        + 1.274_02 * (2.0 * elongation - mean_anomaly).sin();
    let beta = 5.128_19 * argument_of_latitude.sin();

    CelestialAngularPosition {
        longitude: lambda.to_radians(),
        latitude: beta.to_radians(),
    }
}
