//! Frame transforms from inertial and angular positions into render space.
//!
//! Render space is Y-up. A point at latitude `lat` and rotation-corrected
//! longitude `θ` on a sphere of radius `r` maps to
//!
//! ```text
//! φ = π/2 - lat
//! x = r sinφ cosθ,  y = r cosφ,  z = r sinφ sinθ
//! ```
//!
//! Every function here is pure.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;

use crate::ephemeris::CelestialAngularPosition;
use crate::propagator::InertialPosition;

/// WGS-84 semi-major axis, km.
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS-84 semi-minor axis, km.
pub const WGS84_B_KM: f64 = 6356.752_314_2;

const GEODETIC_ITERATIONS: usize = 20;

/// Cartesian position in the shared display frame.
pub type RenderPosition = DVec3;

/// Position relative to the rotating Earth surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeodeticPosition {
    /// Geodetic latitude, radians.
    pub latitude: f64,
    /// Longitude, radians in `[-π, π)`.
    pub longitude: f64,
    /// Height above the ellipsoid, km.
    pub height_km: f64,
}

/// Scale between real-world kilometers and display units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayScale {
    /// Radius of the displayed Earth sphere.
    pub earth_radius: f64,
    /// Real mean Earth radius the display sphere stands for, km.
    pub real_earth_radius_km: f64,
    /// Fixed display distance of the Sun.
    pub sun_distance: f64,
    /// Fixed display distance of the Moon.
    pub moon_distance: f64,
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self {
            earth_radius: 5.0,
            real_earth_radius_km: 6371.0,
            sun_distance: 50.0,
            moon_distance: 10.0,
        }
    }
}

impl DisplayScale {
    /// Display units per real kilometer.
    pub fn height_scale(&self) -> f64 {
        self.earth_radius / self.real_earth_radius_km
    }
}

fn wrap_pi(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Convert an inertial position to geodetic coordinates at sidereal angle `gmst`.
pub fn inertial_to_geodetic(inertial: &InertialPosition, gmst: f64) -> GeodeticPosition {
    let DVec3 { x, y, z } = inertial.position_km;
    let f = (WGS84_A_KM - WGS84_B_KM) / WGS84_A_KM;
    let e2 = 2.0 * f - f * f;
    let r = (x * x + y * y).sqrt();

    let longitude = wrap_pi(y.atan2(x) - gmst);

    let mut latitude = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        latitude = (z + WGS84_A_KM * c * e2 * sin_lat).atan2(r);
    }

    let height_km = if latitude.cos().abs() > 1e-10 {
        r / latitude.cos() - WGS84_A_KM * c
    } else {
        z.abs() - WGS84_B_KM
    };

    GeodeticPosition {
        latitude,
        longitude,
        height_km,
    }
}

/// Inverse of [`inertial_to_geodetic`]: inertial km for a geodetic point.
pub fn geodetic_to_inertial(geodetic: &GeodeticPosition, gmst: f64) -> DVec3 {
    let f = (WGS84_A_KM - WGS84_B_KM) / WGS84_A_KM;
    let e2 = 2.0 * f - f * f;
    let (sin_lat, cos_lat) = geodetic.latitude.sin_cos();
    let n = WGS84_A_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let lon = geodetic.longitude + gmst;
    DVec3::new(
        (n + geodetic.height_km) * cos_lat * lon.cos(),
        (n + geodetic.height_km) * cos_lat * lon.sin(),
        (n * (1.0 - e2) + geodetic.height_km) * sin_lat,
    )
}

/// Project a point on a sphere of radius `radius` into render space.
pub fn spherical_to_render(latitude: f64, longitude: f64, radius: f64) -> RenderPosition {
    let phi = FRAC_PI_2 - latitude;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = longitude.sin_cos();
    DVec3::new(
        radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Render position of a satellite.
///
/// Height is scaled by [`DisplayScale::height_scale`] and added to the display
/// Earth radius; longitude is corrected by `rotation_angle`.
pub fn geodetic_to_render(
    geodetic: &GeodeticPosition,
    rotation_angle: f64,
    scale: &DisplayScale,
) -> RenderPosition {
    let radius = scale.earth_radius + geodetic.height_km * scale.height_scale();
    spherical_to_render(geodetic.latitude, geodetic.longitude + rotation_angle, radius)
}

/// Render position of the Sun or Moon at a fixed display distance.
pub fn celestial_to_render(angular: &CelestialAngularPosition, distance: f64) -> RenderPosition {
    let (sin_lat, cos_lat) = angular.latitude.sin_cos();
    let (sin_lon, cos_lon) = angular.longitude.sin_cos();
    DVec3::new(
        distance * cos_lat * cos_lon,
        distance * sin_lat,
        distance * cos_lat * sin_lon,
    )
}
