//! Simulated timestamps and Julian date conversions.

use chrono::{DateTime, Utc};

/// Milliseconds in one day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian date of the Unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian date of the J2000.0 reference epoch (2000-01-01T12:00:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// A point in simulated time, stored as milliseconds since the Unix epoch.
///
/// Instants are produced by [`SimClock`](crate::SimClock) once per frame and
/// consumed by every position model for that frame.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct SimInstant(f64);

impl SimInstant {
    /// The Unix epoch.
    pub const UNIX_EPOCH: Self = Self(0.0);

    /// The J2000.0 reference epoch.
    pub const J2000: Self = Self((J2000_JD - UNIX_EPOCH_JD) * MS_PER_DAY);

    /// Create an instant from milliseconds since the Unix epoch.
    pub const fn from_unix_millis(ms: f64) -> Self {
        Self(ms)
    }

    /// Create an instant from a Julian date.
    pub fn from_julian_date(jd: f64) -> Self {
        Self((jd - UNIX_EPOCH_JD) * MS_PER_DAY)
    }

    /// Create an instant from a UTC date-time.
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self(dt.timestamp_micros() as f64 / 1000.0)
    }

    /// Milliseconds since the Unix epoch.
    pub const fn unix_millis(self) -> f64 {
        self.0
    }

    /// Julian date.
    pub fn julian_date(self) -> f64 {
        self.0 / MS_PER_DAY + UNIX_EPOCH_JD
    }

    /// Days elapsed since J2000.0.
    pub fn days_since_j2000(self) -> f64 {
        self.julian_date() - J2000_JD
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn julian_centuries(self) -> f64 {
        self.days_since_j2000() / DAYS_PER_JULIAN_CENTURY
    }

    /// Convert to a UTC date-time. Returns `None` outside chrono's range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if !self.0.is_finite() {
            return None;
        }
        DateTime::from_timestamp_micros((self.0 * 1000.0).round() as i64)
    }

    /// Signed minutes from `earlier` to `self`.
    pub fn minutes_since(self, earlier: SimInstant) -> f64 {
        (self.0 - earlier.0) / 60_000.0
    }

    /// Shift by a number of seconds.
    pub fn plus_seconds(self, seconds: f64) -> Self {
        Self(self.0 + seconds * 1000.0)
    }
}
