//! Simulation clock: maps wall-clock time to simulated time under a scale factor.
//!
//! A single [`SimClock`] is shared by every body for a frame. Changing the
//! scale rebases the clock at the moment of change, so simulated time never
//! jumps:
//!
//! ```text
//! sim(wall) = rebase_sim + (wall - rebase_wall) * scale
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::instant::SimInstant;

/// Largest accepted time-scale factor. Larger requests are clamped.
pub const MAX_TIME_SCALE: f64 = 1_000_000.0;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn wall_clock_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Clamp a requested scale factor into `[0, MAX_TIME_SCALE]`. NaN maps to 0.
pub fn clamp_scale(factor: f64) -> f64 {
    if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, MAX_TIME_SCALE)
    }
}

/// Time-scaled simulation clock.
#[derive(Clone, Debug, PartialEq)]
pub struct SimClock {
    /// Wall time at which the session started (ms).
    origin_wall_ms: f64,
    /// Simulated time at session start (ms).
    origin_sim_ms: f64,
    /// Wall time of the last rebase (ms).
    rebase_wall_ms: f64,
    /// Simulated time at the last rebase (ms).
    rebase_sim_ms: f64,
    /// Current scale factor.
    scale: f64,
    /// Scale remembered across a pause.
    paused_scale: Option<f64>,
}

impl SimClock {
    /// Create a clock whose simulated time equals `start_sim_ms` at wall time
    /// `start_wall_ms`.
    pub fn new(start_wall_ms: f64, start_sim_ms: f64, scale: f64) -> Self {
        Self {
            origin_wall_ms: start_wall_ms,
            origin_sim_ms: start_sim_ms,
            rebase_wall_ms: start_wall_ms,
            rebase_sim_ms: start_sim_ms,
            scale: clamp_scale(scale),
            paused_scale: None,
        }
    }

    /// Create a clock that starts at the current real time.
    pub fn starting_now(scale: f64) -> Self {
        let now = wall_clock_millis();
        Self::new(now, now, scale)
    }

    /// Create a clock that starts now in wall time but at `epoch` in
    /// simulated time.
    pub fn with_start_epoch(epoch: SimInstant, scale: f64) -> Self {
        Self::new(wall_clock_millis(), epoch.unix_millis(), scale)
    }

    /// Simulated instant for the given wall time.
    pub fn now(&self, wall_ms: f64) -> SimInstant {
        SimInstant::from_unix_millis(
            self.rebase_sim_ms + (wall_ms - self.rebase_wall_ms) * self.scale,
        )
    }

    /// Simulated instant for the current system time.
    pub fn now_system(&self) -> SimInstant {
        self.now(wall_clock_millis())
    }

    /// Change the scale factor at wall time `wall_ms`.
    ///
    /// The clock is rebased to `(wall_ms, now(wall_ms))` before the new factor
    /// applies. The factor is clamped, never rejected.
    pub fn set_scale(&mut self, factor: f64, wall_ms: f64) {
        let clamped = clamp_scale(factor);
        let sim_at_change = self.now(wall_ms).unix_millis();
        self.rebase_wall_ms = wall_ms;
        self.rebase_sim_ms = sim_at_change;
        self.scale = clamped;
        self.paused_scale = None;
        debug!(
            requested = factor,
            scale = clamped,
            sim_ms = sim_at_change,
            "Time scale changed"
        );
    }

    /// Current scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Freeze simulated time at `wall_ms`, remembering the current scale.
    pub fn pause(&mut self, wall_ms: f64) {
        if self.paused_scale.is_some() {
            return;
        }
        let previous = self.scale;
        self.set_scale(0.0, wall_ms);
        self.paused_scale = Some(previous);
    }

    /// Resume at the scale that was active before [`pause`](Self::pause).
    pub fn resume(&mut self, wall_ms: f64) {
        if let Some(previous) = self.paused_scale.take() {
            self.set_scale(previous, wall_ms);
        }
    }

    /// Whether the clock is paused.
    pub fn is_paused(&self) -> bool {
        self.paused_scale.is_some()
    }

    /// Simulated seconds elapsed since the session origin.
    pub fn simulated_elapsed_seconds(&self, wall_ms: f64) -> f64 {
        (self.now(wall_ms).unix_millis() - self.origin_sim_ms) / 1000.0
    }

    /// Wall time at session start (ms).
    pub fn origin_wall_ms(&self) -> f64 {
        self.origin_wall_ms
    }

    /// Simulated instant at session start.
    pub fn origin(&self) -> SimInstant {
        SimInstant::from_unix_millis(self.origin_sim_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS_MS: f64 = 1e-6;

    #[test]
    fn test_scale_one_tracks_wall_time() {
        let clock = SimClock::new(1_000.0, 1_000.0, 1.0);
        let elapsed = clock.now(61_000.0).unix_millis() - 1_000.0;
        assert!((elapsed - 60_000.0).abs() < EPS_MS);
    }

    #[test]
    fn test_scale_thousand_over_one_second() {
        let clock = SimClock::new(0.0, 0.0, 1000.0);
        let sim_elapsed_s = clock.simulated_elapsed_seconds(1_000.0);
        assert!(
            (sim_elapsed_s - 1000.0).abs() < 1e-9,
            "expected ~1000 s, got {sim_elapsed_s}"
        );
    }

    #[test]
    fn test_set_scale_is_continuous() {
        let mut clock = SimClock::new(0.0, 5_000.0, 1.0);
        let changes = [(1_500.0, 10.0), (3_250.0, 1000.0), (3_900.0, 1.0), (8_000.0, 250.0)];
        for (wall, factor) in changes {
            let before = clock.now(wall).unix_millis();
            clock.set_scale(factor, wall);
            let after = clock.now(wall).unix_millis();
            assert!(
                (before - after).abs() < EPS_MS,
                "jump at wall={wall}: {before} -> {after}"
            );
        }
    }

    #[test]
    fn test_new_scale_applies_after_rebase() {
        let mut clock = SimClock::new(0.0, 0.0, 1.0);
        clock.set_scale(100.0, 2_000.0);
        // 2 s at 1x, then 1 s at 100x.
        let sim = clock.now(3_000.0).unix_millis();
        assert!((sim - (2_000.0 + 100_000.0)).abs() < EPS_MS);
    }

    #[test]
    fn test_monotonic_for_non_negative_scale() {
        let mut clock = SimClock::new(0.0, 0.0, 3.0);
        let mut prev = clock.now(0.0);
        for step in 1..200 {
            let wall = step as f64 * 16.0;
            if step % 50 == 0 {
                clock.set_scale((step / 50) as f64 * 7.0, wall);
            }
            let now = clock.now(wall);
            assert!(now >= prev, "time went backwards at step {step}");
            prev = now;
        }
    }

    #[test]
    fn test_scale_is_clamped_not_rejected() {
        let mut clock = SimClock::new(0.0, 0.0, 1.0);
        clock.set_scale(-5.0, 100.0);
        assert_eq!(clock.scale(), 0.0);
        clock.set_scale(f64::NAN, 200.0);
        assert_eq!(clock.scale(), 0.0);
        clock.set_scale(f64::INFINITY, 300.0);
        assert_eq!(clock.scale(), MAX_TIME_SCALE);
        assert!(clock.now(300.0).unix_millis().is_finite());
    }

    #[test]
    fn test_fractional_scale_accepted() {
        let mut clock = SimClock::new(0.0, 0.0, 1.0);
        clock.set_scale(0.5, 0.0);
        assert!((clock.now(2_000.0).unix_millis() - 1_000.0).abs() < EPS_MS);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut clock = SimClock::new(0.0, 0.0, 10.0);
        clock.pause(1_000.0);
        assert!(clock.is_paused());
        let frozen = clock.now(1_000.0).unix_millis();
        assert!((clock.now(9_000.0).unix_millis() - frozen).abs() < EPS_MS);

        clock.resume(9_000.0);
        assert!(!clock.is_paused());
        assert_eq!(clock.scale(), 10.0);
        assert!((clock.now(10_000.0).unix_millis() - (frozen + 10_000.0)).abs() < EPS_MS);
    }

    #[test]
    fn test_elapsed_is_relative_to_origin() {
        let clock = SimClock::new(500.0, 946_728_000_000.0, 1.0);
        assert!(clock.simulated_elapsed_seconds(500.0).abs() < 1e-12);
        assert!((clock.simulated_elapsed_seconds(2_500.0) - 2.0).abs() < 1e-9);
        assert_eq!(clock.origin().unix_millis(), 946_728_000_000.0);
    }
}
