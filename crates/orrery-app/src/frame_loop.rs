//! Fixed-rate frame loop for the headless shell.
//!
//! Each frame reads the wall clock once and hands it to the frame callback.
//! When the callback finishes early the loop sleeps out the rest of the frame
//! interval; late frames are counted and never caught up.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use orrery_sky::wall_clock_millis;
use tracing::warn;

/// Overrun beyond the frame interval that is worth a warning.
pub const MAX_FRAME_OVERRUN: Duration = Duration::from_millis(250);

/// Frame interval for a target rate. `0` means unpaced.
pub fn frame_interval(target_fps: u32) -> Option<Duration> {
    (target_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(target_fps)))
}

/// Time left to sleep after a frame that took `spent`. `None` when the frame
/// used the whole interval.
pub fn pacing_delay(spent: Duration, interval: Duration) -> Option<Duration> {
    interval.checked_sub(spent).filter(|d| !d.is_zero())
}

/// Paced frame loop state.
#[derive(Debug)]
pub struct FrameLoop {
    interval: Option<Duration>,
    frame_limit: Option<u64>,
    frame_count: u64,
    late_frames: u64,
}

impl FrameLoop {
    /// `frames == 0` runs until the callback breaks.
    pub fn new(target_fps: u32, frames: u64) -> Self {
        Self {
            interval: frame_interval(target_fps),
            frame_limit: (frames > 0).then_some(frames),
            frame_count: 0,
            late_frames: 0,
        }
    }

    /// Run frames until the limit is reached or `frame_fn` breaks.
    ///
    /// `frame_fn(frame_index, wall_ms)` is called once per frame.
    pub fn run(&mut self, mut frame_fn: impl FnMut(u64, f64) -> ControlFlow<()>) {
        while !self.is_finished() {
            let started = Instant::now();
            let flow = frame_fn(self.frame_count, wall_clock_millis());
            self.frame_count += 1;
            if flow.is_break() {
                break;
            }

            let Some(interval) = self.interval else {
                continue;
            };
            let spent = started.elapsed();
            match pacing_delay(spent, interval) {
                Some(delay) => std::thread::sleep(delay),
                None => {
                    self.late_frames += 1;
                    if spent > interval + MAX_FRAME_OVERRUN {
                        warn!(
                            "Frame took {:.1}ms, budget {:.1}ms",
                            spent.as_secs_f64() * 1000.0,
                            interval.as_secs_f64() * 1000.0
                        );
                    }
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.frame_limit.is_some_and(|limit| self.frame_count >= limit)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames that exceeded the interval.
    pub fn late_frames(&self) -> u64 {
        self.late_frames
    }
}
