//! Platform boundary
//!
//! Supplies the simulation with time and converts window coordinates.
//! Windowing and GPU setup live outside this crate.

use std::time::Instant;

use glam::Vec2;

/// Largest step handed to the simulation; longer stalls are clipped
pub const MAX_FRAME_DT: f32 = 0.1;

/// Monotonic timebase in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to (headless runs, tests)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { now: start }
    }

    pub fn advance(&mut self, seconds: f64) {
        self.now += seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }
}

/// Turns successive clock readings into per-frame `dt`
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last: Option<f64>,
    /// `dt` reported for the very first frame
    pub first_dt: f32,
}

impl FrameTimer {
    pub fn new(first_dt: f32) -> Self {
        Self {
            last: None,
            first_dt,
        }
    }

    /// `(dt, now)` for the frame starting now. `dt` is clamped to
    /// `[0, MAX_FRAME_DT]`.
    pub fn frame<C: Clock + ?Sized>(&mut self, clock: &C) -> (f32, f64) {
        let now = clock.now();
        let dt = match self.last {
            Some(last) => (now - last) as f32,
            None => self.first_dt,
        };
        self.last = Some(now);
        (dt.clamp(0.0, MAX_FRAME_DT), now)
    }
}

/// Window pixel coordinates (origin top-left, Y down) to simulation
/// coordinates (origin bottom-left, Y up)
pub fn to_sim_coords(x: f32, y: f32, window_height: f32) -> Vec2 {
    Vec2::new(x, window_height - y)
}
