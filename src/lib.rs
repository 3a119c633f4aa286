//! Bubbl - an interactive field of elastic bubbles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arena, collisions, growth, pop bursts)
//! - `renderer`: Instance records and the batch renderer contract
//! - `platform`: Timebase and window bounds contracts
//! - `settings`: Data-driven tuning, loaded from JSON

pub mod color;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use color::Color;
pub use error::{CapacityError, ConfigError};
pub use settings::{GrowingCollision, QualityPreset, Settings};

use glam::Vec2;

/// Default tuning constants (all lengths in pixels at content scale 1.0)
pub mod consts {
    /// Regular bubble slots in the arena
    pub const BUBBLE_CAPACITY: usize = 128;
    /// Concurrent pop bursts
    pub const BURST_CAPACITY: usize = 64;
    /// Largest capacity settings may ask for, per pool
    pub const MAX_CAPACITY: usize = 4096;
    /// Particles in a single burst never exceed this
    pub const MAX_BURST_PARTICLES: usize = 20_000;

    /// Per-axis speed range for new bubbles (pixels/s)
    pub const MIN_BUBBLE_SPEED: f32 = 150.0;
    pub const MAX_BUBBLE_SPEED: f32 = 350.0;

    /// Radius range for new bubbles
    pub const BASE_RADIUS: f32 = 35.0;
    pub const MAX_RADIUS: f32 = 50.0;

    /// Growing bubble pops itself at this radius
    pub const MAX_GROWTH: f32 = 200.0;
    /// Seconds to grow from zero to MAX_GROWTH
    pub const GROWTH_TIME: f32 = 2.0;

    /// Gap left between two bubbles after separation
    pub const POST_COLLIDE_SPACING: f32 = 1.0;

    /// Color transition duration (seconds)
    pub const TRANS_TIME: f64 = 1.0;
    /// Cooldown after a transition before another may start (seconds)
    pub const TRANS_IMMUNE_PERIOD: f64 = 1.0;

    /// Pop burst lifetime (seconds)
    pub const POP_LIFETIME: f64 = 1.0;
    /// Particle expansion multiplier
    pub const EXPAND_MULT: f32 = 2.0;
    /// Distance between particle rings
    pub const LAYER_WIDTH: f32 = 10.0;
    /// Particles per ring per LAYER_WIDTH of ring radius
    pub const PARTICLE_LAYOUT: f32 = 5.0;
    /// Initial particle draw radius
    pub const PARTICLE_RADIUS: f32 = 5.0;

    /// Default window size
    pub const SCREEN_WIDTH: f32 = 1600.0;
    pub const SCREEN_HEIGHT: f32 = 900.0;
}

/// Unit vector pointing from `from` toward `to`, or `None` if they coincide
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// True if `point` lies strictly inside the circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    center.distance(point) < radius
}
