//! Simulation settings
//!
//! Every tuning constant is supplied here at startup rather than baked into
//! the simulation. Persisted as JSON; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particles per ring per layer width
    pub fn particle_layout(&self) -> f32 {
        match self {
            QualityPreset::Low => 2.0,
            QualityPreset::Medium => PARTICLE_LAYOUT,
            QualityPreset::High => 8.0,
        }
    }

    /// Maximum concurrent pop bursts
    pub fn burst_capacity(&self) -> usize {
        match self {
            QualityPreset::Low => 16,
            QualityPreset::Medium => BURST_CAPACITY,
            QualityPreset::High => 256,
        }
    }
}

/// How a regular bubble responds to touching the growing bubble.
///
/// The growing bubble itself never moves in response to a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GrowingCollision {
    /// Other bubble's velocity is negated, then it is pushed clear
    #[default]
    Negate,
    /// Equal-mass exchange along the normal with the growing bubble's
    /// velocity held at zero, then pushed clear
    Exchange,
    /// Growing bubble does not interact with other bubbles
    Ignore,
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; `None` seeds from the clock at startup
    pub seed: Option<u64>,
    /// Preset the burst fields were derived from
    pub quality: QualityPreset,

    // === Capacity ===
    pub bubble_capacity: usize,
    pub burst_capacity: usize,

    // === Bubbles ===
    pub min_speed: f32,
    pub max_speed: f32,
    pub base_radius: f32,
    pub max_radius: f32,
    /// Sets of five bubbles created at startup
    pub starting_sets: u32,

    // === Growing ===
    pub max_growth: f32,
    pub growth_time: f32,

    // === Collisions ===
    pub spacing: f32,
    pub growing_collision: GrowingCollision,

    // === Color transitions ===
    pub transitions_enabled: bool,
    pub trans_time: f64,
    pub trans_immune_period: f64,

    // === Pop bursts ===
    pub pop_lifetime: f64,
    pub expand_mult: f32,
    pub layer_width: f32,
    pub particle_layout: f32,
    pub particle_radius: f32,

    // === Display ===
    /// Multiplies every length and speed (HiDPI content scale)
    pub content_scale: f32,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            quality: QualityPreset::Medium,

            bubble_capacity: BUBBLE_CAPACITY,
            burst_capacity: BURST_CAPACITY,

            min_speed: MIN_BUBBLE_SPEED,
            max_speed: MAX_BUBBLE_SPEED,
            base_radius: BASE_RADIUS,
            max_radius: MAX_RADIUS,
            starting_sets: 1,

            max_growth: MAX_GROWTH,
            growth_time: GROWTH_TIME,

            spacing: POST_COLLIDE_SPACING,
            growing_collision: GrowingCollision::Negate,

            transitions_enabled: true,
            trans_time: TRANS_TIME,
            trans_immune_period: TRANS_IMMUNE_PERIOD,

            pop_lifetime: POP_LIFETIME,
            expand_mult: EXPAND_MULT,
            layer_width: LAYER_WIDTH,
            particle_layout: PARTICLE_LAYOUT,
            particle_radius: PARTICLE_RADIUS,

            content_scale: 1.0,
            window_width: SCREEN_WIDTH,
            window_height: SCREEN_HEIGHT,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates burst density and pool size)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.particle_layout = preset.particle_layout();
        self.burst_capacity = preset.burst_capacity();
    }

    /// Scale a length or speed by the content scale
    #[inline]
    pub fn scaled(&self, v: f32) -> f32 {
        v * self.content_scale
    }

    /// Growing bubble radius increase per second
    pub fn growth_rate(&self) -> f32 {
        self.scaled(self.max_growth) / self.growth_time
    }

    /// Particle draw radius increase per second
    pub fn particle_growth_rate(&self) -> f32 {
        self.expand_mult / self.pop_lifetime as f32
    }

    /// Upper bound on particles in a burst from the largest poppable bubble.
    /// Ring `k` holds `particle_layout * k` particles.
    pub fn burst_particle_bound(&self) -> f64 {
        let largest = self.scaled(self.max_growth).max(self.scaled(self.max_radius)) as f64;
        let rings = (largest / self.layer_width as f64).floor();
        1.0 + self.particle_layout as f64 * rings * (rings + 1.0) / 2.0
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.bubble_capacity == 0 || self.burst_capacity == 0 {
            return invalid("capacities must be at least 1");
        }
        if self.bubble_capacity > MAX_CAPACITY || self.burst_capacity > MAX_CAPACITY {
            return invalid("capacities must not exceed MAX_CAPACITY");
        }
        let lengths = [
            self.min_speed,
            self.max_speed,
            self.base_radius,
            self.max_radius,
            self.max_growth,
            self.growth_time,
            self.spacing,
            self.expand_mult,
            self.layer_width,
            self.particle_layout,
            self.particle_radius,
            self.content_scale,
            self.window_width,
            self.window_height,
        ];
        let durations = [self.trans_time, self.trans_immune_period, self.pop_lifetime];
        if lengths.iter().any(|v| !self.scaled(*v).is_finite())
            || durations.iter().any(|v| !v.is_finite())
        {
            return invalid("values must be finite");
        }
        if self.base_radius <= 0.0 || self.max_radius < self.base_radius {
            return invalid("radius range must satisfy 0 < base_radius <= max_radius");
        }
        if self.min_speed < 0.0 || self.max_speed < self.min_speed {
            return invalid("speed range must satisfy 0 <= min_speed <= max_speed");
        }
        if self.max_growth <= self.base_radius {
            return invalid("max_growth must exceed base_radius");
        }
        if self.growth_time <= 0.0 || self.trans_time <= 0.0 || self.pop_lifetime <= 0.0 {
            return invalid("durations must be positive");
        }
        if self.trans_immune_period < 0.0 || self.spacing < 0.0 {
            return invalid("trans_immune_period and spacing must not be negative");
        }
        if self.layer_width <= 0.0 || self.particle_layout < 0.0 {
            return invalid("layer_width must be positive and particle_layout not negative");
        }
        if self.content_scale <= 0.0 {
            return invalid("content_scale must be positive");
        }
        if self.burst_particle_bound() > MAX_BURST_PARTICLES as f64 {
            return invalid("largest burst would exceed MAX_BURST_PARTICLES");
        }
        if self.window_width <= 0.0 || self.window_height <= 0.0 {
            return invalid("window size must be positive");
        }
        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{} ({}), using default settings", e, path.as_ref().display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
