//! Field state: everything one simulation owns
//!
//! A `FieldState` is built once from `Settings` and a seed, then advanced by
//! `tick`. Nothing here is global; two fields never share state.

use super::arena::{Bubble, BubbleArena, BubbleSpawn};
use super::burst::{BurstLayout, BurstPool};
use super::interaction::Interaction;
use super::physics::{Bounds, CollisionPolicy};
use crate::error::ConfigError;
use crate::settings::Settings;

/// Fractional positions of one starting set
const STARTING_SET: [(f32, f32); 5] = [
    (0.25, 0.25),
    (0.75, 0.25),
    (0.25, 0.75),
    (0.75, 0.75),
    (0.5, 0.5),
];

#[derive(Debug, Clone)]
pub struct FieldState {
    /// Seed the arena RNG was created with
    pub seed: u64,
    pub settings: Settings,
    pub arena: BubbleArena,
    pub interaction: Interaction,
    pub bursts: BurstPool,
    pub bounds: Bounds,
    pub policy: CollisionPolicy,
    /// Freezes integration only; everything else keeps running
    pub paused_movement: bool,
    /// Timestamp of the last tick
    pub time: f64,
    /// Ticks run so far
    pub frame: u64,
}

impl FieldState {
    /// Build a field and place the starting bubbles
    pub fn new(settings: Settings, seed: u64) -> Self {
        let bounds = Bounds::new(settings.window_width, settings.window_height);
        let mut state = Self {
            seed,
            arena: BubbleArena::new(
                settings.bubble_capacity,
                BubbleSpawn::from_settings(&settings),
                seed,
            ),
            interaction: Interaction::new(),
            bursts: BurstPool::new(settings.burst_capacity, BurstLayout::from_settings(&settings)),
            bounds,
            policy: CollisionPolicy::from_settings(&settings),
            paused_movement: false,
            time: 0.0,
            frame: 0,
            settings,
        };
        state.spawn_starting_bubbles();
        log::info!(
            "Field {}x{} seeded with {} ({} bubbles)",
            bounds.width,
            bounds.height,
            seed,
            state.arena.alive_count()
        );
        state
    }

    fn spawn_starting_bubbles(&mut self) {
        for _ in 0..self.settings.starting_sets {
            for (fx, fy) in STARTING_SET {
                if let Err(e) = self.arena.create(self.bounds.at(fx, fy)) {
                    log::debug!("Stopped placing starting bubbles: {}", e);
                    return;
                }
            }
        }
    }

    /// The bubble growing under the pointer, if any
    pub fn growing(&self) -> Option<&Bubble> {
        self.interaction.growing()
    }

    /// Growing bubble radius increase per second
    pub fn growth_rate(&self) -> f32 {
        self.settings.growth_rate()
    }

    /// Radius at which a growing bubble pops itself
    pub fn max_growth(&self) -> f32 {
        self.settings.scaled(self.settings.max_growth)
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        if bounds != self.bounds {
            log::debug!("Bounds {}x{}", bounds.width, bounds.height);
            self.bounds = bounds;
        }
    }

    /// Swap in new tuning. Live bubbles and bursts are kept; capacities can
    /// only grow past what is already allocated.
    pub fn reload_settings(&mut self, settings: Settings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.arena
            .retune(BubbleSpawn::from_settings(&settings), settings.bubble_capacity);
        self.bursts
            .retune(BurstLayout::from_settings(&settings), settings.burst_capacity);
        self.policy = CollisionPolicy::from_settings(&settings);
        self.settings = settings;
        log::info!("Settings reloaded ({} preset)", self.settings.quality.as_str());
        Ok(())
    }
}
