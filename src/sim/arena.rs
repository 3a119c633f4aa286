//! Fixed-capacity bubble arena with slot recycling
//!
//! Slots are allocated up to a high-water mark that never shrinks. A dead slot
//! below the mark is always reused before the mark is raised, and once the
//! mark reaches capacity further creation is refused.

use std::num::NonZeroUsize;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::color::Color;
use crate::consts::BUBBLE_CAPACITY;
use crate::error::CapacityError;
use crate::settings::Settings;

/// Index of a regular arena slot.
///
/// Regular slots are numbered from 1. The growing bubble lives outside the
/// arena, so no slot index ever refers to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(NonZeroUsize);

impl SlotIndex {
    /// Slot number (1-based)
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Build a slot index from its 1-based number
    pub fn new(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(SlotIndex)
    }

    fn from_offset(offset: usize) -> Self {
        SlotIndex(NonZeroUsize::MIN.saturating_add(offset))
    }

    fn offset(self) -> usize {
        self.0.get() - 1
    }
}

/// An in-flight color transition toward another bubble's color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Time the transition started (seconds)
    pub start: f64,
    /// Color being blended toward
    pub target: Color,
    /// Unit vector toward the bubble that triggered it (for the renderer)
    pub direction: Vec2,
}

/// A bubble record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Committed color
    pub color: Color,
    /// `None` while not transitioning
    pub transition: Option<Transition>,
    /// When the last transition committed; `None` if it never has
    pub last_transition_end: Option<f64>,
    pub alive: bool,
}

impl Bubble {
    /// True while a color transition is running (motion is frozen)
    #[inline]
    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether the transition cooldown has elapsed at `now`
    pub fn transition_ready(&self, now: f64, immune_period: f64) -> bool {
        self.last_transition_end
            .is_none_or(|end| now - end > immune_period)
    }

    /// Color the renderer blends toward (the committed color when idle)
    pub fn target_color(&self) -> Color {
        self.transition.map_or(self.color, |t| t.target)
    }

    /// Transition progress in [0, 1]; 0 when idle
    pub fn transition_percent(&self, now: f64, trans_time: f64) -> f32 {
        match self.transition {
            Some(t) => ((now - t.start) / trans_time).clamp(0.0, 1.0) as f32,
            None => 0.0,
        }
    }

    fn dead() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: 0.0,
            color: Color::BLACK,
            transition: None,
            last_transition_end: None,
            alive: false,
        }
    }
}

/// Ranges new bubbles are drawn from (already content-scaled)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleSpawn {
    pub min_speed: f32,
    pub max_speed: f32,
    pub base_radius: f32,
    pub max_radius: f32,
}

impl BubbleSpawn {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            min_speed: settings.scaled(settings.min_speed),
            max_speed: settings.scaled(settings.max_speed),
            base_radius: settings.scaled(settings.base_radius),
            max_radius: settings.scaled(settings.max_radius),
        }
    }

    /// A fresh bubble at `pos`. Growing bubbles start at the base radius.
    pub fn bubble<R: Rng + ?Sized>(&self, rng: &mut R, pos: Vec2, to_grow: bool) -> Bubble {
        let color = Color::random(rng);
        let radius = if to_grow {
            self.base_radius
        } else {
            rng.random_range(self.base_radius..=self.max_radius)
        };
        let vel = Vec2::new(self.random_speed(rng), self.random_speed(rng));
        Bubble {
            pos,
            vel,
            radius,
            color,
            transition: None,
            last_transition_end: None,
            alive: true,
        }
    }

    fn random_speed<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let sign = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        sign * rng.random_range(self.min_speed..=self.max_speed)
    }
}

/// Fixed-capacity storage for regular bubbles
#[derive(Debug, Clone)]
pub struct BubbleArena {
    /// Length is the high-water mark
    slots: Vec<Bubble>,
    capacity: usize,
    spawn: BubbleSpawn,
    rng: Pcg32,
}

impl BubbleArena {
    pub fn new(capacity: usize, spawn: BubbleSpawn, seed: u64) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(BUBBLE_CAPACITY)),
            capacity,
            spawn,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// High-water mark: slots ever allocated
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn alive_count(&self) -> usize {
        self.slots.iter().filter(|b| b.alive).count()
    }

    pub fn spawn(&self) -> &BubbleSpawn {
        &self.spawn
    }

    /// Replace spawn ranges and raise capacity. Capacity never drops below
    /// the high-water mark.
    pub fn retune(&mut self, spawn: BubbleSpawn, capacity: usize) {
        self.spawn = spawn;
        if capacity < self.slots.len() {
            log::warn!(
                "Bubble capacity {} below high-water mark {}, keeping {}",
                capacity,
                self.slots.len(),
                self.slots.len()
            );
        }
        self.capacity = capacity.max(self.slots.len());
    }

    /// Lowest dead slot, or the next unallocated one if there is room
    fn open_slot(&self) -> Result<usize, CapacityError> {
        if let Some(offset) = self.slots.iter().position(|b| !b.alive) {
            return Ok(offset);
        }
        if self.slots.len() < self.capacity {
            return Ok(self.slots.len());
        }
        Err(CapacityError::Bubbles {
            capacity: self.capacity,
        })
    }

    fn write(&mut self, offset: usize, bubble: Bubble) -> SlotIndex {
        if offset == self.slots.len() {
            self.slots.push(bubble);
        } else {
            self.slots[offset] = bubble;
        }
        SlotIndex::from_offset(offset)
    }

    /// Create a random bubble at `pos` in the lowest free slot
    pub fn create(&mut self, pos: Vec2) -> Result<SlotIndex, CapacityError> {
        let offset = self.open_slot()?;
        let bubble = self.spawn.bubble(&mut self.rng, pos, false);
        Ok(self.write(offset, bubble))
    }

    /// A bubble for growing under the pointer. Not stored in the arena.
    pub fn new_growing(&mut self, pos: Vec2) -> Bubble {
        self.spawn.bubble(&mut self.rng, pos, true)
    }

    /// Store an existing bubble record under the same recycling rule as `create`
    pub fn commit(&mut self, bubble: Bubble) -> Result<SlotIndex, CapacityError> {
        let offset = self.open_slot()?;
        Ok(self.write(
            offset,
            Bubble {
                alive: true,
                ..bubble
            },
        ))
    }

    fn checked_offset(&self, slot: SlotIndex) -> usize {
        let offset = slot.offset();
        assert!(
            offset < self.slots.len(),
            "slot {} beyond high-water mark {}",
            slot.get(),
            self.slots.len()
        );
        offset
    }

    /// Whether `slot` holds a live bubble. Panics past the high-water mark.
    pub fn is_alive(&self, slot: SlotIndex) -> bool {
        self.slots[self.checked_offset(slot)].alive
    }

    /// Live bubble at `slot`. Panics if the slot is dead or unallocated.
    pub fn get(&self, slot: SlotIndex) -> &Bubble {
        let bubble = &self.slots[self.checked_offset(slot)];
        assert!(bubble.alive, "read of dead slot {}", slot.get());
        bubble
    }

    /// Free `slot`, returning the record as it was. Panics if already dead.
    pub fn destroy(&mut self, slot: SlotIndex) -> Bubble {
        let last = *self.get(slot);
        let offset = slot.offset();
        self.slots[offset] = Bubble::dead();
        last
    }

    /// Live regular bubbles in slot order
    pub fn iter_alive(&self) -> impl Iterator<Item = (SlotIndex, &Bubble)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, b)| b.alive)
            .map(|(i, b)| (SlotIndex::from_offset(i), b))
    }

    /// First live bubble (slot order) whose center is within its radius of `point`
    pub fn bubble_at_point(&self, point: Vec2) -> Option<SlotIndex> {
        self.iter_alive()
            .find(|(_, b)| crate::point_in_circle(point, b.pos, b.radius))
            .map(|(slot, _)| slot)
    }

    /// All allocated slots, dead ones included, in slot order
    pub(crate) fn slots_mut(&mut self) -> &mut [Bubble] {
        &mut self.slots
    }
}
