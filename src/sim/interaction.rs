//! Pointer interaction: popping, growing and committing bubbles
//!
//! Pressing on a bubble pops it. Pressing on empty space starts a new bubble
//! that grows under the pointer, follows it while held, and joins the arena
//! on release. A bubble grown past the limit pops itself.

use glam::Vec2;

use super::arena::{Bubble, BubbleArena, SlotIndex};
use crate::color::Color;

/// Where the pointer interaction currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// Nothing held, nothing waiting
    Idle,
    /// A bubble is growing under the pointer
    Growing,
    /// A bubble was destroyed and its burst has not been spawned yet
    PoppedPendingBurst,
}

/// What a pointer event did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    Popped(SlotIndex),
    StartedGrowing,
    Moved,
    Committed(SlotIndex),
    /// Released, but the arena had no room
    Discarded,
    Ignored,
}

/// Last known state of a destroyed bubble, waiting to become a burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPop {
    pub pos: Vec2,
    pub color: Color,
    pub radius: f32,
}

impl From<&Bubble> for PendingPop {
    fn from(b: &Bubble) -> Self {
        Self {
            pos: b.pos,
            color: b.color,
            radius: b.radius,
        }
    }
}

/// Growing bubble and pops not yet handed to the burst pool
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    growing: Option<Bubble>,
    pending: Vec<PendingPop>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        if self.growing.is_some() {
            InteractionState::Growing
        } else if !self.pending.is_empty() {
            InteractionState::PoppedPendingBurst
        } else {
            InteractionState::Idle
        }
    }

    /// The bubble currently growing under the pointer, if any
    pub fn growing(&self) -> Option<&Bubble> {
        self.growing.as_ref()
    }

    /// Hand pending pops to the caller, leaving none behind
    pub fn take_pending(&mut self) -> Vec<PendingPop> {
        std::mem::take(&mut self.pending)
    }

    /// Destroy a regular bubble and queue its burst
    pub fn pop(&mut self, arena: &mut BubbleArena, slot: SlotIndex) {
        let last = arena.destroy(slot);
        log::debug!("Popped bubble {} (radius {:.1})", slot.get(), last.radius);
        self.pending.push(PendingPop::from(&last));
    }

    pub fn pointer_down(&mut self, pos: Vec2, arena: &mut BubbleArena) -> PointerOutcome {
        if let Some(slot) = arena.bubble_at_point(pos) {
            self.pop(arena, slot);
            return PointerOutcome::Popped(slot);
        }
        self.growing = Some(arena.new_growing(pos));
        PointerOutcome::StartedGrowing
    }

    pub fn pointer_move(&mut self, pos: Vec2) -> PointerOutcome {
        match self.growing.as_mut() {
            Some(growing) => {
                growing.pos = pos;
                PointerOutcome::Moved
            }
            None => PointerOutcome::Ignored,
        }
    }

    /// Commit the growing bubble into the arena. It leaves the growing slot
    /// whether or not there was room.
    pub fn pointer_up(&mut self, arena: &mut BubbleArena) -> PointerOutcome {
        let Some(growing) = self.growing.take() else {
            return PointerOutcome::Ignored;
        };
        match arena.commit(growing) {
            Ok(slot) => PointerOutcome::Committed(slot),
            Err(e) => {
                log::debug!("Dropped released bubble: {}", e);
                PointerOutcome::Discarded
            }
        }
    }

    /// Grow the held bubble by `rate * dt`. At `max_radius` it pops itself.
    /// Returns true if it popped.
    pub fn grow(&mut self, dt: f32, rate: f32, max_radius: f32) -> bool {
        let Some(growing) = self.growing.as_mut() else {
            return false;
        };
        growing.radius += rate * dt;
        if growing.radius < max_radius {
            return false;
        }
        let popped = PendingPop::from(&*growing);
        self.growing = None;
        log::debug!("Growing bubble burst at radius {:.1}", popped.radius);
        self.pending.push(popped);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::arena::BubbleSpawn;

    fn arena(capacity: usize) -> BubbleArena {
        BubbleArena::new(capacity, BubbleSpawn::from_settings(&Settings::default()), 1)
    }

    #[test]
    fn test_click_on_bubble_pops_it() {
        let mut arena = arena(4);
        let mut interaction = Interaction::new();
        let slot = arena.create(Vec2::new(200.0, 200.0)).unwrap();
        let color = arena.get(slot).color;

        let outcome = interaction.pointer_down(Vec2::new(201.0, 199.0), &mut arena);
        assert_eq!(outcome, PointerOutcome::Popped(slot));
        assert!(!arena.is_alive(slot));
        assert_eq!(interaction.state(), InteractionState::PoppedPendingBurst);

        let pending = interaction.take_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].pos, Vec2::new(200.0, 200.0));
        assert_eq!(pending[0].color, color);
        assert_eq!(interaction.state(), InteractionState::Idle);
    }

    #[test]
    fn test_grow_follow_commit() {
        let mut arena = arena(4);
        let mut interaction = Interaction::new();

        let outcome = interaction.pointer_down(Vec2::new(50.0, 50.0), &mut arena);
        assert_eq!(outcome, PointerOutcome::StartedGrowing);
        assert_eq!(interaction.state(), InteractionState::Growing);
        assert_eq!(interaction.growing().unwrap().radius, arena.spawn().base_radius);

        assert_eq!(interaction.pointer_move(Vec2::new(80.0, 90.0)), PointerOutcome::Moved);
        assert!(!interaction.grow(0.5, 100.0, 200.0));

        let outcome = interaction.pointer_up(&mut arena);
        let PointerOutcome::Committed(slot) = outcome else {
            panic!("expected commit, got {:?}", outcome);
        };
        let committed = arena.get(slot);
        assert_eq!(committed.pos, Vec2::new(80.0, 90.0));
        assert_eq!(committed.radius, arena.spawn().base_radius + 50.0);
        assert!(interaction.growing().is_none());
    }

    #[test]
    fn test_release_without_room_discards() {
        let mut arena = arena(1);
        let mut interaction = Interaction::new();
        arena.create(Vec2::new(500.0, 500.0)).unwrap();

        interaction.pointer_down(Vec2::new(50.0, 50.0), &mut arena);
        assert_eq!(interaction.pointer_up(&mut arena), PointerOutcome::Discarded);
        assert_eq!(interaction.state(), InteractionState::Idle);
        assert_eq!(arena.alive_count(), 1);
    }

    #[test]
    fn test_move_and_release_while_idle_are_ignored() {
        let mut arena = arena(1);
        let mut interaction = Interaction::new();
        assert_eq!(interaction.pointer_move(Vec2::ONE), PointerOutcome::Ignored);
        assert_eq!(interaction.pointer_up(&mut arena), PointerOutcome::Ignored);
        assert!(!interaction.grow(1.0, 100.0, 200.0));
    }

    #[test]
    fn test_overgrown_bubble_pops_itself() {
        let mut arena = arena(1);
        let mut interaction = Interaction::new();
        interaction.pointer_down(Vec2::new(50.0, 50.0), &mut arena);

        let mut last = interaction.growing().unwrap().radius;
        let mut frames = 0;
        while !interaction.grow(0.1, 100.0, 200.0) {
            let r = interaction.growing().unwrap().radius;
            assert!(r > last);
            last = r;
            frames += 1;
            assert!(frames < 100);
        }
        assert!(interaction.growing().is_none());
        assert_eq!(interaction.state(), InteractionState::PoppedPendingBurst);
        let pending = interaction.take_pending();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].radius >= 200.0);
        assert_eq!(arena.count(), 0);
    }
}
