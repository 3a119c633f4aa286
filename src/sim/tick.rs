//! Per-frame simulation step
//!
//! One call runs the whole frame in a fixed order:
//! bounds and pause changes, pointer events, growth, integration,
//! transition completion, pair collisions, the growing-bubble pass,
//! burst spawning for this frame's pops, and burst updates.

use glam::Vec2;

use super::interaction::PointerOutcome;
use super::physics::{self, Bounds};
use super::state::FieldState;

/// Pointer events in simulation coordinates (origin bottom-left, Y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp(Vec2),
}

/// Everything the platform hands over for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Applied in order
    pub events: Vec<InputEvent>,
    /// Flip `paused_movement`
    pub toggle_pause: bool,
    /// New window bounds, applied before physics
    pub resize: Option<Bounds>,
}

/// What happened during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub popped: usize,
    pub committed: usize,
    pub discarded: usize,
    pub collisions: usize,
    pub transitions_finished: usize,
    pub bursts_spawned: usize,
    pub bursts_dropped: usize,
}

fn apply_event(state: &mut FieldState, event: InputEvent, stats: &mut FrameStats) {
    let outcome = match event {
        InputEvent::PointerDown(pos) => state.interaction.pointer_down(pos, &mut state.arena),
        InputEvent::PointerMove(pos) => state.interaction.pointer_move(pos),
        InputEvent::PointerUp(pos) => {
            state.interaction.pointer_move(pos);
            state.interaction.pointer_up(&mut state.arena)
        }
    };
    match outcome {
        PointerOutcome::Popped(_) => stats.popped += 1,
        PointerOutcome::Committed(_) => stats.committed += 1,
        PointerOutcome::Discarded => stats.discarded += 1,
        PointerOutcome::StartedGrowing | PointerOutcome::Moved | PointerOutcome::Ignored => {}
    }
}

/// Advance the field by `dt` seconds, ending at timestamp `now`
pub fn tick(state: &mut FieldState, input: &FrameInput, dt: f32, now: f64) -> FrameStats {
    let mut stats = FrameStats::default();

    if let Some(bounds) = input.resize {
        state.set_bounds(bounds);
    }
    if input.toggle_pause {
        state.paused_movement = !state.paused_movement;
        log::debug!("Movement paused: {}", state.paused_movement);
    }

    for &event in &input.events {
        apply_event(state, event, &mut stats);
    }

    let (rate, max_growth) = (state.growth_rate(), state.max_growth());
    if state.interaction.grow(dt, rate, max_growth) {
        stats.popped += 1;
    }

    let policy = state.policy;
    let trans_time = state.settings.trans_time;
    let bounds = state.bounds;
    let paused = state.paused_movement;
    {
        let bubbles = state.arena.slots_mut();
        if !paused {
            physics::integrate(bubbles, dt, bounds);
        }
        stats.transitions_finished = physics::complete_transitions(bubbles, now, trans_time);
        stats.collisions = physics::resolve_collisions(bubbles, &policy, now);
    }
    if let Some(growing) = state.interaction.growing().copied() {
        stats.collisions += physics::resolve_growing(&growing, state.arena.slots_mut(), &policy);
    }

    for pop in state.interaction.take_pending() {
        match state.bursts.spawn(pop.pos, pop.color, pop.radius, now) {
            Ok(_) => stats.bursts_spawned += 1,
            Err(e) => {
                log::debug!("Dropped burst: {}", e);
                stats.bursts_dropped += 1;
            }
        }
    }
    state.bursts.update(dt, now);

    state.time = now;
    state.frame += 1;
    stats
}
