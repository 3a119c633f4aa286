//! Deterministic bubble field simulation
//!
//! All field logic lives here. This module is pure and deterministic:
//! - Time and `dt` come from the caller
//! - Seeded RNG only
//! - Stable iteration order (by slot index)
//! - No rendering or platform dependencies

pub mod arena;
pub mod burst;
pub mod collision;
pub mod interaction;
pub mod physics;
pub mod state;
pub mod tick;

pub use arena::{Bubble, BubbleArena, BubbleSpawn, SlotIndex, Transition};
pub use burst::{BurstId, BurstLayout, BurstParticle, BurstPool, PopBurst};
pub use collision::{CollisionResult, circle_collision};
pub use interaction::{Interaction, InteractionState, PendingPop, PointerOutcome};
pub use physics::{Bounds, CollisionPolicy};
pub use state::FieldState;
pub use tick::{FrameInput, FrameStats, InputEvent, tick};
