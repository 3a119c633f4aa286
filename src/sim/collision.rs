//! Collision detection and response between circular bubbles
//!
//! All bubbles share the same mass, so an elastic collision exchanges the
//! velocity components along the contact normal and leaves the tangential
//! components alone.

use glam::Vec2;

/// Result of a collision check between circle `a` and circle `b`
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circles overlap
    pub hit: bool,
    /// Unit normal from `b` toward `a` (zero if the centers coincide)
    pub normal: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
        }
    }

    /// Overlapping with a usable normal. Coincident centers have no defined
    /// normal and are left unresolved.
    pub fn resolvable(&self) -> bool {
        self.hit && self.normal != Vec2::ZERO
    }
}

/// Overlap test: squared center distance below squared sum of radii
#[inline]
pub fn is_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) < reach * reach
}

/// Check circle `a` against circle `b`
pub fn circle_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    if !is_collision(a_pos, a_radius, b_pos, b_radius) {
        return CollisionResult::miss();
    }
    CollisionResult {
        hit: true,
        normal: crate::direction(b_pos, a_pos).unwrap_or(Vec2::ZERO),
    }
}

/// Equal-mass elastic exchange along unit normal `n`
///
/// v_a' = v_a - n (n · (v_a - v_b)), v_b' = v_b + n (n · (v_a - v_b))
#[inline]
pub fn exchange_velocities(v_a: Vec2, v_b: Vec2, n: Vec2) -> (Vec2, Vec2) {
    let impulse = n * n.dot(v_a - v_b);
    (v_a - impulse, v_b + impulse)
}

/// New center for `a`: along `n` from `b_pos`, clear of `b` by `spacing`
#[inline]
pub fn separate(b_pos: Vec2, a_radius: f32, b_radius: f32, n: Vec2, spacing: f32) -> Vec2 {
    b_pos + n * (a_radius + b_radius + spacing)
}

/// Clamp that tolerates an empty range (window narrower than the bubble)
#[inline]
fn clamp_span(v: f32, min: f32, max: f32) -> f32 {
    if min > max {
        (min + max) * 0.5
    } else {
        v.clamp(min, max)
    }
}

/// Advance one axis, bouncing off `[radius, extent - radius]`.
/// Returns the new (position, velocity) for that axis.
#[inline]
fn step_axis(pos: f32, vel: f32, radius: f32, extent: f32, dt: f32) -> (f32, f32) {
    let next = pos + vel * dt;
    let max = extent - radius;
    if next < radius || next > max {
        (clamp_span(next, radius, max), -vel)
    } else {
        (next, vel)
    }
}

/// Integrate a bubble inside a `width` x `height` box with perfectly elastic walls
pub fn wall_step(pos: Vec2, vel: Vec2, radius: f32, size: Vec2, dt: f32) -> (Vec2, Vec2) {
    let (x, vx) = step_axis(pos.x, vel.x, radius, size.x, dt);
    let (y, vy) = step_axis(pos.y, vel.y, radius, size.y, dt);
    (Vec2::new(x, y), Vec2::new(vx, vy))
}
