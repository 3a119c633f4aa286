//! Per-frame physics passes over the arena
//!
//! Each pass walks the arena slots in index order, so results are
//! reproducible for a given seed and input sequence. Pairs are resolved once
//! each in a single pass; chained overlaps between three or more bubbles may
//! persist until the next frame.

use glam::Vec2;

use super::arena::{Bubble, Transition};
use super::collision::{circle_collision, exchange_velocities, separate, wall_step};
use crate::settings::{GrowingCollision, Settings};

/// Window bounds in simulation space (origin bottom-left, Y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Point at fractional coordinates (0..1, 0..1)
    pub fn at(&self, fx: f32, fy: f32) -> Vec2 {
        Vec2::new(self.width * fx, self.height * fy)
    }
}

/// Collision tuning shared by the pair and growing passes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPolicy {
    pub spacing: f32,
    pub transitions_enabled: bool,
    pub trans_immune_period: f64,
    pub growing: GrowingCollision,
}

impl CollisionPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            spacing: settings.scaled(settings.spacing),
            transitions_enabled: settings.transitions_enabled,
            trans_immune_period: settings.trans_immune_period,
            growing: settings.growing_collision,
        }
    }
}

/// Advance every live, non-transitioning bubble and bounce it off the walls
pub fn integrate(bubbles: &mut [Bubble], dt: f32, bounds: Bounds) {
    let size = bounds.size();
    for bubble in bubbles.iter_mut().filter(|b| b.alive && !b.in_transition()) {
        let (pos, vel) = wall_step(bubble.pos, bubble.vel, bubble.radius, size, dt);
        bubble.pos = pos;
        bubble.vel = vel;
    }
}

/// Commit transitions older than `trans_time`. Returns how many finished.
pub fn complete_transitions(bubbles: &mut [Bubble], now: f64, trans_time: f64) -> usize {
    let mut finished = 0;
    for bubble in bubbles.iter_mut().filter(|b| b.alive) {
        let Some(t) = bubble.transition else {
            continue;
        };
        if now - t.start > trans_time {
            bubble.color = t.target;
            bubble.transition = None;
            bubble.last_transition_end = Some(now);
            finished += 1;
        }
    }
    finished
}

fn start_transition(bubble: &mut Bubble, other: &Bubble, now: f64) {
    bubble.transition = Some(Transition {
        start: now,
        target: other.color,
        direction: crate::direction(bubble.pos, other.pos).unwrap_or(Vec2::ZERO),
    });
}

/// Resolve one ordered pair. Returns true if they collided and were resolved.
fn resolve_pair(a: &mut Bubble, b: &mut Bubble, policy: &CollisionPolicy, now: f64) -> bool {
    let result = circle_collision(a.pos, a.radius, b.pos, b.radius);
    if !result.resolvable() {
        return false;
    }
    let n = result.normal;

    let (va, vb) = exchange_velocities(a.vel, b.vel, n);
    a.vel = va;
    b.vel = vb;
    a.pos = separate(b.pos, a.radius, b.radius, n, policy.spacing);

    if policy.transitions_enabled
        && !a.in_transition()
        && !b.in_transition()
        && a.transition_ready(now, policy.trans_immune_period)
        && b.transition_ready(now, policy.trans_immune_period)
    {
        let (a_before, b_before) = (*a, *b);
        start_transition(a, &b_before, now);
        start_transition(b, &a_before, now);
    }
    true
}

/// Pairwise collision pass over all ordered pairs (i, j), i != j, of live
/// bubbles. Returns how many pairs were resolved.
pub fn resolve_collisions(bubbles: &mut [Bubble], policy: &CollisionPolicy, now: f64) -> usize {
    let mut resolved = 0;
    for i in 0..bubbles.len() {
        for j in 0..bubbles.len() {
            if i == j || !bubbles[i].alive || !bubbles[j].alive {
                continue;
            }
            let mut a = bubbles[i];
            let mut b = bubbles[j];
            if resolve_pair(&mut a, &mut b, policy, now) {
                bubbles[i] = a;
                bubbles[j] = b;
                resolved += 1;
            }
        }
    }
    resolved
}

/// Push live bubbles out of the growing bubble. The growing bubble itself is
/// never moved or slowed. Returns how many bubbles were displaced.
pub fn resolve_growing(growing: &Bubble, bubbles: &mut [Bubble], policy: &CollisionPolicy) -> usize {
    if policy.growing == GrowingCollision::Ignore {
        return 0;
    }
    let mut displaced = 0;
    for bubble in bubbles.iter_mut().filter(|b| b.alive) {
        let result = circle_collision(bubble.pos, bubble.radius, growing.pos, growing.radius);
        if !result.resolvable() {
            continue;
        }
        let n = result.normal;
        bubble.vel = match policy.growing {
            GrowingCollision::Negate => -bubble.vel,
            GrowingCollision::Exchange => exchange_velocities(bubble.vel, Vec2::ZERO, n).0,
            GrowingCollision::Ignore => bubble.vel,
        };
        bubble.pos = separate(growing.pos, bubble.radius, growing.radius, n, policy.spacing);
        displaced += 1;
    }
    displaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use proptest::prelude::*;

    fn bubble(pos: Vec2, vel: Vec2, radius: f32) -> Bubble {
        Bubble {
            pos,
            vel,
            radius,
            color: Color::WHITE,
            transition: None,
            last_transition_end: None,
            alive: true,
        }
    }

    fn policy(transitions_enabled: bool) -> CollisionPolicy {
        CollisionPolicy {
            spacing: 1.0,
            transitions_enabled,
            trans_immune_period: 1.0,
            growing: GrowingCollision::Negate,
        }
    }

    #[test]
    fn test_head_on_pair_swaps_and_separates() {
        let mut bubbles = [
            bubble(Vec2::new(100.0, 100.0), Vec2::new(5.0, 0.0), 10.0),
            bubble(Vec2::new(115.0, 100.0), Vec2::new(-5.0, 0.0), 10.0),
        ];
        let resolved = resolve_collisions(&mut bubbles, &policy(false), 0.0);
        assert_eq!(resolved, 1);
        assert!((bubbles[0].vel - Vec2::new(-5.0, 0.0)).length() < 1e-5);
        assert!((bubbles[1].vel - Vec2::new(5.0, 0.0)).length() < 1e-5);
        let dist = bubbles[0].pos.distance(bubbles[1].pos);
        assert!((dist - 21.0).abs() < 1e-4);
        // Slot 1 (lower index) is the one repositioned
        assert_eq!(bubbles[1].pos, Vec2::new(115.0, 100.0));
    }

    #[test]
    fn test_coincident_pair_skipped() {
        let mut bubbles = [
            bubble(Vec2::splat(50.0), Vec2::new(5.0, 0.0), 10.0),
            bubble(Vec2::splat(50.0), Vec2::new(-5.0, 0.0), 10.0),
        ];
        assert_eq!(resolve_collisions(&mut bubbles, &policy(true), 0.0), 0);
        assert_eq!(bubbles[0].vel, Vec2::new(5.0, 0.0));
        assert!(bubbles.iter().all(|b| b.pos.is_finite() && b.transition.is_none()));
    }

    #[test]
    fn test_dead_bubbles_do_not_collide() {
        let mut bubbles = [
            bubble(Vec2::splat(50.0), Vec2::X, 10.0),
            bubble(Vec2::new(55.0, 50.0), Vec2::NEG_X, 10.0),
        ];
        bubbles[1].alive = false;
        assert_eq!(resolve_collisions(&mut bubbles, &policy(true), 0.0), 0);
    }

    #[test]
    fn test_collision_starts_mutual_transition() {
        let mut bubbles = [
            bubble(Vec2::new(100.0, 100.0), Vec2::X, 10.0),
            bubble(Vec2::new(110.0, 100.0), Vec2::NEG_X, 10.0),
        ];
        bubbles[0].color = Color::rgb(1.0, 0.0, 0.0);
        bubbles[1].color = Color::rgb(0.0, 0.0, 1.0);

        resolve_collisions(&mut bubbles, &policy(true), 5.0);

        let t0 = bubbles[0].transition.unwrap();
        let t1 = bubbles[1].transition.unwrap();
        assert_eq!(t0.target, Color::rgb(0.0, 0.0, 1.0));
        assert_eq!(t1.target, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(t0.start, 5.0);
        assert!((t0.direction - Vec2::X).length() < 1e-5);
        assert!((t1.direction - Vec2::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_transition_immunity_and_disabled_policy() {
        let make = || {
            [
                bubble(Vec2::new(100.0, 100.0), Vec2::X, 10.0),
                bubble(Vec2::new(110.0, 100.0), Vec2::NEG_X, 10.0),
            ]
        };

        let mut bubbles = make();
        resolve_collisions(&mut bubbles, &policy(false), 5.0);
        assert!(bubbles.iter().all(|b| !b.in_transition()));

        let mut bubbles = make();
        bubbles[1].last_transition_end = Some(4.5);
        resolve_collisions(&mut bubbles, &policy(true), 5.0);
        assert!(bubbles.iter().all(|b| !b.in_transition()));

        let mut bubbles = make();
        bubbles[1].last_transition_end = Some(3.5);
        resolve_collisions(&mut bubbles, &policy(true), 5.0);
        assert!(bubbles.iter().all(|b| b.in_transition()));
    }

    #[test]
    fn test_transition_completion() {
        let target = Color::rgb(0.0, 1.0, 0.0);
        let mut bubbles = [bubble(Vec2::splat(50.0), Vec2::ZERO, 10.0)];
        bubbles[0].transition = Some(Transition {
            start: 2.0,
            target,
            direction: Vec2::X,
        });

        assert_eq!(complete_transitions(&mut bubbles, 2.9, 1.0), 0);
        assert!(bubbles[0].in_transition());

        assert_eq!(complete_transitions(&mut bubbles, 3.1, 1.0), 1);
        assert_eq!(bubbles[0].color, target);
        assert!(bubbles[0].transition.is_none());
        assert_eq!(bubbles[0].last_transition_end, Some(3.1));
    }

    #[test]
    fn test_transitioning_bubble_is_frozen() {
        let mut bubbles = [bubble(Vec2::splat(50.0), Vec2::new(10.0, 10.0), 5.0)];
        bubbles[0].transition = Some(Transition {
            start: 0.0,
            target: Color::BLACK,
            direction: Vec2::X,
        });
        integrate(&mut bubbles, 1.0, Bounds::new(200.0, 200.0));
        assert_eq!(bubbles[0].pos, Vec2::splat(50.0));
    }

    #[test]
    fn test_growing_negates_and_pushes_clear() {
        let growing = bubble(Vec2::new(100.0, 100.0), Vec2::new(300.0, 300.0), 40.0);
        let mut bubbles = [bubble(Vec2::new(130.0, 100.0), Vec2::new(-20.0, 7.0), 10.0)];
        let displaced = resolve_growing(&growing, &mut bubbles, &policy(false));
        assert_eq!(displaced, 1);
        assert_eq!(bubbles[0].vel, Vec2::new(20.0, -7.0));
        assert!((bubbles[0].pos - Vec2::new(151.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn test_growing_exchange_and_ignore_policies() {
        let growing = bubble(Vec2::new(100.0, 100.0), Vec2::ZERO, 40.0);

        let mut bubbles = [bubble(Vec2::new(130.0, 100.0), Vec2::new(-20.0, 7.0), 10.0)];
        let mut exchange = policy(false);
        exchange.growing = GrowingCollision::Exchange;
        resolve_growing(&growing, &mut bubbles, &exchange);
        assert!((bubbles[0].vel - Vec2::new(0.0, 7.0)).length() < 1e-5);

        let mut bubbles = [bubble(Vec2::new(130.0, 100.0), Vec2::new(-20.0, 7.0), 10.0)];
        let mut ignore = policy(false);
        ignore.growing = GrowingCollision::Ignore;
        assert_eq!(resolve_growing(&growing, &mut bubbles, &ignore), 0);
        assert_eq!(bubbles[0].pos, Vec2::new(130.0, 100.0));
    }

    proptest! {
        #[test]
        fn prop_no_overlap_after_resolve(
            x in 100.0f32..900.0,
            y in 100.0f32..900.0,
            angle in 0.0f32..std::f32::consts::TAU,
            overlap in 0.05f32..0.95,
            ra in 5.0f32..60.0,
            rb in 5.0f32..60.0,
            va in prop::array::uniform2(-300.0f32..300.0),
            vb in prop::array::uniform2(-300.0f32..300.0),
        ) {
            let dist = (ra + rb) * overlap;
            let a_pos = Vec2::new(x, y);
            let b_pos = a_pos + Vec2::from_angle(angle) * dist;
            let mut bubbles = [
                bubble(a_pos, Vec2::from_array(va), ra),
                bubble(b_pos, Vec2::from_array(vb), rb),
            ];
            let resolved = resolve_collisions(&mut bubbles, &policy(true), 0.0);
            prop_assert_eq!(resolved, 1);
            let after = bubbles[0].pos.distance(bubbles[1].pos);
            prop_assert!(after >= ra + rb - 1e-3, "distance {} < {}", after, ra + rb);
        }

        #[test]
        fn prop_boundary_containment(
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            radius in 5.0f32..60.0,
            vel in prop::array::uniform2(-2000.0f32..2000.0),
            dt in 0.0f32..0.5,
        ) {
            let bounds = Bounds::new(800.0, 600.0);
            let pos = Vec2::new(
                radius + fx * (bounds.width - 2.0 * radius),
                radius + fy * (bounds.height - 2.0 * radius),
            );
            let mut bubbles = [bubble(pos, Vec2::from_array(vel), radius)];
            integrate(&mut bubbles, dt, bounds);
            let p = bubbles[0].pos;
            prop_assert!(p.x >= radius && p.x <= bounds.width - radius);
            prop_assert!(p.y >= radius && p.y <= bounds.height - radius);
        }

        #[test]
        fn prop_idle_bubble_unaffected_by_completion(now in -1.0e6f64..1.0e6) {
            let mut bubbles = [bubble(Vec2::splat(10.0), Vec2::ONE, 3.0)];
            let before = bubbles;
            prop_assert_eq!(complete_transitions(&mut bubbles, now, 1.0), 0);
            prop_assert_eq!(bubbles, before);
        }
    }
}
