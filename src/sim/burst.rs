//! Pop bursts: radial particle effects left behind by destroyed bubbles
//!
//! A burst lays particles out on concentric rings from its center outward,
//! each moving away from the center at a speed proportional to its ring
//! radius. Bursts live in a fixed-size pool with the same recycling rule as
//! the bubble arena and expire a fixed time after they start.

use glam::Vec2;

use crate::color::Color;
use crate::consts::{BURST_CAPACITY, MAX_BURST_PARTICLES};
use crate::error::CapacityError;
use crate::settings::Settings;

/// Index of a burst slot in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BurstId(pub usize);

/// One particle, positioned relative to the burst center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstParticle {
    pub offset: Vec2,
    pub velocity: Vec2,
}

/// Ring layout and timing for new bursts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstLayout {
    pub lifetime: f64,
    pub layer_width: f32,
    pub particle_layout: f32,
    pub expand_mult: f32,
    /// Initial particle draw radius
    pub particle_radius: f32,
    /// Particle draw radius growth per second
    pub particle_growth: f32,
}

impl BurstLayout {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            lifetime: settings.pop_lifetime,
            layer_width: settings.layer_width,
            particle_layout: settings.particle_layout,
            expand_mult: settings.expand_mult,
            particle_radius: settings.scaled(settings.particle_radius),
            particle_growth: settings.particle_growth_rate(),
        }
    }

    /// Ring radii for a burst of `radius`: every layer width while inside
    /// the outermost layer
    pub fn ring_radii(&self, radius: f32) -> impl Iterator<Item = f32> + '_ {
        let width = self.layer_width;
        (1usize..)
            .map(move |k| k as f32 * width)
            .take_while(move |r| *r < radius - width)
    }

    /// Particles on a ring of radius `r`
    pub fn ring_count(&self, r: f32) -> usize {
        (self.particle_layout * r / self.layer_width) as usize
    }

    /// Total particles for a burst of `radius`, center included, capped at
    /// `MAX_BURST_PARTICLES`. Only whole rings are kept.
    pub fn particle_count(&self, radius: f32) -> usize {
        let mut total = 1;
        for r in self.ring_radii(radius) {
            let count = self.ring_count(r);
            if total + count > MAX_BURST_PARTICLES {
                break;
            }
            total += count;
        }
        total
    }

    /// Center particle plus evenly spaced rings
    pub fn particles(&self, radius: f32) -> Vec<BurstParticle> {
        let mut particles = Vec::with_capacity(self.particle_count(radius));
        particles.push(BurstParticle {
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
        });
        let speed_per_radius = self.expand_mult / self.lifetime as f32;
        for r in self.ring_radii(radius) {
            let count = self.ring_count(r);
            if particles.len() + count > MAX_BURST_PARTICLES {
                log::debug!("Burst of radius {:.1} truncated at ring {:.1}", radius, r);
                break;
            }
            for j in 0..count {
                let theta = std::f32::consts::TAU * (j as f32 / count as f32);
                let dir = Vec2::from_angle(theta);
                particles.push(BurstParticle {
                    offset: dir * r,
                    velocity: dir * speed_per_radius * r,
                });
            }
        }
        particles
    }
}

/// A live (or recyclable) burst
#[derive(Debug, Clone, PartialEq)]
pub struct PopBurst {
    pub start_time: f64,
    pub pos: Vec2,
    pub color: Color,
    pub origin_radius: f32,
    /// Current particle draw radius
    pub particle_radius: f32,
    pub particles: Vec<BurstParticle>,
    pub alive: bool,
}

impl PopBurst {
    /// Seconds since the burst started
    pub fn age(&self, now: f64) -> f64 {
        now - self.start_time
    }

    /// Release particle storage
    fn kill(&mut self) {
        self.alive = false;
        self.particles = Vec::new();
    }
}

/// Fixed-size pool of bursts
#[derive(Debug, Clone)]
pub struct BurstPool {
    bursts: Vec<PopBurst>,
    capacity: usize,
    layout: BurstLayout,
}

impl BurstPool {
    pub fn new(capacity: usize, layout: BurstLayout) -> Self {
        Self {
            bursts: Vec::with_capacity(capacity.min(BURST_CAPACITY)),
            capacity,
            layout,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replace layout and raise capacity; capacity never drops below the
    /// slots already allocated
    pub fn retune(&mut self, layout: BurstLayout, capacity: usize) {
        self.layout = layout;
        self.capacity = capacity.max(self.bursts.len());
    }

    pub fn alive_count(&self) -> usize {
        self.bursts.iter().filter(|b| b.alive).count()
    }

    /// Start a burst at `pos`. Fails if every slot is alive.
    pub fn spawn(
        &mut self,
        pos: Vec2,
        color: Color,
        radius: f32,
        now: f64,
    ) -> Result<BurstId, CapacityError> {
        let index = match self.bursts.iter().position(|b| !b.alive) {
            Some(i) => i,
            None if self.bursts.len() < self.capacity => self.bursts.len(),
            None => {
                return Err(CapacityError::Bursts {
                    capacity: self.capacity,
                });
            }
        };

        let burst = PopBurst {
            start_time: now,
            pos,
            color,
            origin_radius: radius,
            particle_radius: self.layout.particle_radius,
            particles: self.layout.particles(radius),
            alive: true,
        };
        if index == self.bursts.len() {
            self.bursts.push(burst);
        } else {
            self.bursts[index] = burst;
        }
        Ok(BurstId(index))
    }

    /// Expire old bursts and move particles of the rest
    pub fn update(&mut self, dt: f32, now: f64) {
        let lifetime = self.layout.lifetime;
        let growth = self.layout.particle_growth;
        for burst in self.bursts.iter_mut().filter(|b| b.alive) {
            if burst.age(now) > lifetime {
                burst.kill();
                continue;
            }
            burst.particle_radius += growth * dt;
            for p in &mut burst.particles {
                p.offset += p.velocity * dt;
            }
        }
    }

    pub fn get(&self, id: BurstId) -> Option<&PopBurst> {
        self.bursts.get(id.0).filter(|b| b.alive)
    }

    /// Live bursts in slot order
    pub fn iter_alive(&self) -> impl Iterator<Item = (BurstId, &PopBurst)> + '_ {
        self.bursts
            .iter()
            .enumerate()
            .filter(|(_, b)| b.alive)
            .map(|(i, b)| (BurstId(i), b))
    }
}
