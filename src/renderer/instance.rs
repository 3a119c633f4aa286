//! Per-instance records handed to the batch renderer

use bytemuck::{Pod, Zeroable};

use crate::sim::{Bubble, PopBurst};

/// What a record draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Bubble,
    Particle,
}

/// A Pod record the batch renderer uploads as one instance.
///
/// Location 0 is left to the shared quad vertex; instance attributes start at 1.
pub trait InstanceRecord: Pod {
    const KIND: EntityKind;
    const ATTRIBUTES: &'static [wgpu::VertexAttribute];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: Self::ATTRIBUTES,
        }
    }
}

const BUBBLE_ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    1 => Float32x2,
    2 => Float32,
    3 => Float32,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x2
];

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    1 => Float32x2,
    2 => Float32,
    3 => Float32,
    4 => Float32x4
];

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BubbleInstance {
    pub pos: [f32; 2],
    pub radius: f32,
    /// 0 to 1 progress of the color transition
    pub trans_percent: f32,
    /// Current color
    pub color_a: [f32; 4],
    /// Transition target (equals `color_a` when idle)
    pub color_b: [f32; 4],
    /// Unit vector toward the other bubble, zero when idle
    pub trans_angle: [f32; 2],
}

impl BubbleInstance {
    pub fn from_bubble(bubble: &Bubble, now: f64, trans_time: f64) -> Self {
        let direction = bubble.transition.map(|t| t.direction).unwrap_or_default();
        Self {
            pos: bubble.pos.to_array(),
            radius: bubble.radius,
            trans_percent: bubble.transition_percent(now, trans_time),
            color_a: bubble.color.to_array(),
            color_b: bubble.target_color().to_array(),
            trans_angle: direction.to_array(),
        }
    }
}

impl InstanceRecord for BubbleInstance {
    const KIND: EntityKind = EntityKind::Bubble;
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &BUBBLE_ATTRIBUTES;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub pos: [f32; 2],
    pub radius: f32,
    /// Seconds since the burst started
    pub age: f32,
    pub color: [f32; 4],
}

impl ParticleInstance {
    /// One record per particle of `burst`, in absolute coordinates
    pub fn from_burst(burst: &PopBurst, now: f64) -> impl Iterator<Item = Self> + '_ {
        let age = burst.age(now) as f32;
        burst.particles.iter().map(move |p| Self {
            pos: (burst.pos + p.offset).to_array(),
            radius: burst.particle_radius,
            age,
            color: burst.color.to_array(),
        })
    }
}

impl InstanceRecord for ParticleInstance {
    const KIND: EntityKind = EntityKind::Particle;
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &PARTICLE_ATTRIBUTES;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_strides_match_records() {
        assert_eq!(BubbleInstance::layout().array_stride, 56);
        assert_eq!(ParticleInstance::layout().array_stride, 32);
        assert_eq!(BubbleInstance::layout().step_mode, wgpu::VertexStepMode::Instance);
    }

    #[test]
    fn test_attributes_start_after_quad_vertex() {
        for attrs in [BubbleInstance::ATTRIBUTES, ParticleInstance::ATTRIBUTES] {
            assert_eq!(attrs[0].shader_location, 1);
            assert_eq!(attrs[0].offset, 0);
        }
        let last = BubbleInstance::ATTRIBUTES[5];
        assert_eq!(last.offset, 48);
        assert_eq!(last.format, wgpu::VertexFormat::Float32x2);
    }
}
