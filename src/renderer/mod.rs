//! Handoff of renderable state to a batch renderer
//!
//! The simulation never touches GPU buffers. Each frame it turns live bubbles
//! and burst particles into Pod instance records and submits their bytes; the
//! platform loop flushes once the frame is complete.

pub mod instance;

pub use instance::{BubbleInstance, EntityKind, InstanceRecord, ParticleInstance};

use crate::sim::FieldState;

/// Receiver of per-instance bytes, grouped into batches by kind
pub trait BatchRenderer {
    fn submit(&mut self, kind: EntityKind, record: &[u8]);
    fn flush(&mut self);
}

/// Submit one typed record
pub fn submit_instance<R, T>(renderer: &mut R, record: &T)
where
    R: BatchRenderer + ?Sized,
    T: InstanceRecord,
{
    renderer.submit(T::KIND, bytemuck::bytes_of(record));
}

/// Submit every live bubble (the growing one last) and every live particle.
/// Does not flush. Returns the number of records submitted.
pub fn submit_frame<R: BatchRenderer + ?Sized>(state: &FieldState, now: f64, renderer: &mut R) -> usize {
    let trans_time = state.settings.trans_time;
    let mut submitted = 0;

    let bubbles = state.arena.iter_alive().map(|(_, b)| b).chain(state.growing());
    for bubble in bubbles {
        submit_instance(renderer, &BubbleInstance::from_bubble(bubble, now, trans_time));
        submitted += 1;
    }
    for (_, burst) in state.bursts.iter_alive() {
        for particle in ParticleInstance::from_burst(burst, now) {
            submit_instance(renderer, &particle);
            submitted += 1;
        }
    }
    submitted
}

/// Record counts of one flushed frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounts {
    pub bubbles: usize,
    pub particles: usize,
}

/// Renderer that decodes and keeps what it is given. Used by the headless
/// driver and tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Records submitted since the last flush
    pub bubbles: Vec<BubbleInstance>,
    pub particles: Vec<ParticleInstance>,
    /// One entry per flush
    pub frames: Vec<FrameCounts>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<FrameCounts> {
        self.frames.last().copied()
    }
}

impl BatchRenderer for RecordingRenderer {
    fn submit(&mut self, kind: EntityKind, record: &[u8]) {
        match kind {
            EntityKind::Bubble => self.bubbles.push(bytemuck::pod_read_unaligned(record)),
            EntityKind::Particle => self.particles.push(bytemuck::pod_read_unaligned(record)),
        }
    }

    fn flush(&mut self) {
        self.frames.push(FrameCounts {
            bubbles: self.bubbles.len(),
            particles: self.particles.len(),
        });
        self.bubbles.clear();
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{FrameInput, InputEvent, tick};
    use glam::Vec2;

    #[test]
    fn test_submit_frame_covers_bubbles_growing_and_particles() {
        let mut state = FieldState::new(Settings::default(), 11);
        let center = state.bounds.at(0.5, 0.5);
        let input = FrameInput {
            events: vec![
                InputEvent::PointerDown(center),
                InputEvent::PointerDown(Vec2::new(100.0, 800.0)),
            ],
            ..Default::default()
        };
        tick(&mut state, &input, 0.0, 0.0);
        assert_eq!(state.bursts.alive_count(), 1);

        let mut renderer = RecordingRenderer::new();
        let submitted = submit_frame(&state, 0.0, &mut renderer);

        let particles = state.bursts.iter_alive().map(|(_, b)| b.particles.len()).sum::<usize>();
        assert_eq!(renderer.bubbles.len(), 4 + 1);
        assert_eq!(renderer.particles.len(), particles);
        assert_eq!(submitted, 5 + particles);

        let growing = renderer.bubbles.last().unwrap();
        assert_eq!(growing.pos, [100.0, 800.0]);
        assert_eq!(growing.trans_percent, 0.0);
        assert_eq!(growing.color_a, growing.color_b);

        assert!(renderer.frames.is_empty());
        renderer.flush();
        assert_eq!(
            renderer.last_frame(),
            Some(FrameCounts {
                bubbles: 5,
                particles,
            })
        );
        assert!(renderer.bubbles.is_empty());
    }

    #[test]
    fn test_transitioning_bubble_record() {
        let mut state = FieldState::new(
            Settings {
                starting_sets: 0,
                ..Settings::default()
            },
            2,
        );
        let a = state.arena.create(Vec2::new(200.0, 200.0)).unwrap();
        let b = state.arena.create(Vec2::new(205.0, 200.0)).unwrap();
        let target = state.arena.get(b).color;
        tick(&mut state, &FrameInput::default(), 0.0, 10.0);

        let mut renderer = RecordingRenderer::new();
        submit_frame(&state, 10.5, &mut renderer);
        let record = renderer.bubbles[a.get() - 1];
        assert!((record.trans_percent - 0.5).abs() < 1e-6);
        assert_eq!(record.color_b, target.to_array());
        assert!((record.trans_angle[0] - 1.0).abs() < 1e-5);
    }
}
