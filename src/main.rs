//! Bubbl entry point
//!
//! Runs a scripted headless session: the field is driven by a manual clock at
//! 60 frames per second, a fixed set of pointer gestures is played back, and
//! every frame is handed to a recording batch renderer.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use glam::Vec2;

    use bubbl::platform::{FrameTimer, ManualClock};
    use bubbl::renderer::{BatchRenderer, RecordingRenderer, submit_frame};
    use bubbl::sim::{FieldState, FrameInput, FrameStats, InputEvent, tick};
    use bubbl::Settings;

    const FRAME_DT: f32 = 1.0 / 60.0;
    const SESSION_FRAMES: u64 = 480;

    /// Session instance holding all state
    struct Session {
        state: FieldState,
        renderer: RecordingRenderer,
        clock: ManualClock,
        timer: FrameTimer,
        settings_path: Option<PathBuf>,
        totals: FrameStats,
        peak_particles: usize,
    }

    impl Session {
        fn new(settings: Settings, seed: u64, settings_path: Option<PathBuf>) -> Self {
            Self {
                state: FieldState::new(settings, seed),
                renderer: RecordingRenderer::new(),
                clock: ManualClock::default(),
                timer: FrameTimer::new(FRAME_DT),
                settings_path,
                totals: FrameStats::default(),
                peak_particles: 0,
            }
        }

        /// Gestures for a given frame: pop a starting bubble, grow and place
        /// one, then hold another until it bursts
        fn script(&self, frame: u64) -> FrameInput {
            let bounds = self.state.bounds;
            let corner = bounds.at(0.1, 0.9);
            let events = match frame {
                30 => vec![InputEvent::PointerDown(bounds.at(0.5, 0.5))],
                60 => vec![InputEvent::PointerDown(corner)],
                61..=89 => {
                    let t = (frame - 60) as f32 / 30.0;
                    vec![InputEvent::PointerMove(corner + Vec2::new(120.0, -60.0) * t)]
                }
                90 => vec![InputEvent::PointerUp(corner + Vec2::new(120.0, -60.0))],
                150 => vec![InputEvent::PointerDown(bounds.at(0.9, 0.1))],
                _ => Vec::new(),
            };
            FrameInput {
                events,
                toggle_pause: frame == 300 || frame == 330,
                resize: None,
            }
        }

        fn reload(&mut self) {
            let Some(path) = &self.settings_path else {
                return;
            };
            let settings = Settings::load_or_default(path);
            if let Err(e) = self.state.reload_settings(settings) {
                log::warn!("Keeping current settings: {}", e);
            }
        }

        fn update(&mut self, frame: u64) {
            self.clock.advance(FRAME_DT as f64);
            let (dt, now) = self.timer.frame(&self.clock);

            if frame == SESSION_FRAMES / 2 {
                self.reload();
            }

            let input = self.script(frame);
            let stats = tick(&mut self.state, &input, dt, now);
            self.accumulate(stats);

            submit_frame(&self.state, now, &mut self.renderer);
            self.renderer.flush();
            if let Some(counts) = self.renderer.last_frame() {
                self.peak_particles = self.peak_particles.max(counts.particles);
            }
        }

        fn accumulate(&mut self, stats: FrameStats) {
            let t = &mut self.totals;
            t.popped += stats.popped;
            t.committed += stats.committed;
            t.discarded += stats.discarded;
            t.collisions += stats.collisions;
            t.transitions_finished += stats.transitions_finished;
            t.bursts_spawned += stats.bursts_spawned;
            t.bursts_dropped += stats.bursts_dropped;
        }

        fn report(&self) {
            let t = &self.totals;
            log::info!(
                "{} frames in {:.2}s: {} bubbles alive, {} bursts alive",
                self.state.frame,
                self.state.time,
                self.state.arena.alive_count(),
                self.state.bursts.alive_count()
            );
            log::info!(
                "popped {}, committed {}, discarded {}, collisions {}, transitions {}",
                t.popped,
                t.committed,
                t.discarded,
                t.collisions,
                t.transitions_finished
            );
            log::info!(
                "bursts spawned {}, dropped {}, peak particles {}",
                t.bursts_spawned,
                t.bursts_dropped,
                self.peak_particles
            );
        }
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }

    pub fn run() {
        let settings_path = std::env::args().nth(1).map(PathBuf::from);
        let settings = match &settings_path {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        let seed = settings.seed.unwrap_or_else(clock_seed);

        let mut session = Session::new(settings, seed, settings_path);
        log::info!("Session initialized with seed: {}", seed);

        for frame in 0..SESSION_FRAMES {
            session.update(frame);
        }
        session.report();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bubbl (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The field is driven by the embedding page on the web
}
