//! The engine context: owns every piece of per-process state and produces
//! one finished frame per call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::{BlinkPhase, BlinkScheduler};
use crate::canvas::{Canvas, Color};
use crate::config::{ConfigSource, EngineSettings, FaceState};
use crate::eye::{draw_eye, EyeGeometry};
use crate::gaze::GazeSmoother;

/// Seconds since some fixed origin.
pub trait Clock {
    fn now(&self) -> f64;
}

pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Cooperative stop request, checked once per frame.
#[derive(Clone, Default)]
pub struct QuitSignal(Arc<AtomicBool>);

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What the last frame was built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    pub time: f64,
    pub blink_amount: f32,
    pub blink_phase: BlinkPhase,
    pub state: FaceState,
    pub offsets: [[f32; 2]; 2],
}

pub struct EyeEngine<C: Clock = MonotonicClock> {
    clock: C,
    width: u32,
    height: u32,
    geometry: EyeGeometry,
    config: ConfigSource,
    blink: BlinkScheduler<StdRng>,
    gaze: [GazeSmoother; 2],
    last: Option<FrameStats>,
}

impl EyeEngine<MonotonicClock> {
    pub fn new(settings: &EngineSettings) -> Self {
        Self::with_clock(settings, MonotonicClock::new(), StdRng::from_entropy())
    }
}

impl<C: Clock> EyeEngine<C> {
    pub fn with_clock(settings: &EngineSettings, clock: C, rng: StdRng) -> Self {
        let now = clock.now();
        let travel = settings.geometry.travel_radius();
        let smoother = GazeSmoother::new(settings.gaze.smoothing, travel);
        Self {
            width: settings.window.width,
            height: settings.window.height,
            geometry: settings.geometry.clone(),
            config: ConfigSource::new(&settings.state.path, settings.state.poll_interval),
            blink: BlinkScheduler::new(settings.blink.clone(), now, rng),
            gaze: [smoother.clone(), smoother],
            last: None,
            clock,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn config_source(&self) -> &ConfigSource {
        &self.config
    }

    pub fn last_frame(&self) -> Option<&FrameStats> {
        self.last.as_ref()
    }

    /// Render a frame at the clock's current time.
    pub fn tick(&mut self) -> Canvas {
        let now = self.clock.now();
        self.frame_at(now)
    }

    /// Advance every component to `now` and paint a fresh frame.
    pub fn frame_at(&mut self, now: f64) -> Canvas {
        let blink_amount = self.blink.tick(now);
        let state = self.config.poll(now);
        let offsets = self.gaze.each_mut().map(|g| g.update(Some(state.direction)));

        let mut canvas = Canvas::new(self.width, self.height, Color::BLACK);
        let centers = self.geometry.centers(self.width, self.height);
        for (center, offset) in centers.into_iter().zip(offsets) {
            draw_eye(
                &mut canvas,
                &self.geometry,
                center,
                offset,
                blink_amount,
                state.emotion,
            );
        }

        self.last = Some(FrameStats {
            time: now,
            blink_amount,
            blink_phase: self.blink.phase(),
            state,
            offsets,
        });
        canvas
    }
}
