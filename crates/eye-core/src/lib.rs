pub mod animation;
pub mod app;
pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod expression;
pub mod eye;
pub mod gaze;
pub mod renderer;

#[cfg(feature = "gui")]
pub mod gui;

pub use animation::{ease_in_out, BlinkPhase, BlinkScheduler, BlinkTiming};
pub use canvas::{Canvas, Color};
pub use config::{publish_face_state, ConfigSource, EngineSettings, FaceState};
pub use engine::{Clock, EyeEngine, FrameStats, MonotonicClock, QuitSignal};
pub use error::{ConfigError, EngineError};
pub use expression::{Emotion, EyelidCoverage, EyelidModifiers};
pub use eye::{draw_eye, EyeGeometry};
pub use gaze::{normalize_capped, vector_for, Direction, GazeSmoother};
pub use renderer::FramePresenter;
