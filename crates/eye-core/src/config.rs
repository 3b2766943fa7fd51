use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::animation::BlinkTiming;
use crate::error::ConfigError;
use crate::expression::Emotion;
use crate::eye::EyeGeometry;
use crate::gaze::Direction;

// ============================================================
// Shared face state record
// ============================================================

/// The `{"emotion": ..., "direction": ...}` record written by an external
/// controller. Missing keys fall back to neutral/center; unknown tags make
/// the whole record invalid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceState {
    pub emotion: Emotion,
    pub direction: Direction,
}

impl FaceState {
    pub fn new(emotion: Emotion, direction: Direction) -> Self {
        Self { emotion, direction }
    }

    /// Validate raw tags, reporting every bad field at once.
    pub fn parse(emotion: Option<&str>, direction: Option<&str>) -> Result<Self, ConfigError> {
        let mut errors = Vec::new();

        let emotion = match emotion {
            None | Some("") => {
                errors.push("Missing required argument: emotion".to_string());
                None
            }
            Some(tag) => Emotion::from_tag(tag).or_else(|| {
                errors.push(format!(
                    "Invalid emotion. Allowed: {}",
                    allowed(Emotion::ALL.map(|e| e.as_str()))
                ));
                None
            }),
        };

        let direction = match direction {
            None | Some("") => {
                errors.push("Missing required argument: direction".to_string());
                None
            }
            Some(tag) => Direction::from_tag(tag).or_else(|| {
                errors.push(format!(
                    "Invalid direction. Allowed: {}",
                    allowed(Direction::ALL.map(|d| d.as_str()))
                ));
                None
            }),
        };

        match (emotion, direction) {
            (Some(emotion), Some(direction)) => Ok(Self { emotion, direction }),
            _ => Err(ConfigError::Invalid(errors)),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn allowed<const N: usize>(mut tags: [&str; N]) -> String {
    tags.sort_unstable();
    tags.join(", ")
}

/// Read and parse the record at `path`.
pub fn read_face_state(path: &Path) -> Result<FaceState, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(FaceState::from_json(&text)?)
}

/// Publish a record so readers never observe a partial write: the JSON goes
/// to a temporary file in the target directory which then replaces `path`.
pub fn publish_face_state(path: &Path, state: &FaceState) -> Result<(), ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(io_err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix("._face_state_")
        .tempfile_in(&dir)
        .map_err(io_err)?;
    serde_json::to_writer_pretty(&mut tmp, state)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    log::info!(
        "published face state emotion={} direction={}",
        state.emotion.as_str(),
        state.direction.as_str()
    );
    Ok(())
}

/// Validate raw emotion/direction tags and publish them. Nothing is written
/// unless both tags are valid.
pub fn publish_tags(
    path: &Path,
    emotion: &str,
    direction: &str,
) -> Result<FaceState, ConfigError> {
    let state = FaceState::parse(Some(emotion), Some(direction))?;
    publish_face_state(path, &state)?;
    Ok(state)
}

// ============================================================
// ConfigSource: rate-limited reader of the shared record
// ============================================================

pub struct ConfigSource {
    path: PathBuf,
    poll_interval: f64,
    last_load: Option<f64>,
    current: FaceState,
}

impl ConfigSource {
    pub fn new(path: impl Into<PathBuf>, poll_interval: f64) -> Self {
        Self {
            path: path.into(),
            poll_interval,
            last_load: None,
            current: FaceState::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> FaceState {
        self.current
    }

    /// Latest good snapshot. Re-reads the store at most once per poll
    /// interval; any failure keeps the previous snapshot.
    pub fn poll(&mut self, now: f64) -> FaceState {
        let due = match self.last_load {
            None => true,
            Some(last) => now - last >= self.poll_interval,
        };
        if !due {
            return self.current;
        }
        self.last_load = Some(now);

        match read_face_state(&self.path) {
            Ok(state) => {
                if state != self.current {
                    log::info!(
                        "face state changed: emotion={} direction={}",
                        state.emotion.as_str(),
                        state.direction.as_str()
                    );
                }
                self.current = state;
            }
            Err(e) => log::debug!("keeping previous face state: {e}"),
        }
        self.current
    }
}

// ============================================================
// EngineSettings: operator-supplied tuning, read once at startup
// ============================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub version: u32,
    pub window: WindowSettings,
    pub geometry: EyeGeometry,
    pub gaze: GazeSettings,
    pub blink: BlinkTiming,
    pub state: StateSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeSettings {
    /// Per-tick blend weight toward the target offset, 0..1.
    pub smoothing: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    pub path: PathBuf,
    /// Seconds between re-reads of the shared record.
    pub poll_interval: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            window: WindowSettings::default(),
            geometry: EyeGeometry::default(),
            gaze: GazeSettings::default(),
            blink: BlinkTiming::default(),
            state: StateSettings::default(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            title: "Robot Eyes".to_string(),
        }
    }
}

impl Default for GazeSettings {
    fn default() -> Self {
        Self { smoothing: 0.2 }
    }
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config.json"),
            poll_interval: 0.5,
        }
    }
}

impl EngineSettings {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_json(&text)?)
    }
}
