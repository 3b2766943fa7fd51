//! Emotion tags and the eyelid shaping they imply.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Sleepy,
    Angry,
    Sad,
    Surprised,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Neutral,
        Emotion::Sleepy,
        Emotion::Angry,
        Emotion::Sad,
        Emotion::Surprised,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Sleepy => "sleepy",
            Self::Angry => "angry",
            Self::Sad => "sad",
            Self::Surprised => "surprised",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == tag)
    }

    pub fn modifiers(&self) -> EyelidModifiers {
        EYELID_TABLE
            .iter()
            .find(|(e, _)| e == self)
            .map(|(_, m)| *m)
            .unwrap_or_default()
    }
}

/// Extra lid closure added on top of the blink. Negative values widen the
/// eye instead of closing it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EyelidModifiers {
    pub upper_extra: f32,
    pub lower_extra: f32,
}

impl EyelidModifiers {
    pub const fn new(upper_extra: f32, lower_extra: f32) -> Self {
        Self {
            upper_extra,
            lower_extra,
        }
    }
}

// Neutral is absent on purpose: missing entries fall back to zero.
const EYELID_TABLE: [(Emotion, EyelidModifiers); 4] = [
    (Emotion::Sleepy, EyelidModifiers::new(0.45, 0.0)),
    (Emotion::Angry, EyelidModifiers::new(0.20, 0.0)),
    (Emotion::Sad, EyelidModifiers::new(0.0, 0.20)),
    (Emotion::Surprised, EyelidModifiers::new(-0.15, -0.10)),
];

/// Fractions of the eye diameter hidden by each lid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyelidCoverage {
    /// Top lid band, measured from the top of the eye downward.
    pub top: f32,
    /// Bottom lid band, measured from the bottom of the eye upward.
    pub bottom: f32,
    /// Whether the lid layer is drawn at all this frame.
    pub active: bool,
}

impl EyelidCoverage {
    pub fn compute(blink_amount: f32, emotion: Emotion) -> Self {
        let m = emotion.modifiers();
        let closure = (blink_amount + m.upper_extra.max(0.0)).clamp(0.0, 1.0);
        let raise = m.lower_extra.max(0.0);
        let widen = (-m.lower_extra).max(0.0);
        let bottom = (closure * 0.3 + raise - widen).max(0.0);
        Self {
            top: closure,
            bottom,
            active: closure > 0.0 || m.lower_extra != 0.0 || m.upper_extra < 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_has_no_modifiers() {
        assert_eq!(Emotion::Neutral.modifiers(), EyelidModifiers::default());
        let c = EyelidCoverage::compute(0.0, Emotion::Neutral);
        assert_eq!(c.top, 0.0);
        assert_eq!(c.bottom, 0.0);
        assert!(!c.active);
    }

    #[test]
    fn test_sleepy_half_closes() {
        let c = EyelidCoverage::compute(0.0, Emotion::Sleepy);
        assert!((c.top - 0.45).abs() < 1e-6);
        assert!((c.bottom - 0.135).abs() < 1e-6);
        assert!(c.active);
    }

    #[test]
    fn test_full_blink_clamps_closure() {
        let c = EyelidCoverage::compute(1.0, Emotion::Angry);
        assert_eq!(c.top, 1.0);
        assert!((c.bottom - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_sad_raises_lower_lid() {
        let c = EyelidCoverage::compute(0.0, Emotion::Sad);
        assert_eq!(c.top, 0.0);
        assert!((c.bottom - 0.2).abs() < 1e-6);
        assert!(c.active);
    }

    #[test]
    fn test_surprised_widens_but_still_draws() {
        let c = EyelidCoverage::compute(0.0, Emotion::Surprised);
        assert_eq!(c.top, 0.0);
        assert_eq!(c.bottom, 0.0);
        assert!(c.active);
    }

    #[test]
    fn test_surprised_suppresses_sympathetic_lower_lid() {
        let c = EyelidCoverage::compute(1.0, Emotion::Surprised);
        assert_eq!(c.top, 1.0);
        assert!((c.bottom - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_tags() {
        for e in Emotion::ALL {
            assert_eq!(Emotion::from_tag(e.as_str()), Some(e));
        }
        assert_eq!(Emotion::from_tag("happy"), None);
    }
}
