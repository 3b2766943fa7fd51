//! Gaze direction table and the per-eye pupil filter.
//!
//! Directions are expressed in screen space as seen by the viewer: the eyes
//! face the viewer, so "right" (the robot's right) moves the pupils toward
//! the viewer's left, i.e. negative x. Positive y points down.

use std::f32::consts::FRAC_1_SQRT_2;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Center,
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::Center,
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::UpLeft => "upleft",
            Self::UpRight => "upright",
            Self::DownLeft => "downleft",
            Self::DownRight => "downright",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == tag)
    }
}

/// Unit (or shorter) gaze vector for a direction.
pub fn vector_for(direction: Direction) -> [f32; 2] {
    const D: f32 = FRAC_1_SQRT_2;
    match direction {
        Direction::Center => [0.0, 0.0],
        Direction::Left => [1.0, 0.0],
        Direction::Right => [-1.0, 0.0],
        Direction::Up => [0.0, -1.0],
        Direction::Down => [0.0, 1.0],
        Direction::UpLeft => [D, -D],
        Direction::UpRight => [-D, -D],
        Direction::DownLeft => [D, D],
        Direction::DownRight => [-D, D],
    }
}

/// Scale `v` back onto the unit circle if it overshoots; shorter vectors
/// pass through untouched.
pub fn normalize_capped(v: [f32; 2]) -> [f32; 2] {
    let len = (v[0] * v[0] + v[1] * v[1]).sqrt();
    if len > 1.0 {
        [v[0] / len, v[1] / len]
    } else {
        v
    }
}

/// Exponential filter steering one pupil toward the commanded direction.
#[derive(Clone, Debug)]
pub struct GazeSmoother {
    /// Pupil center displacement from the eye center, in pixels.
    offset: [f32; 2],
    smoothing: f32,
    travel_radius: f32,
}

impl GazeSmoother {
    pub fn new(smoothing: f32, travel_radius: f32) -> Self {
        Self {
            offset: [0.0, 0.0],
            smoothing: smoothing.clamp(0.0, 1.0),
            travel_radius: travel_radius.max(0.0),
        }
    }

    pub fn offset(&self) -> [f32; 2] {
        self.offset
    }

    pub fn travel_radius(&self) -> f32 {
        self.travel_radius
    }

    /// Target offset in pixels for a direction.
    pub fn target_for(&self, direction: Direction) -> [f32; 2] {
        let v = normalize_capped(vector_for(direction));
        [v[0] * self.travel_radius, v[1] * self.travel_radius]
    }

    /// Advance one tick. `None` means no override is active and the pupil
    /// relaxes toward the eye center.
    pub fn update(&mut self, direction: Option<Direction>) -> [f32; 2] {
        let a = self.smoothing;
        let target = match direction {
            Some(d) => self.target_for(d),
            None => [0.0, 0.0],
        };
        self.offset = [
            self.offset[0] * (1.0 - a) + target[0] * a,
            self.offset[1] * (1.0 - a) + target[1] * a,
        ];
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dist(a: [f32; 2], b: [f32; 2]) -> f32 {
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
    }

    fn len(v: [f32; 2]) -> f32 {
        dist(v, [0.0, 0.0])
    }

    #[test]
    fn test_vectors_are_at_most_unit_length() {
        for d in Direction::ALL {
            assert!(len(vector_for(d)) <= 1.0 + 1e-6, "{:?}", d);
        }
        assert!((len(vector_for(Direction::UpLeft)) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_horizontal_directions_are_mirrored() {
        assert!(vector_for(Direction::Right)[0] < 0.0);
        assert!(vector_for(Direction::Left)[0] > 0.0);
        assert!(vector_for(Direction::Down)[1] > 0.0);
    }

    #[test]
    fn test_normalize_capped_only_shrinks_overshoot() {
        assert_eq!(normalize_capped([0.3, 0.4]), [0.3, 0.4]);
        let capped = normalize_capped([3.0, 4.0]);
        assert!((capped[0] - 0.6).abs() < 1e-6);
        assert!((capped[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_tag_round_trip() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_tag(d.as_str()), Some(d));
        }
        assert_eq!(Direction::from_tag("sideways"), None);
    }

    #[test]
    fn test_convergence_is_exponential() {
        let mut gaze = GazeSmoother::new(0.2, 79.0);
        let target = gaze.target_for(Direction::DownLeft);
        let initial = dist(gaze.offset(), target);
        for n in 1..=30 {
            gaze.update(Some(Direction::DownLeft));
            let bound = initial * 0.8f32.powi(n) + 1e-3;
            assert!(dist(gaze.offset(), target) <= bound, "tick {}", n);
        }
    }

    #[test]
    fn test_center_right_center_scenario() {
        let mut gaze = GazeSmoother::new(0.2, 79.0);
        for _ in 0..50 {
            gaze.update(Some(Direction::Center));
        }
        assert!(len(gaze.offset()) < 1e-3);

        for _ in 0..50 {
            gaze.update(Some(Direction::Right));
        }
        let target = gaze.target_for(Direction::Right);
        assert!(dist(gaze.offset(), target) <= 0.01 * len(target));

        for _ in 0..50 {
            gaze.update(Some(Direction::Center));
        }
        assert!(len(gaze.offset()) <= 0.01 * len(target));
    }

    #[test]
    fn test_no_override_decays_to_center() {
        let mut gaze = GazeSmoother::new(0.2, 79.0);
        for _ in 0..20 {
            gaze.update(Some(Direction::Up));
        }
        let before = len(gaze.offset());
        for _ in 0..20 {
            gaze.update(None);
        }
        assert!(len(gaze.offset()) < before * 0.8f32.powi(19));
    }

    proptest! {
        #[test]
        fn prop_offset_stays_within_travel_radius(
            steps in proptest::collection::vec(0usize..10, 1..200)
        ) {
            let mut gaze = GazeSmoother::new(0.2, 79.0);
            for s in steps {
                let direction = Direction::ALL.get(s).copied();
                let offset = gaze.update(direction);
                prop_assert!(len(offset) <= gaze.travel_radius() + 1e-3);
            }
        }
    }
}
