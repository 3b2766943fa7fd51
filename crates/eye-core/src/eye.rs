use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Color};
use crate::expression::{Emotion, EyelidCoverage};

/// Above this blink amount the iris stack is not drawn at all.
pub const CLOSED_THRESHOLD: f32 = 0.98;

pub const SCLERA: Color = Color::rgb(245, 240, 240);
pub const OUTLINE: Color = Color::rgb(80, 60, 60);
pub const SHADING_RING: Color = Color::rgb(230, 220, 220);
pub const LIMBAL_RING: Color = Color::rgb(30, 40, 80);
pub const IRIS: Color = Color::rgb(80, 150, 220);
pub const PUPIL: Color = Color::rgb(10, 10, 10);
pub const HIGHLIGHT: Color = Color::WHITE;
pub const LID_TOP: Color = Color::rgb(50, 35, 30);
pub const LID_BOTTOM: Color = Color::rgb(40, 30, 25);

const OUTLINE_WIDTH: f32 = 4.0;
// Lid rectangles overhang the eye disc so anti-aliased edges are hidden too.
const LID_OVERHANG: i32 = 2;

/// Eye and pupil dimensions, in canvas pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeGeometry {
    pub eye_radius: f32,
    /// Radius of the whole iris disc; the pupil proper is a fraction of it.
    pub pupil_radius: f32,
    /// Horizontal gap between the two eye discs.
    pub eye_gap: f32,
    /// Clearance kept between the iris and the eye outline at full travel.
    pub travel_margin: f32,
}

impl Default for EyeGeometry {
    fn default() -> Self {
        Self {
            eye_radius: 140.0,
            pupil_radius: 41.0,
            eye_gap: 120.0,
            travel_margin: 20.0,
        }
    }
}

impl EyeGeometry {
    pub fn travel_radius(&self) -> f32 {
        (self.eye_radius - self.pupil_radius - self.travel_margin).max(0.0)
    }

    /// Left and right eye centers on a canvas of the given size.
    pub fn centers(&self, width: u32, height: u32) -> [[f32; 2]; 2] {
        let cx = (width / 2) as f32;
        let cy = (height / 2) as f32;
        let dx = self.eye_gap / 2.0 + self.eye_radius;
        [[cx - dx, cy], [cx + dx, cy]]
    }
}

/// Paint one eye: sclera, shading, iris stack, lids, then the outline again
/// so the lids never hide the eye boundary.
pub fn draw_eye(
    canvas: &mut Canvas,
    geometry: &EyeGeometry,
    center: [f32; 2],
    pupil_offset: [f32; 2],
    blink_amount: f32,
    emotion: Emotion,
) {
    let r = geometry.eye_radius;

    canvas.fill_circle(center, r, SCLERA);
    canvas.stroke_circle(center, r, OUTLINE_WIDTH, OUTLINE);
    for ring in [0.85, 0.6] {
        canvas.stroke_circle(center, (r * ring).floor(), 2.0, SHADING_RING);
    }

    if blink_amount < CLOSED_THRESHOLD {
        draw_iris(canvas, geometry.pupil_radius, center, pupil_offset);
    }

    let coverage = EyelidCoverage::compute(blink_amount, emotion);
    if coverage.active {
        draw_lids(canvas, r, center, &coverage);
        canvas.stroke_circle(center, r, OUTLINE_WIDTH, OUTLINE);
    }
}

fn draw_iris(canvas: &mut Canvas, pr: f32, center: [f32; 2], offset: [f32; 2]) {
    let c = [center[0] + offset[0], center[1] + offset[1]];
    canvas.fill_circle(c, pr, LIMBAL_RING);
    canvas.fill_circle(c, (pr * 0.9).floor(), IRIS);
    canvas.fill_circle(c, (pr * 0.45).floor(), PUPIL);
    let highlight = [c[0] - pr * 0.3, c[1] - pr * 0.3];
    canvas.fill_circle(highlight, (pr * 0.35).floor(), HIGHLIGHT);
}

fn draw_lids(canvas: &mut Canvas, r: f32, center: [f32; 2], coverage: &EyelidCoverage) {
    let (cx, cy, r) = (center[0] as i32, center[1] as i32, r as i32);
    let x0 = cx - r - LID_OVERHANG;
    let x1 = cx + r + LID_OVERHANG;

    let top_h = (coverage.top * 2.0 * r as f32) as i32;
    let y0 = cy - r;
    let y1 = (cy - r + top_h).min(cy + r);
    if y1 > y0 {
        canvas.fill_rect(x0, y0 - LID_OVERHANG, x1, y1, LID_TOP);
    }

    let bottom_h = (coverage.bottom * 2.0 * r as f32) as i32;
    let yb0 = cy + r - bottom_h;
    let yb1 = cy + r;
    if yb0 < yb1 {
        canvas.fill_rect(x0, yb0, x1, yb1 + LID_OVERHANG, LID_BOTTOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(offset: [f32; 2], blink: f32, emotion: Emotion) -> Canvas {
        let geometry = EyeGeometry::default();
        let mut canvas = Canvas::new(400, 400, Color::BLACK);
        let center = [200.0, 200.0];
        draw_eye(&mut canvas, &geometry, center, offset, blink, emotion);
        canvas
    }

    fn count(canvas: &Canvas, color: Color) -> usize {
        canvas.pixels().iter().filter(|p| **p == color).count()
    }

    #[test]
    fn test_open_eye_shows_iris_and_pupil() {
        let canvas = render([0.0, 0.0], 0.0, Emotion::Neutral);
        assert_eq!(canvas.pixel(200, 200), Some(PUPIL));
        assert!(count(&canvas, IRIS) > 0);
        assert!(count(&canvas, HIGHLIGHT) > 0);
        assert_eq!(count(&canvas, LID_TOP), 0);
    }

    #[test]
    fn test_closed_neutral_eye_hides_iris_layer() {
        let canvas = render([0.0, 0.0], 1.0, Emotion::Neutral);
        assert_eq!(count(&canvas, IRIS), 0);
        assert_eq!(count(&canvas, PUPIL), 0);
        assert_eq!(count(&canvas, LIMBAL_RING), 0);
        assert_eq!(canvas.pixel(200, 200), Some(LID_TOP));
    }

    #[test]
    fn test_pupil_follows_offset() {
        let canvas = render([-60.0, 0.0], 0.0, Emotion::Neutral);
        assert_eq!(canvas.pixel(140, 200), Some(PUPIL));
        assert_ne!(canvas.pixel(200, 200), Some(PUPIL));
    }

    #[test]
    fn test_sleepy_covers_upper_part() {
        let canvas = render([0.0, 0.0], 0.0, Emotion::Sleepy);
        // 0.45 of the 280px diameter from the top of the eye at y=60.
        assert_eq!(canvas.pixel(200, 70), Some(LID_TOP));
        assert_eq!(canvas.pixel(200, 180), Some(LID_TOP));
        assert_eq!(canvas.pixel(200, 200), Some(PUPIL));
    }

    #[test]
    fn test_sad_raises_bottom_lid() {
        let canvas = render([0.0, 0.0], 0.0, Emotion::Sad);
        assert_eq!(canvas.pixel(200, 330), Some(LID_BOTTOM));
        assert_eq!(count(&canvas, LID_TOP), 0);
    }

    #[test]
    fn test_surprised_open_eye_has_no_lid_fill() {
        let canvas = render([0.0, 0.0], 0.0, Emotion::Surprised);
        assert_eq!(count(&canvas, LID_TOP), 0);
        assert_eq!(count(&canvas, LID_BOTTOM), 0);
        assert_eq!(canvas.pixel(200, 200), Some(PUPIL));
    }

    #[test]
    fn test_outline_drawn_over_closed_lids() {
        let canvas = render([0.0, 0.0], 1.0, Emotion::Neutral);
        // Both pixels sit inside the top lid rectangle, on the eye boundary.
        assert_eq!(canvas.pixel(200, 60), Some(OUTLINE));
        assert_eq!(canvas.pixel(60, 200), Some(OUTLINE));
        assert_eq!(canvas.pixel(200, 62), Some(LID_TOP));
    }

    #[test]
    fn test_outline_kept_when_surprised() {
        let open = render([0.0, 0.0], 0.0, Emotion::Surprised);
        assert_eq!(open.pixel(200, 60), Some(OUTLINE));
        assert_eq!(open.pixel(60, 200), Some(OUTLINE));
        assert_eq!(open.pixel(200, 200), Some(PUPIL));

        let closed = render([0.0, 0.0], 1.0, Emotion::Surprised);
        assert_eq!(closed.pixel(200, 339), Some(OUTLINE));
        assert_eq!(closed.pixel(200, 335), Some(LID_BOTTOM));
    }

    #[test]
    fn test_geometry_layout() {
        let g = EyeGeometry::default();
        assert_eq!(g.travel_radius(), 79.0);
        assert_eq!(g.centers(800, 400), [[200.0, 200.0], [600.0, 200.0]]);
    }
}
