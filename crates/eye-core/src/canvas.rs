//! CPU frame buffer the eyes are painted into before upload.

/// 8-bit sRGB color with alpha, laid out for direct texture upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Blend `self` over `dst` with `coverage` in `[0, 1]`.
    fn over(self, dst: Color, coverage: f32) -> Color {
        let mix = |s: u8, d: u8| -> u8 {
            (d as f32 + (s as f32 - d as f32) * coverage).round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: 255,
        }
    }
}

/// A width × height RGBA frame, row-major, origin at the top-left.
#[derive(Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Raw RGBA bytes for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Anti-aliased filled disc.
    pub fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color) {
        self.shade_around(center, radius + 1.0, |d| radius + 0.5 - d, color);
    }

    /// Anti-aliased ring of the given stroke thickness, centered on `radius`.
    pub fn stroke_circle(&mut self, center: [f32; 2], radius: f32, thickness: f32, color: Color) {
        let half = thickness * 0.5;
        let ring = |d: f32| half + 0.5 - (d - radius).abs();
        self.shade_around(center, radius + half + 1.0, ring, color);
    }

    /// Solid rectangle over the inclusive pixel span `[x0, x1] × [y0, y1]`,
    /// clipped to the canvas.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let clip_x = |v: i32| v.clamp(0, self.width as i32 - 1);
        let clip_y = |v: i32| v.clamp(0, self.height as i32 - 1);
        if self.width == 0 || self.height == 0 || x1 < 0 || y1 < 0 {
            return;
        }
        if x0 >= self.width as i32 || y0 >= self.height as i32 {
            return;
        }
        let (x0, x1, y0, y1) = (clip_x(x0), clip_x(x1), clip_y(y0), clip_y(y1));
        for y in y0..=y1 {
            let row = (y as usize) * (self.width as usize);
            for x in x0..=x1 {
                self.pixels[row + x as usize] = color;
            }
        }
    }

    /// Visit every pixel within `reach` of `center`; `coverage` maps the
    /// distance from the pixel center to an unclamped coverage value.
    fn shade_around<F>(&mut self, center: [f32; 2], reach: f32, coverage: F, color: Color)
    where
        F: Fn(f32) -> f32,
    {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x0 = ((center[0] - reach).floor().max(0.0)) as u32;
        let y0 = ((center[1] - reach).floor().max(0.0)) as u32;
        let x1 = ((center[0] + reach).ceil().max(0.0) as u32).min(self.width - 1);
        let y1 = ((center[1] + reach).ceil().max(0.0) as u32).min(self.height - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center[0];
                let dy = y as f32 + 0.5 - center[1];
                let c = coverage((dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
                if c <= 0.0 {
                    continue;
                }
                let i = self.index(x, y);
                self.pixels[i] = if c >= 1.0 { color } else { color.over(self.pixels[i], c) };
            }
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn test_fill_circle_covers_center_not_corners() {
        let mut canvas = Canvas::new(40, 40, Color::BLACK);
        canvas.fill_circle([20.0, 20.0], 10.0, RED);
        assert_eq!(canvas.pixel(20, 20), Some(RED));
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(20, 35), Some(Color::BLACK));
    }

    #[test]
    fn test_stroke_circle_leaves_interior() {
        let mut canvas = Canvas::new(40, 40, Color::BLACK);
        canvas.stroke_circle([20.0, 20.0], 10.0, 2.0, RED);
        assert_eq!(canvas.pixel(20, 20), Some(Color::BLACK));
        assert_eq!(canvas.pixel(29, 19), Some(RED));
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut canvas = Canvas::new(10, 10, Color::BLACK);
        canvas.fill_rect(-5, -5, 3, 3, RED);
        canvas.fill_rect(8, 8, 20, 20, RED);
        canvas.fill_rect(20, 20, 30, 30, RED);
        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(3, 3), Some(RED));
        assert_eq!(canvas.pixel(4, 4), Some(Color::BLACK));
        assert_eq!(canvas.pixel(9, 9), Some(RED));
    }

    #[test]
    fn test_shapes_off_canvas_are_ignored() {
        let mut canvas = Canvas::new(10, 10, Color::BLACK);
        canvas.fill_circle([-50.0, -50.0], 5.0, RED);
        assert!(canvas.pixels().iter().all(|p| *p == Color::BLACK));
    }

    #[test]
    fn test_bytes_are_rgba() {
        let canvas = Canvas::new(2, 1, Color::rgb(1, 2, 3));
        assert_eq!(canvas.as_bytes(), &[1, 2, 3, 255, 1, 2, 3, 255]);
    }
}
