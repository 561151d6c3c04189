use crate::math::{to_rgba8, Rgb};
use crate::scene::FogExp2;

/// Screen-space vertex produced by projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterPoint {
    /// Pixel coordinates, origin top-left
    pub x: f32,
    pub y: f32,
    /// Normalized depth in [0, 1]
    pub depth: f32,
    /// Distance along the view axis, used for fog and perspective correction
    pub view_depth: f32,
}

/// Signed area of a screen triangle; negative when the corners run
/// counter-clockwise in normalized device space (front facing)
pub fn screen_area(v: &[RasterPoint; 3]) -> f32 {
    edge(&v[0], &v[1], v[2].x, v[2].y)
}

fn edge(a: &RasterPoint, b: &RasterPoint, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

fn shade(color: Rgb, fog: Option<&FogExp2>, view_depth: f32) -> [u8; 4] {
    match fog {
        Some(fog) => to_rgba8(fog.apply(color, view_depth)),
        None => to_rgba8(color),
    }
}

/// RGBA color buffer with a depth buffer
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<[u8; 4]>,
    depth: Vec<f32>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create new canvas with dimensions
    pub fn new(width: u32, height: u32) -> Self {
        let count = width as usize * height as usize;
        Self {
            pixels: vec![[0, 0, 0, 255]; count],
            depth: vec![1.0; count],
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        &mut self.pixels
    }

    /// Pixels as a tightly packed RGBA byte buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x as i32, y as i32).map(|i| self.pixels[i])
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x as i32, y as i32).map(|i| self.depth[i])
    }

    /// Reallocate for new dimensions; contents are reset
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Fill with color and reset depth to the far plane
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(to_rgba8(color));
        self.depth.fill(1.0);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Depth-tested write, returns true if the pixel was written
    fn plot(&mut self, x: i32, y: i32, depth: f32, rgba: [u8; 4]) -> bool {
        if !(0.0..=1.0).contains(&depth) {
            return false;
        }
        match self.index(x, y) {
            Some(i) if depth <= self.depth[i] => {
                self.depth[i] = depth;
                self.pixels[i] = rgba;
                true
            }
            _ => false,
        }
    }

    /// Draw a square point of `size` pixels centered on `p`
    pub fn draw_point(&mut self, p: RasterPoint, size: u32, color: Rgb, fog: Option<&FogExp2>) {
        let rgba = shade(color, fog, p.view_depth);
        let size = size.max(1) as i32;
        let x0 = p.x.floor() as i32 - (size - 1) / 2;
        let y0 = p.y.floor() as i32 - (size - 1) / 2;

        for dy in 0..size {
            for dx in 0..size {
                let _ = self.plot(x0 + dx, y0 + dy, p.depth, rgba);
            }
        }
    }

    /// Draw a line, interpolating depth along it
    pub fn draw_line(&mut self, a: RasterPoint, b: RasterPoint, color: Rgb, fog: Option<&FogExp2>) {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let limit = 4 * (self.width + self.height) as usize;
        let steps = (dx.abs().max(dy.abs()).ceil() as usize).clamp(1, limit.max(1));

        let (inv_a, inv_b) = (1.0 / a.view_depth, 1.0 / b.view_depth);

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.x + dx * t;
            let y = a.y + dy * t;
            let depth = a.depth + (b.depth - a.depth) * t;
            let view_depth = 1.0 / (inv_a + (inv_b - inv_a) * t);

            let rgba = shade(color, fog, view_depth);
            let _ = self.plot(x.floor() as i32, y.floor() as i32, depth, rgba);
        }
    }

    /// Fill a triangle with perspective-correct interpolated vertex colors
    pub fn fill_triangle(&mut self, v: [RasterPoint; 3], colors: [Rgb; 3], fog: Option<&FogExp2>) {
        let area = screen_area(&v);
        if area.abs() < 1e-8 {
            return;
        }

        let min_x = v.iter().map(|p| p.x).fold(f32::MAX, f32::min).floor().max(0.0) as i32;
        let min_y = v.iter().map(|p| p.y).fold(f32::MAX, f32::min).floor().max(0.0) as i32;
        let max_x = v
            .iter()
            .map(|p| p.x)
            .fold(f32::MIN, f32::max)
            .ceil()
            .min(self.width as f32 - 1.0) as i32;
        let max_y = v
            .iter()
            .map(|p| p.y)
            .fold(f32::MIN, f32::max)
            .ceil()
            .min(self.height as f32 - 1.0) as i32;

        let inv_w = v.map(|p| 1.0 / p.view_depth);

        for y in min_y..=max_y {
            let py = y as f32 + 0.5;
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;

                let b0 = edge(&v[1], &v[2], px, py) / area;
                let b1 = edge(&v[2], &v[0], px, py) / area;
                let b2 = edge(&v[0], &v[1], px, py) / area;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }

                let depth = b0 * v[0].depth + b1 * v[1].depth + b2 * v[2].depth;

                let (p0, p1, p2) = (b0 * inv_w[0], b1 * inv_w[1], b2 * inv_w[2]);
                let sum = p0 + p1 + p2;
                let view_depth = 1.0 / sum;
                let (p0, p1, p2) = (p0 / sum, p1 / sum, p2 / sum);

                let color = [
                    colors[0][0] * p0 + colors[1][0] * p1 + colors[2][0] * p2,
                    colors[0][1] * p0 + colors[1][1] * p1 + colors[2][1] * p2,
                    colors[0][2] * p0 + colors[1][2] * p1 + colors[2][2] * p2,
                ];

                let _ = self.plot(x, y, depth, shade(color, fog, view_depth));
            }
        }
    }
}
