use glam::{Mat3, Vec3};

use crate::core::canvas::Canvas;
use crate::math::to_rgba8;

const LUMA: Vec3 = Vec3::new(0.299, 0.587, 0.114);
/// Width of the soft knee above the bloom threshold
const KNEE: f32 = 0.01;
/// Blur radius of each mip level, finest first
const KERNEL_RADII: [usize; 5] = [3, 5, 7, 9, 11];
const LEVEL_FACTORS: [f32; 5] = [1.0, 0.8, 0.6, 0.4, 0.2];

const ACES_INPUT: Mat3 = Mat3::from_cols(
    Vec3::new(0.59719, 0.07600, 0.02840),
    Vec3::new(0.35458, 0.90834, 0.13383),
    Vec3::new(0.04823, 0.01566, 0.83777),
);
const ACES_OUTPUT: Mat3 = Mat3::from_cols(
    Vec3::new(1.60475, -0.10208, -0.00327),
    Vec3::new(-0.53108, 1.10813, -0.07276),
    Vec3::new(-0.07367, -0.00605, 1.07602),
);

/// Glow around pixels brighter than `threshold`
///
/// Bright pixels are blurred over a chain of five half-resolution levels and
/// added back scaled by `strength`. `radius` in [0, 1] shifts weight from
/// the sharp levels towards the wide ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bloom {
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

impl Bloom {
    pub fn new(threshold: f32, strength: f32, radius: f32) -> Self {
        Self {
            threshold,
            strength,
            radius,
        }
    }

    fn level_factor(&self, level: usize) -> f32 {
        let factor = LEVEL_FACTORS[level];
        factor + (1.2 - 2.0 * factor) * self.radius
    }
}

/// Mapping from the linear frame to displayable [0, 1] color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToneMapping {
    /// Channels are clamped
    #[default]
    None,
    /// Filmic curve fitted to ACES, rolls highlights off instead of clipping
    AcesFilmic,
}

/// Apply bloom then tone mapping to a finished frame
pub fn apply(canvas: &mut Canvas, bloom: Option<&Bloom>, tone_mapping: ToneMapping) {
    if bloom.is_none() && tone_mapping == ToneMapping::None {
        return;
    }
    let mut image = Image::from_canvas(canvas);
    if image.data.is_empty() {
        return;
    }

    if let Some(bloom) = bloom {
        image.add_glow(bloom);
    }
    if tone_mapping == ToneMapping::AcesFilmic {
        image.data.iter_mut().for_each(|c| *c = aces_filmic(*c));
    }

    for (dst, c) in canvas.pixels_mut().iter_mut().zip(&image.data) {
        *dst = to_rgba8(c.to_array());
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn aces_filmic(color: Vec3) -> Vec3 {
    let v = ACES_INPUT * (color / 0.6);
    let a = v * (v + 0.0245786) - 0.000090537;
    let b = v * (0.983729 * v + 0.4329510) + 0.238081;
    (ACES_OUTPUT * (a / b)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Floating point RGB image
#[derive(Debug, Clone)]
struct Image {
    width: usize,
    height: usize,
    data: Vec<Vec3>,
}

impl Image {
    fn from_canvas(canvas: &Canvas) -> Self {
        let (width, height) = canvas.dimensions();
        let data = canvas
            .pixels()
            .iter()
            .map(|p| Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0)
            .collect();
        Self {
            width: width as usize,
            height: height as usize,
            data,
        }
    }

    fn at(&self, x: usize, y: usize) -> Vec3 {
        self.data[y * self.width + x]
    }

    fn add_glow(&mut self, bloom: &Bloom) {
        let mut level = self.high_pass(bloom.threshold);
        let mut glow = vec![Vec3::ZERO; self.data.len()];

        for (i, &radius) in KERNEL_RADII.iter().enumerate() {
            level = level.downsample().blur(radius);
            let factor = bloom.strength * bloom.level_factor(i);
            for y in 0..self.height {
                for x in 0..self.width {
                    glow[y * self.width + x] += level.sample_scaled(x, y, self.width, self.height) * factor;
                }
            }
        }

        for (c, g) in self.data.iter_mut().zip(glow) {
            *c += g;
        }
    }

    /// Keep pixels whose luma clears `threshold`, fading in over a small knee
    fn high_pass(&self, threshold: f32) -> Self {
        let data = self
            .data
            .iter()
            .map(|c| *c * smoothstep(threshold, threshold + KNEE, c.dot(LUMA)))
            .collect();
        Self { data, ..*self }
    }

    /// Half resolution by averaging 2x2 blocks, at least one pixel each way
    fn downsample(&self) -> Self {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut data = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let (x0, y0) = (x * 2, y * 2);
                let (x1, y1) = ((x0 + 1).min(self.width - 1), (y0 + 1).min(self.height - 1));
                let sum = self.at(x0, y0) + self.at(x1, y0) + self.at(x0, y1) + self.at(x1, y1);
                data.push(sum * 0.25);
            }
        }
        Self { width, height, data }
    }

    /// Separable gaussian with sigma equal to `radius`, edges clamped
    fn blur(&self, radius: usize) -> Self {
        let sigma = radius as f32;
        let taps = radius as isize - 1;
        let weights: Vec<f32> = (-taps..=taps)
            .map(|i| (-0.5 * (i * i) as f32 / (sigma * sigma)).exp())
            .collect();
        let total: f32 = weights.iter().sum();

        let pass = |src: &Self, horizontal: bool| {
            let mut data = Vec::with_capacity(src.data.len());
            for y in 0..src.height {
                for x in 0..src.width {
                    let sum = weights.iter().zip(-taps..=taps).fold(Vec3::ZERO, |acc, (w, i)| {
                        let (sx, sy) = if horizontal {
                            ((x as isize + i).clamp(0, src.width as isize - 1) as usize, y)
                        } else {
                            (x, (y as isize + i).clamp(0, src.height as isize - 1) as usize)
                        };
                        acc + src.at(sx, sy) * *w
                    });
                    data.push(sum / total);
                }
            }
            Self { data, ..*src }
        };

        pass(&pass(self, true), false)
    }

    /// Bilinear sample at the center of pixel (x, y) of a `width` x `height` grid
    fn sample_scaled(&self, x: usize, y: usize, width: usize, height: usize) -> Vec3 {
        let u = ((x as f32 + 0.5) * self.width as f32 / width as f32 - 0.5).max(0.0);
        let v = ((y as f32 + 0.5) * self.height as f32 / height as f32 - 0.5).max(0.0);
        let (x0, y0) = ((u as usize).min(self.width - 1), (v as usize).min(self.height - 1));
        let (x1, y1) = ((x0 + 1).min(self.width - 1), (y0 + 1).min(self.height - 1));
        let (fx, fy) = (u - x0 as f32, v - y0 as f32);

        let top = self.at(x0, y0).lerp(self.at(x1, y0), fx);
        let bottom = self.at(x0, y1).lerp(self.at(x1, y1), fx);
        top.lerp(bottom, fy)
    }
}
