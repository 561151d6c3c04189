mod color;

pub use color::{hex_to_rgb, hsl_to_rgb, mix, modulate, rgb8, to_rgba8, Rgb};
