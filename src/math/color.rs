/// Linear RGB color, components in [0, 1]
pub type Rgb = [f32; 3];

/// Convert a 0xRRGGBB hex value to RGB
pub fn hex_to_rgb(hex: u32) -> Rgb {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Convert 8-bit channels to RGB
pub fn rgb8(r: u8, g: u8, b: u8) -> Rgb {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

/// Convert hue/saturation/lightness to RGB
/// Hue wraps around, so `hsl_to_rgb(-0.3, ..)` equals `hsl_to_rgb(0.7, ..)`
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let high = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let low = 2.0 * l - high;

    [
        hue_to_channel(low, high, h + 1.0 / 3.0),
        hue_to_channel(low, high, h),
        hue_to_channel(low, high, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(low: f32, high: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);

    if t < 1.0 / 6.0 {
        low + (high - low) * 6.0 * t
    } else if t < 0.5 {
        high
    } else if t < 2.0 / 3.0 {
        low + (high - low) * 6.0 * (2.0 / 3.0 - t)
    } else {
        low
    }
}

/// Multiply two colors component-wise
pub fn modulate(a: Rgb, b: Rgb) -> Rgb {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}

/// Linear interpolation between two colors
pub fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Quantize to 8-bit RGBA, clamping out-of-range components
pub fn to_rgba8(color: Rgb) -> [u8; 4] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    [channel(color[0]), channel(color[1]), channel(color[2]), 255]
}
