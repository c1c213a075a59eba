//! RGB ↔ HSV conversion on 8-bit channel values.

use serde::{Deserialize, Serialize};

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

/// Convert RGB channels in `[0, 255]` to HSV.
///
/// Achromatic input (max == min) maps to hue 0 and saturation 0. When two
/// channels tie for the maximum, red wins over green and green over blue.
pub fn rgb_to_hsv(rgb: [f32; 3]) -> Hsv {
    let r = rgb[0] / 255.0;
    let g = rgb[1] / 255.0;
    let b = rgb[2] / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max <= 0.0 { 0.0 } else { delta / max };

    if delta <= 0.0 {
        return Hsv {
            hue: 0.0,
            saturation,
            value: max,
        };
    }

    let sector = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    let mut hue = sector * 60.0;
    if hue >= 360.0 {
        hue -= 360.0;
    }

    Hsv {
        hue,
        saturation,
        value: max,
    }
}

/// Convert HSV back to RGB channels in `[0, 255]` (unrounded).
///
/// Hues outside `[0, 360)` are wrapped first.
pub fn hsv_to_rgb(hsv: Hsv) -> [f32; 3] {
    let hue = hsv.hue.rem_euclid(360.0);
    let s = hsv.saturation.clamp(0.0, 1.0);
    let v = hsv.value.clamp(0.0, 1.0);

    let c = v * s;
    let hh = hue / 60.0;
    let x = c * (1.0 - ((hh % 2.0) - 1.0).abs());

    let (r1, g1, b1) = match hh as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = v - c;
    [(r1 + m) * 255.0, (g1 + m) * 255.0, (b1 + m) * 255.0]
}
