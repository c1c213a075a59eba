//! Color space conversions (RGB↔HSV, RGB→Lab). No state.

pub mod hsv;
pub mod lab;

pub use hsv::{Hsv, hsv_to_rgb, rgb_to_hsv};
pub use lab::{LabColor, rgb_to_lab};

/// Rec. 601 luma weights used for every grayscale derivation.
pub const LUMA_REC601: [f32; 3] = [0.299, 0.587, 0.114];

/// Luma of an RGB triple, in the same range as the input.
#[inline]
pub fn luma(rgb: [f32; 3]) -> f32 {
    rgb[0] * LUMA_REC601[0] + rgb[1] * LUMA_REC601[1] + rgb[2] * LUMA_REC601[2]
}

/// Parse a `#rrggbb` (or `rrggbb`) hex string.
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Format an RGB triple as `#rrggbb`.
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
