//! Tonal remaps: brightness/contrast, smooth S-curve, sepia, intensity mix.
//!
//! All channel values are `f32` in the 8-bit range `[0, 255]` unless noted.

use serde::{Deserialize, Serialize};

/// Contrast slider range accepted by [`contrast_factor`].
pub const CONTRAST_RANGE: (f32, f32) = (-100.0, 100.0);
/// Brightness slider range (percent of full scale).
pub const BRIGHTNESS_RANGE: (f32, f32) = (-100.0, 100.0);

/// Standard contrast correction factor.
///
/// ```text
/// factor = 259 · (c + 255) / (255 · (259 − c))
/// ```
///
/// Only defined for `c ∈ (−255, 259)`; input is clamped to
/// [`CONTRAST_RANGE`] first. `c = 0` gives exactly 1.
pub fn contrast_factor(contrast: f32) -> f32 {
    let c = contrast.clamp(CONTRAST_RANGE.0, CONTRAST_RANGE.1);
    (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
}

/// Final normalization pass shared by every kernel.
///
/// ```text
/// out = clamp(factor · (in − 128) + 128 + 255 · brightness / 100)
/// ```
///
/// `brightness = 0` and `contrast = 0` are the identity.
pub fn brightness_contrast(rgb: [f32; 3], brightness: f32, contrast: f32) -> [f32; 3] {
    let factor = contrast_factor(contrast);
    let offset = 255.0 * brightness.clamp(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1) / 100.0;
    rgb.map(|c| (factor * (c - 128.0) + 128.0 + offset).clamp(0.0, 255.0))
}

/// Multiply each channel's distance from mid-gray.
pub fn scale_contrast(rgb: [f32; 3], factor: f32) -> [f32; 3] {
    rgb.map(|c| (c - 128.0) * factor + 128.0)
}

/// Smoothstep-shaped value curve used by the regrade kernels.
///
/// ```text
/// s = v²(3 − 2v)
/// out = clamp(v · (shadow + (hi − shadow) · s) · mid, 0, 1)
/// ```
///
/// With the defaults shadows are pulled down and highlights lifted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothContrast {
    pub mid_boost: f32,
    pub shadow_mul: f32,
    pub hi_mul: f32,
}

impl Default for SmoothContrast {
    fn default() -> Self {
        Self {
            mid_boost: 1.05,
            shadow_mul: 0.93,
            hi_mul: 1.06,
        }
    }
}

impl SmoothContrast {
    /// A curve that leaves every value unchanged.
    pub const IDENTITY: Self = Self {
        mid_boost: 1.0,
        shadow_mul: 1.0,
        hi_mul: 1.0,
    };

    /// Apply to a value in `[0, 1]`.
    pub fn apply(&self, v: f32) -> f32 {
        let t = v.clamp(0.0, 1.0);
        let smooth = t * t * (3.0 - 2.0 * t);
        let boost = self.shadow_mul + (self.hi_mul - self.shadow_mul) * smooth;
        (v * boost * self.mid_boost).clamp(0.0, 1.0)
    }
}

/// Classic sepia tone matrix.
pub fn sepia(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    [
        0.393 * r + 0.769 * g + 0.189 * b,
        0.349 * r + 0.686 * g + 0.168 * b,
        0.272 * r + 0.534 * g + 0.131 * b,
    ]
}

/// Slider intensity (`0..=100`) as a blend factor in `[0, 1]`.
pub fn intensity_factor(intensity: f32) -> f32 {
    (intensity / 100.0).clamp(0.0, 1.0)
}

/// Per-channel linear interpolation from `source` (t = 0) to `graded` (t = 1).
pub fn mix(source: [f32; 3], graded: [f32; 3], t: f32) -> [f32; 3] {
    [
        source[0] * (1.0 - t) + graded[0] * t,
        source[1] * (1.0 - t) + graded[1] * t,
        source[2] * (1.0 - t) + graded[2] * t,
    ]
}
