//! Perceptual color-distance masking for selective recoloring.
//!
//! Each target contributes `exp(−ΔE² / 2σ²)` where ΔE is the Lab distance
//! from the pixel; the pixel's mask is the maximum over targets, so
//! overlapping targets do not compound.

use crate::color::{self, Hsv, LabColor, rgb_to_hsv, rgb_to_lab};

/// A target color in Lab with its Gaussian falloff width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabTarget {
    pub lab: LabColor,
    pub sigma: f32,
}

impl LabTarget {
    pub fn from_rgb(rgb: [u8; 3], sigma: f32) -> Self {
        Self {
            lab: rgb_to_lab([rgb[0] as f32, rgb[1] as f32, rgb[2] as f32]),
            sigma,
        }
    }

    /// Selection weight in `[0, 1]` for a pixel.
    pub fn weight(&self, pixel: LabColor) -> f32 {
        if self.sigma <= 0.0 {
            return if pixel.delta_e(self.lab) == 0.0 { 1.0 } else { 0.0 };
        }
        let delta_e = pixel.delta_e(self.lab);
        (-(delta_e * delta_e) / (2.0 * self.sigma * self.sigma)).exp()
    }
}

/// Maximum weight across `targets`; zero when there are none.
pub fn mask_weight(pixel: LabColor, targets: &[LabTarget]) -> f32 {
    targets
        .iter()
        .map(|t| t.weight(pixel))
        .fold(0.0, f32::max)
}

/// Luminance-preserving false color: the pixel's gray value re-expressed
/// in the hue and saturation of `background`.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundTone {
    hue: f32,
    saturation: f32,
}

impl BackgroundTone {
    pub fn new(background: [u8; 3]) -> Self {
        let Hsv {
            hue, saturation, ..
        } = rgb_to_hsv([
            background[0] as f32,
            background[1] as f32,
            background[2] as f32,
        ]);
        Self { hue, saturation }
    }

    pub fn substitute(&self, rgb: [f32; 3]) -> [f32; 3] {
        let gray = color::luma(rgb) / 255.0;
        color::hsv_to_rgb(Hsv {
            hue: self.hue,
            saturation: self.saturation,
            value: gray,
        })
    }
}

/// Blend `rgb` toward the background tone wherever the mask is weak.
///
/// ```text
/// out = mask · pixel + (1 − mask) · background(gray(pixel))
/// ```
pub fn select(rgb: [f32; 3], targets: &[LabTarget], background: &BackgroundTone) -> [f32; 3] {
    let mask = mask_weight(rgb_to_lab(rgb), targets);
    let bg = background.substitute(rgb);
    [
        rgb[0] * mask + bg[0] * (1.0 - mask),
        rgb[1] * mask + bg[1] * (1.0 - mask),
        rgb[2] * mask + bg[2] * (1.0 - mask),
    ]
}
