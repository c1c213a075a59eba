//! Neighbourhood and position kernels: sharpen, vignette, blur.
//!
//! These scale their strength by intensity instead of blending, so
//! intensity 0 is still the identity.

use crate::image::PixelBuffer;
use crate::tone::{self, RadialFrame};

use super::FilterParams;

pub(crate) fn sharpen(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    let radius = params.extra("radius", 2.0);
    let amount = params.extra("amount", 1.5) * params.blend_factor();
    let low = tone::gaussian_blur(source, radius);
    source.zip_rgb(&low, |rgb, blurred| {
        params.tone_only(tone::unsharp(rgb, blurred, amount))
    })
}

pub(crate) fn vignette(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    let strength = params.extra("strength", 0.75) * params.blend_factor();
    let frame = RadialFrame::new(source.width(), source.height());
    source.map_rgb_at(|x, y, rgb| {
        let k = frame.vignette(x, y, strength);
        params.tone_only(rgb.map(|c| c * k))
    })
}

pub(crate) fn blur(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    let radius = params.extra("max_radius", 10.0) * params.blend_factor();
    tracing::debug!(radius, "blur");
    tone::gaussian_blur(source, radius).map_rgb(|rgb| params.tone_only(rgb))
}
