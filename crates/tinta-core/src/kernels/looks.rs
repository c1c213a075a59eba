//! Location-inspired color looks.
//!
//! Each look is an HSV saturation/value tweak followed by per-channel
//! multipliers and constant shifts; golden hills adds an edge haze.

use crate::color::{Hsv, hsv_to_rgb, rgb_to_hsv};
use crate::image::PixelBuffer;
use crate::tone::{self, RadialFrame};

use super::FilterParams;

/// Scale saturation and value in HSV, each capped at 1.
fn scale_sv(rgb: [f32; 3], sat: f32, value: f32) -> [f32; 3] {
    let hsv = rgb_to_hsv(rgb);
    hsv_to_rgb(Hsv {
        hue: hsv.hue,
        saturation: (hsv.saturation * sat).min(1.0),
        value: (hsv.value * value).min(1.0),
    })
}

/// A look built from an HSV tweak, channel multipliers and a shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelLook {
    pub saturation: f32,
    pub value: f32,
    pub multipliers: [f32; 3],
    pub shift: [f32; 3],
}

impl ChannelLook {
    pub const GOLDEN_HILLS: Self = Self {
        saturation: 0.85,
        value: 1.10,
        multipliers: [1.08, 1.03, 1.04],
        shift: [20.0, 15.0, 10.0],
    };

    pub const PFEIFFER_BEACH: Self = Self {
        saturation: 0.85,
        value: 1.10,
        multipliers: [1.12, 1.05, 1.15],
        shift: [20.0, 10.0, 25.0],
    };

    pub fn grade(&self, rgb: [f32; 3]) -> [f32; 3] {
        let [r, g, b] = scale_sv(rgb, self.saturation, self.value);
        [
            r * self.multipliers[0] + self.shift[0],
            g * self.multipliers[1] + self.shift[1],
            b * self.multipliers[2] + self.shift[2],
        ]
    }
}

pub fn cool_tone_pixel(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    [r * 0.8, g * 0.9, b + (255.0 - b) * 0.25]
}

pub fn california_pixel(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = scale_sv(rgb, 1.25, 1.15);
    tone::scale_contrast([r + 15.0, g + 5.0, b], 1.15)
}

pub(crate) fn cool_tone(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    source.map_rgb(|rgb| params.finish(rgb, cool_tone_pixel(rgb)))
}

pub(crate) fn california(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    source.map_rgb(|rgb| params.finish(rgb, california_pixel(rgb)))
}

pub(crate) fn golden_hills(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    let look = ChannelLook::GOLDEN_HILLS;
    let edge_haze = params.extra("edge_haze", 0.5);
    let frame = RadialFrame::new(source.width(), source.height());
    source.map_rgb_at(|x, y, rgb| {
        let edge = frame.normalized_distance(x, y).powf(1.2) * edge_haze;
        let [r, g, b] = look.grade(rgb);
        let graded = [
            r + edge * look.shift[0],
            g + edge * look.shift[1],
            b + edge * look.shift[2],
        ];
        params.finish(rgb, graded)
    })
}

pub(crate) fn pfeiffer_beach(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    let look = ChannelLook::PFEIFFER_BEACH;
    source.map_rgb(|rgb| params.finish(rgb, look.grade(rgb)))
}
