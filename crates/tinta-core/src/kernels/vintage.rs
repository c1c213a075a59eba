//! Multi-stage vintage grade.
//!
//! ```text
//! dup    = invert(red − red_shift)
//! fused  = lerp(src, soft_light(src, dup), fuse_opacity)
//! graded = balance(contrast(brightness(saturate(fused))))
//! ```
//!
//! The duplicate, soft-light and fused layers are stored as 8-bit
//! channels, so each is rounded and clamped before the next stage reads it.

use crate::color::{Hsv, hsv_to_rgb, rgb_to_hsv};
use crate::image::{PixelBuffer, to_channel};
use crate::tone::{self, soft_light};

use super::FilterParams;

/// Tunables of the vintage grade; defaults are the registry defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VintageGrade {
    pub red_shift: f32,
    pub fuse_opacity: f32,
    pub saturation: f32,
    pub brightness_mul: f32,
    pub contrast_mul: f32,
    pub balance: [f32; 3],
}

impl Default for VintageGrade {
    fn default() -> Self {
        Self {
            red_shift: 100.0,
            fuse_opacity: 0.85,
            saturation: 1.13,
            brightness_mul: 1.13,
            contrast_mul: 1.13,
            balance: [-15.0, 15.0, 2.0],
        }
    }
}

impl VintageGrade {
    pub fn from_params(params: &FilterParams) -> Self {
        let d = Self::default();
        Self {
            red_shift: params.extra("red_shift", d.red_shift),
            fuse_opacity: params.extra("fuse_opacity", d.fuse_opacity),
            saturation: params.extra("saturation", d.saturation),
            brightness_mul: params.extra("brightness_mul", d.brightness_mul),
            contrast_mul: params.extra("contrast_mul", d.contrast_mul),
            balance: [
                params.extra("balance_r", d.balance[0]),
                params.extra("balance_g", d.balance[1]),
                params.extra("balance_b", d.balance[2]),
            ],
        }
    }

    /// Full-strength grade of one pixel.
    pub fn grade(&self, rgb: [f32; 3]) -> [f32; 3] {
        let dup = [
            255.0 - quantize(rgb[0] - self.red_shift),
            255.0 - rgb[1],
            255.0 - rgb[2],
        ];
        let layered = tone::blend_rgb(rgb, dup, soft_light).map(quantize);
        let fused = tone::mix(rgb, layered, self.fuse_opacity.clamp(0.0, 1.0)).map(quantize);

        let hsv = rgb_to_hsv(fused);
        let saturated = hsv_to_rgb(Hsv {
            saturation: (hsv.saturation * self.saturation).min(1.0),
            ..hsv
        });
        let brightened = saturated.map(|c| (c * self.brightness_mul).min(255.0));
        let contrasted = tone::scale_contrast(brightened, self.contrast_mul);

        [
            (contrasted[0] + self.balance[0]).clamp(0.0, 255.0),
            (contrasted[1] + self.balance[1]).clamp(0.0, 255.0),
            (contrasted[2] + self.balance[2]).clamp(0.0, 255.0),
        ]
    }
}

fn quantize(v: f32) -> f32 {
    f32::from(to_channel(v))
}

pub(crate) fn apply(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    let grade = VintageGrade::from_params(params);
    source.map_rgb(|rgb| params.finish(rgb, grade.grade(rgb)))
}
