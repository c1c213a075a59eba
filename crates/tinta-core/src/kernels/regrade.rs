//! Warm/cool hue regrade driven by the hue/saturation LUTs.

use crate::color::{Hsv, hsv_to_rgb, rgb_to_hsv};
use crate::image::PixelBuffer;
use crate::lut::{HueSatLut, LutCache, LutVariant};
use crate::tone::SmoothContrast;

use super::FilterParams;

/// Full-strength regrade of one pixel.
///
/// Hue and saturation come from the LUT bucket of the source hue; value
/// goes through the smooth S-curve. Saturation is capped at 1.
pub fn regrade_pixel(rgb: [f32; 3], lut: &HueSatLut, curve: &SmoothContrast) -> [f32; 3] {
    let hsv = rgb_to_hsv(rgb);
    let (hue, sat_mult) = lut.lookup(hsv.hue);
    hsv_to_rgb(Hsv {
        hue,
        saturation: (hsv.saturation * sat_mult).min(1.0),
        value: curve.apply(hsv.value),
    })
}

pub(crate) fn apply(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    let variant = LutVariant::from_index(params.extra("variant", 1.0));
    let lut = LutCache::global().get_or_build(&variant.config());
    let defaults = SmoothContrast::default();
    let curve = SmoothContrast {
        mid_boost: params.extra("mid_boost", defaults.mid_boost),
        shadow_mul: params.extra("shadow_mul", defaults.shadow_mul),
        hi_mul: params.extra("hi_mul", defaults.hi_mul),
    };
    tracing::debug!(?variant, "regrade");

    source.map_rgb(|rgb| params.finish(rgb, regrade_pixel(rgb, &lut, &curve)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lut::bucket_distance;

    fn teal_lut() -> HueSatLut {
        LutVariant::OrangeTeal.config().build()
    }

    #[test]
    fn test_warm_pixel_moves_toward_warm_anchor() {
        let lut = teal_lut();
        let out = regrade_pixel([200.0, 100.0, 50.0], &lut, &SmoothContrast::IDENTITY);
        let before = rgb_to_hsv([200.0, 100.0, 50.0]);
        let after = rgb_to_hsv(out);
        let warm = 17.0;
        assert!(
            bucket_distance(after.hue / 2.0, warm) < bucket_distance(before.hue / 2.0, warm)
        );
        assert!(after.saturation > before.saturation);
    }

    #[test]
    fn test_gray_stays_gray() {
        let lut = teal_lut();
        let out = regrade_pixel([128.0, 128.0, 128.0], &lut, &SmoothContrast::IDENTITY);
        for c in out {
            assert!((c - 128.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_variant_extra_selects_table() {
        let src = PixelBuffer::from_pixels(1, 1, &[[60, 200, 60, 255]]).unwrap();
        let v1 = apply(&src, &FilterParams::default().with_extra("variant", 1.0));
        let v3 = apply(&src, &FilterParams::default().with_extra("variant", 3.0));
        assert_ne!(v1, v3);
    }
}
