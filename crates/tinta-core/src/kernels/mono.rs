//! Luminance-derived kernels: sepia, high-contrast overlay, grayscale.

use crate::color::luma;
use crate::image::PixelBuffer;
use crate::tone::{self, overlay};

use super::FilterParams;

/// Overlay each channel with the pixel's own luma.
pub fn high_contrast_pixel(rgb: [f32; 3]) -> [f32; 3] {
    let gray = luma(rgb);
    rgb.map(|c| overlay(c, gray))
}

pub fn grayscale_pixel(rgb: [f32; 3]) -> [f32; 3] {
    [luma(rgb); 3]
}

pub(crate) fn sepia(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    source.map_rgb(|rgb| params.finish(rgb, tone::sepia(rgb)))
}

pub(crate) fn high_contrast(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    source.map_rgb(|rgb| params.finish(rgb, high_contrast_pixel(rgb)))
}

pub(crate) fn grayscale(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    source.map_rgb(|rgb| params.finish(rgb, grayscale_pixel(rgb)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn test_grayscale_equalizes_channels() {
        let [r, g, b] = grayscale_pixel([200.0, 100.0, 50.0]);
        assert!((r - g).abs() < EPSILON && (g - b).abs() < EPSILON);
        assert!((r - 124.2).abs() < 0.1);
    }

    #[test]
    fn test_high_contrast_darkens_shadows_lifts_highlights() {
        let dark = high_contrast_pixel([40.0, 40.0, 40.0]);
        let light = high_contrast_pixel([220.0, 220.0, 220.0]);
        assert!(dark[0] < 40.0);
        assert!(light[0] > 220.0);
    }

    #[test]
    fn test_sepia_kernel_full_strength() {
        let src = PixelBuffer::from_pixels(1, 1, &[[100, 100, 100, 255]]).unwrap();
        let out = sepia(&src, &FilterParams::default());
        // 0.393 + 0.769 + 0.189 = 1.351 → 135.1
        assert_eq!(out.pixel(0, 0), [135, 120, 94, 255]);
    }
}
