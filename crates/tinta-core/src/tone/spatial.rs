//! Neighbourhood and position-dependent primitives: blur, unsharp mask,
//! radial falloff.

use glam::Vec2;
use rayon::prelude::*;

use crate::image::{CHANNELS, PixelBuffer};

/// Sigmas below this are treated as "no blur".
const MIN_SIGMA: f32 = 0.1;

/// Normalized 1D Gaussian taps covering ±3σ.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil() as i32;
    let two_sigma2 = 2.0 * sigma * sigma;
    let mut taps: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / two_sigma2).exp())
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

/// Separable Gaussian blur of the RGB channels with clamped edges.
///
/// `sigma` is the standard deviation in pixels. Alpha is copied through.
pub fn gaussian_blur(src: &PixelBuffer, sigma: f32) -> PixelBuffer {
    if src.is_empty() || !sigma.is_finite() || sigma < MIN_SIGMA {
        return src.clone();
    }
    let w = src.width() as usize;
    let h = src.height() as usize;
    let stride = w * CHANNELS;
    let taps = gaussian_kernel(sigma);
    let radius = (taps.len() / 2) as isize;
    let raw = src.as_bytes();

    // Horizontal pass
    let mut h_buf = vec![0.0f32; w * h * CHANNELS];
    h_buf
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &raw[y * stride..(y + 1) * stride];
            for x in 0..w {
                let mut sums = [0.0f32; 3];
                for (k, tap) in taps.iter().enumerate() {
                    let sx = (x as isize + k as isize - radius).clamp(0, w as isize - 1) as usize;
                    for c in 0..3 {
                        sums[c] += row_in[sx * CHANNELS + c] as f32 * tap;
                    }
                }
                let oi = x * CHANNELS;
                row_out[oi..oi + 3].copy_from_slice(&sums);
                row_out[oi + 3] = row_in[oi + 3] as f32;
            }
        });

    // Vertical pass
    let mut v_buf = vec![0.0f32; w * h * CHANNELS];
    v_buf
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            for x in 0..w {
                let mut sums = [0.0f32; 3];
                for (k, tap) in taps.iter().enumerate() {
                    let sy = (y as isize + k as isize - radius).clamp(0, h as isize - 1) as usize;
                    let si = sy * stride + x * CHANNELS;
                    for c in 0..3 {
                        sums[c] += h_buf[si + c] * tap;
                    }
                }
                let oi = x * CHANNELS;
                row_out[oi..oi + 3].copy_from_slice(&sums);
                row_out[oi + 3] = h_buf[y * stride + oi + 3];
            }
        });

    PixelBuffer::from_f32_plane(src.width(), src.height(), &v_buf)
}

/// Unsharp mask for one pixel: re-add the high-frequency residual.
///
/// ```text
/// out = clamp(v + (v − blurred) · amount)
/// ```
pub fn unsharp(rgb: [f32; 3], blurred: [f32; 3], amount: f32) -> [f32; 3] {
    [
        (rgb[0] + (rgb[0] - blurred[0]) * amount).clamp(0.0, 255.0),
        (rgb[1] + (rgb[1] - blurred[1]) * amount).clamp(0.0, 255.0),
        (rgb[2] + (rgb[2] - blurred[2]) * amount).clamp(0.0, 255.0),
    ]
}

/// Radial geometry for position-dependent kernels.
///
/// Distances are measured from pixel centers to the frame center and
/// normalized by the center-to-corner distance, so the result is in `[0, 1)`.
#[derive(Debug, Clone, Copy)]
pub struct RadialFrame {
    center: Vec2,
    max_dist: f32,
}

impl RadialFrame {
    pub fn new(width: u32, height: u32) -> Self {
        let center = Vec2::new(width as f32, height as f32) * 0.5;
        Self {
            center,
            max_dist: center.length().max(f32::EPSILON),
        }
    }

    pub fn normalized_distance(&self, x: u32, y: u32) -> f32 {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        p.distance(self.center) / self.max_dist
    }

    /// Multiplicative vignette: `1 − strength · dist²`.
    pub fn vignette(&self, x: u32, y: u32, strength: f32) -> f32 {
        let d = self.normalized_distance(x, y);
        (1.0 - strength * d * d).clamp(0.0, 1.0)
    }
}
