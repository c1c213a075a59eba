//! Image representation for the grading pipeline.

use rayon::prelude::*;

use crate::error::EditError;

/// Bytes per interleaved RGBA pixel.
pub const CHANNELS: usize = 4;

/// An 8-bit sRGB RGBA image, row-major, top to bottom.
///
/// Invariant: `data.len() == width × height × 4`. Kernels never mutate a
/// buffer they were handed; every transform returns a fresh buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap interleaved RGBA bytes, checking the channel count.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, EditError> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(EditError::InvalidInput(format!(
                "{width}x{height} RGBA buffer needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer of the given size with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, EditError> {
        let len = byte_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Transparent black.
    pub fn empty(width: u32, height: u32) -> Result<Self, EditError> {
        Self::filled(width, height, [0; 4])
    }

    /// Build a buffer from a list of pixels laid out row-major.
    pub fn from_pixels(width: u32, height: u32, pixels: &[[u8; 4]]) -> Result<Self, EditError> {
        Self::new(width, height, bytemuck::cast_slice(pixels).to_vec())
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` when the buffer covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw interleaved RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pixels as `[r, g, b, a]` quadruples.
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    /// The pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels()[y as usize * self.width as usize + x as usize]
    }

    /// Reject buffers that cannot be edited (zero area).
    pub fn ensure_editable(&self) -> Result<(), EditError> {
        if self.width == 0 || self.height == 0 {
            return Err(EditError::InvalidInput(format!(
                "zero-area image ({}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Apply a per-pixel RGB transform, rows in parallel. Alpha is kept.
    ///
    /// The closure receives channels as `f32` in `[0, 255]`; results are
    /// rounded and clamped back into bytes.
    pub fn map_rgb<F>(&self, transform: F) -> PixelBuffer
    where
        F: Fn([f32; 3]) -> [f32; 3] + Sync,
    {
        self.map_rgb_at(|_, _, rgb| transform(rgb))
    }

    /// Like [`map_rgb`](Self::map_rgb) but also passes the pixel position.
    pub fn map_rgb_at<F>(&self, transform: F) -> PixelBuffer
    where
        F: Fn(u32, u32, [f32; 3]) -> [f32; 3] + Sync,
    {
        if self.is_empty() {
            return self.clone();
        }
        let stride = self.width as usize * CHANNELS;
        let mut out = vec![0u8; self.data.len()];

        out.par_chunks_mut(stride)
            .zip(self.data.par_chunks(stride))
            .enumerate()
            .for_each(|(y, (row_out, row_in))| {
                for (x, (px_out, px_in)) in row_out
                    .chunks_exact_mut(CHANNELS)
                    .zip(row_in.chunks_exact(CHANNELS))
                    .enumerate()
                {
                    let rgb = [px_in[0] as f32, px_in[1] as f32, px_in[2] as f32];
                    let [r, g, b] = transform(x as u32, y as u32, rgb);
                    px_out[0] = to_channel(r);
                    px_out[1] = to_channel(g);
                    px_out[2] = to_channel(b);
                    px_out[3] = px_in[3];
                }
            });

        Self {
            width: self.width,
            height: self.height,
            data: out,
        }
    }

    /// Combine this buffer with another of the same size, pixel by pixel.
    ///
    /// Used by multi-pass kernels (sharpen) whose second input is a derived
    /// copy of the first.
    pub fn zip_rgb<F>(&self, other: &PixelBuffer, combine: F) -> PixelBuffer
    where
        F: Fn([f32; 3], [f32; 3]) -> [f32; 3] + Sync,
    {
        debug_assert_eq!(self.data.len(), other.data.len());
        let other_px = other.pixels();
        let width = self.width as usize;
        self.map_rgb_at(|x, y, rgb| {
            let o = other_px[y as usize * width + x as usize];
            combine(rgb, [o[0] as f32, o[1] as f32, o[2] as f32])
        })
    }

    /// Build a buffer from an `f32` RGBA plane (values in `[0, 255]`).
    pub(crate) fn from_f32_plane(width: u32, height: u32, plane: &[f32]) -> Self {
        let data = plane.iter().map(|&v| to_channel(v)).collect();
        Self {
            width,
            height,
            data,
        }
    }
}

/// `width × height × 4`, or `InvalidInput` when it does not fit in memory.
fn byte_len(width: u32, height: u32) -> Result<usize, EditError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|count| count.checked_mul(CHANNELS))
        .ok_or_else(|| {
            EditError::InvalidInput(format!("{width}x{height} RGBA buffer is too large"))
        })
}

/// Round and clamp a working value into an 8-bit channel.
#[inline]
pub fn to_channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, EditError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_area_is_not_editable() {
        let buf = PixelBuffer::new(0, 3, Vec::new()).unwrap();
        assert!(buf.is_empty());
        assert!(buf.ensure_editable().is_err());
        assert!(PixelBuffer::empty(0, 0).unwrap().is_empty());
        assert_eq!(PixelBuffer::empty(2, 1).unwrap().pixel(1, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        let err = PixelBuffer::new(1 << 31, 1 << 31, Vec::new()).unwrap_err();
        assert!(matches!(err, EditError::InvalidInput(_)));
        assert!(PixelBuffer::filled(u32::MAX, u32::MAX, [0; 4]).is_err());
    }

    #[test]
    fn test_map_rgb_preserves_alpha_and_source() {
        let src = PixelBuffer::from_pixels(2, 1, &[[10, 20, 30, 40], [50, 60, 70, 80]]).unwrap();
        let out = src.map_rgb(|[r, g, b]| [r + 1.0, g + 1.0, b + 1.0]);
        assert_eq!(out.pixels(), &[[11, 21, 31, 40], [51, 61, 71, 80]]);
        assert_eq!(src.pixel(0, 0), [10, 20, 30, 40]);
    }

    #[test]
    fn test_map_rgb_at_reports_positions() {
        let src = PixelBuffer::filled(3, 2, [0, 0, 0, 255]).unwrap();
        let out = src.map_rgb_at(|x, y, _| [x as f32, y as f32, 0.0]);
        assert_eq!(out.pixel(2, 1), [2, 1, 0, 255]);
        assert_eq!(out.pixel(1, 0), [1, 0, 0, 255]);
    }

    #[test]
    fn test_to_channel_clamps() {
        assert_eq!(to_channel(-3.0), 0);
        assert_eq!(to_channel(300.0), 255);
        assert_eq!(to_channel(127.6), 128);
        assert_eq!(to_channel(f32::NAN), 0);
    }
}
