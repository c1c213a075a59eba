//! Tinta I/O: the acquisition and export boundary.
//!
//! Decodes encoded images into [`PixelBuffer`]s and encodes them back out.
//! Format support comes from the `image` crate (PNG, JPEG, WebP, BMP, GIF,
//! TIFF). Everything is converted to 8-bit sRGB RGBA.

use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tinta_core::{EditError, EditEvent, PixelBuffer};

/// Errors at the I/O boundary.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The payload is not an image format we can read.
    #[error("not a supported image file")]
    InvalidFileType,
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Buffer(#[from] EditError),
}

impl IoError {
    /// The outcome event a presentation layer should surface, if any.
    pub fn notification(&self) -> Option<EditEvent> {
        match self {
            Self::InvalidFileType => Some(EditEvent::InvalidFileType),
            Self::Buffer(e) => e.notification(),
            _ => None,
        }
    }
}

/// Decode an in-memory image.
///
/// The format is sniffed from the leading bytes; anything unrecognized is
/// [`IoError::InvalidFileType`].
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, IoError> {
    let format = image::guess_format(bytes).map_err(|_| IoError::InvalidFileType)?;
    if !format.reading_enabled() {
        return Err(IoError::InvalidFileType);
    }
    let img = image::load_from_memory_with_format(bytes, format).map_err(IoError::Decode)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(?format, width, height, "decoded image");
    Ok(PixelBuffer::new(width, height, rgba.into_raw())?)
}

/// Read and decode an image file.
pub fn load_path(path: &Path) -> Result<PixelBuffer, IoError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage, IoError> {
    let rgba = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_bytes().to_vec())
        .ok_or_else(|| {
            IoError::Buffer(EditError::InvalidInput(format!(
                "{}x{} buffer does not match its byte length",
                buffer.width(),
                buffer.height()
            )))
        })?;
    Ok(DynamicImage::ImageRgba8(rgba))
}

/// Encode as PNG bytes.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, IoError> {
    let mut out = Cursor::new(Vec::new());
    to_dynamic(buffer)?
        .write_to(&mut out, ImageFormat::Png)
        .map_err(IoError::Encode)?;
    Ok(out.into_inner())
}

/// Encode as a `data:image/png;base64,...` URL.
pub fn to_data_url(buffer: &PixelBuffer) -> Result<String, IoError> {
    let png = encode_png(buffer)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
    Ok(format!("data:image/png;base64,{encoded}"))
}

/// Write to `path`, picking the format from its extension.
///
/// Formats without alpha (JPEG) get the RGB channels only.
pub fn save_path(buffer: &PixelBuffer, path: &Path) -> Result<(), IoError> {
    let format = ImageFormat::from_path(path).map_err(IoError::Encode)?;
    let img = to_dynamic(buffer)?;
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };
    img.save_with_format(path, format).map_err(IoError::Encode)?;
    tracing::info!(path = %path.display(), ?format, "image saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_invalid_file_type() {
        let err = decode(b"hello, this is not an image").unwrap_err();
        assert!(matches!(err, IoError::InvalidFileType));
        assert_eq!(err.notification(), Some(EditEvent::InvalidFileType));
    }

    #[test]
    fn test_truncated_png_is_decode_error() {
        let png = encode_png(&PixelBuffer::filled(3, 3, [1, 2, 3, 4]).unwrap()).unwrap();
        let err = decode(&png[..20]).unwrap_err();
        assert!(matches!(err, IoError::Decode(_)));
        assert_eq!(err.notification(), None);
    }

    #[test]
    fn test_data_url_prefix() {
        let url = to_data_url(&PixelBuffer::filled(1, 1, [255, 0, 0, 255]).unwrap()).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
