//! The filter catalog.
//!
//! Every kernel is a pure function `(source, params) → new buffer`. The
//! shared contract:
//!
//! ```text
//! graded  = kernel(source)                    full-strength transform
//! blended = lerp(source, graded, intensity/100)
//! out     = brightness_contrast(blended)      final normalization
//! ```
//!
//! Spatial kernels (sharpen, vignette, blur) scale their strength by
//! intensity rather than blending, which gives the same endpoints. Out of
//! range parameters are clamped against the registry before evaluation.

pub mod looks;
pub mod mono;
pub mod params;
pub mod recolor;
pub mod regrade;
pub mod registry;
pub mod spatial;
pub mod vintage;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::image::PixelBuffer;

pub use params::{ColorTarget, FilterParams, FilterSpec, HexColor, OverlayStyle, RecolorSettings};
pub use registry::{KernelDescriptor, ParamRange, descriptor, registry};

/// Stable identifier of a catalog kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KernelId {
    /// Warm/cool hue regrade, anchor set chosen by `variant`.
    OrangeTeal,
    /// The same regrade opening on the four-anchor pink variant.
    OrangePink,
    /// Keep target colors, push the rest toward a background tone.
    BigSur,
    Vintage,
    Sepia,
    /// Luminance overlay for punchier mid-tones.
    HighContrast,
    Grayscale,
    CoolTone,
    California,
    GoldenHills,
    PfeifferBeach,
    Sharpen,
    Vignette,
    Blur,
}

impl KernelId {
    pub fn all() -> &'static [Self] {
        const ALL: [KernelId; 14] = [
            KernelId::OrangeTeal,
            KernelId::OrangePink,
            KernelId::BigSur,
            KernelId::Vintage,
            KernelId::Sepia,
            KernelId::HighContrast,
            KernelId::Grayscale,
            KernelId::CoolTone,
            KernelId::California,
            KernelId::GoldenHills,
            KernelId::PfeifferBeach,
            KernelId::Sharpen,
            KernelId::Vignette,
            KernelId::Blur,
        ];
        &ALL
    }

    /// Position in [`all`](Self::all).
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrangeTeal => "orange-teal",
            Self::OrangePink => "orange-pink",
            Self::BigSur => "big-sur",
            Self::Vintage => "vintage",
            Self::Sepia => "sepia",
            Self::HighContrast => "high-contrast",
            Self::Grayscale => "grayscale",
            Self::CoolTone => "cool-tone",
            Self::California => "california",
            Self::GoldenHills => "golden-hills",
            Self::PfeifferBeach => "pfeiffer-beach",
            Self::Sharpen => "sharpen",
            Self::Vignette => "vignette",
            Self::Blur => "blur",
        }
    }

    /// Human-readable label for menus.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OrangeTeal => "Orange & Teal",
            Self::OrangePink => "Orange & Pink",
            Self::BigSur => "Big Sur",
            Self::Vintage => "Vintage",
            Self::Sepia => "Sepia",
            Self::HighContrast => "High Contrast",
            Self::Grayscale => "Grayscale",
            Self::CoolTone => "Cool Tone",
            Self::California => "California",
            Self::GoldenHills => "Golden Hills",
            Self::PfeifferBeach => "Pfeiffer Beach",
            Self::Sharpen => "Sharpen",
            Self::Vignette => "Vignette",
            Self::Blur => "Blur",
        }
    }
}

impl fmt::Display for KernelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelId {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| EditError::UnknownKernelId(s.to_string()))
    }
}

/// Evaluate `kernel` on `source`.
///
/// Parameters are clamped against the kernel's descriptor first. An empty
/// buffer comes back unchanged.
pub fn apply(kernel: KernelId, source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    if source.is_empty() {
        return source.clone();
    }
    let params = params.clamped(descriptor(kernel));
    match kernel {
        KernelId::OrangeTeal | KernelId::OrangePink => regrade::apply(source, &params),
        KernelId::BigSur => recolor::apply(source, &params),
        KernelId::Vintage => vintage::apply(source, &params),
        KernelId::Sepia => mono::sepia(source, &params),
        KernelId::HighContrast => mono::high_contrast(source, &params),
        KernelId::Grayscale => mono::grayscale(source, &params),
        KernelId::CoolTone => looks::cool_tone(source, &params),
        KernelId::California => looks::california(source, &params),
        KernelId::GoldenHills => looks::golden_hills(source, &params),
        KernelId::PfeifferBeach => looks::pfeiffer_beach(source, &params),
        KernelId::Sharpen => spatial::sharpen(source, &params),
        KernelId::Vignette => spatial::vignette(source, &params),
        KernelId::Blur => spatial::blur(source, &params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_id_string_roundtrip() {
        for id in KernelId::all() {
            assert_eq!(id.as_str().parse::<KernelId>().unwrap(), *id);
            let json = serde_json::to_string(id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_unknown_kernel_id() {
        let err = "posterize".parse::<KernelId>().unwrap_err();
        assert_eq!(err, EditError::UnknownKernelId("posterize".into()));
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, id) in KernelId::all().iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let empty = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        for id in KernelId::all() {
            let out = apply(*id, &empty, &FilterParams::default());
            assert!(out.is_empty());
        }
    }
}
