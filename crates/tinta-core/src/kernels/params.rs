//! Parameter records for kernel evaluation.
//!
//! `FilterParams` is what a UI slider panel edits; `FilterSpec` pairs it with
//! the kernel it was applied with and is what the session records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::KernelId;
use super::registry::KernelDescriptor;
use crate::color;
use crate::error::EditError;
use crate::tone;

/// An sRGB color that serializes as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub fn rgb(self) -> [u8; 3] {
        self.0
    }

    pub fn to_f32(self) -> [f32; 3] {
        self.0.map(f32::from)
    }
}

impl TryFrom<String> for HexColor {
    type Error = EditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for HexColor {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        color::parse_hex(s)
            .map(Self)
            .ok_or_else(|| EditError::InvalidInput(format!("not a #rrggbb color: {s:?}")))
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        color::to_hex(value.0)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&color::to_hex(self.0))
    }
}

/// One color the recolor mask keeps, with its Lab falloff width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTarget {
    pub color: HexColor,
    pub sigma: f32,
}

/// Procedural gradient laid over the recolor result.
///
/// Top-to-bottom two-stop gradient, composited with soft light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub top: HexColor,
    pub bottom: HexColor,
    pub opacity: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            top: HexColor([0xf2, 0xc1, 0x8d]),
            bottom: HexColor([0x3e, 0x5c, 0x8a]),
            opacity: 0.26,
        }
    }
}

/// Settings for the target-color recolor kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecolorSettings {
    pub targets: Vec<ColorTarget>,
    pub background: HexColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayStyle>,
}

/// Accepted range for a target's Lab sigma.
pub const SIGMA_RANGE: (f32, f32) = (1.0, 100.0);

impl Default for RecolorSettings {
    fn default() -> Self {
        Self {
            targets: vec![ColorTarget {
                color: HexColor([0xa7, 0x5d, 0x5a]),
                sigma: 25.0,
            }],
            background: HexColor([0x8a, 0x8a, 0x8a]),
            overlay: None,
        }
    }
}

/// Slider values for one kernel evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Effect strength, `0..=100`.
    pub intensity: f32,
    /// Final-pass contrast, `-100..=100`.
    pub contrast: f32,
    /// Final-pass brightness, `-100..=100`.
    pub brightness: f32,
    /// Kernel-specific named values (e.g. `variant`, `strength`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recolor: Option<RecolorSettings>,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            intensity: 100.0,
            contrast: 0.0,
            brightness: 0.0,
            extras: BTreeMap::new(),
            recolor: None,
        }
    }
}

impl FilterParams {
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_tone(mut self, contrast: f32, brightness: f32) -> Self {
        self.contrast = contrast;
        self.brightness = brightness;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: f32) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    pub fn with_recolor(mut self, recolor: RecolorSettings) -> Self {
        self.recolor = Some(recolor);
        self
    }

    /// Named extra, or `fallback` when absent.
    pub fn extra(&self, key: &str, fallback: f32) -> f32 {
        self.extras.get(key).copied().unwrap_or(fallback)
    }

    /// Intensity as a `[0, 1]` blend factor.
    pub fn blend_factor(&self) -> f32 {
        tone::intensity_factor(self.intensity)
    }

    /// Intensity blend followed by the brightness/contrast pass.
    pub fn finish(&self, source: [f32; 3], graded: [f32; 3]) -> [f32; 3] {
        let blended = tone::mix(source, graded, self.blend_factor());
        tone::brightness_contrast(blended, self.brightness, self.contrast)
    }

    /// Brightness/contrast pass alone, for kernels that scale by intensity
    /// instead of blending.
    pub fn tone_only(&self, rgb: [f32; 3]) -> [f32; 3] {
        tone::brightness_contrast(rgb, self.brightness, self.contrast)
    }

    /// Clamp every field into the descriptor's bounds.
    ///
    /// Non-finite values fall back to the default, missing extras are filled
    /// in, unknown extras are dropped. Never fails.
    pub fn clamped(&self, descriptor: &KernelDescriptor) -> Self {
        let extras = descriptor
            .extras
            .iter()
            .map(|range| {
                let value = self.extras.get(range.name).copied().unwrap_or(range.default);
                (range.name.to_string(), range.clamp(value))
            })
            .collect();

        let recolor = descriptor.recolor.as_ref().map(|defaults| {
            let mut settings = self.recolor.clone().unwrap_or_else(|| defaults.clone());
            for target in &mut settings.targets {
                target.sigma = clamp_or(target.sigma, SIGMA_RANGE, defaults_sigma(defaults));
            }
            if let Some(overlay) = settings.overlay.as_mut() {
                overlay.opacity = clamp_or(overlay.opacity, (0.0, 1.0), 0.0);
            }
            settings
        });

        Self {
            intensity: descriptor.intensity.clamp(self.intensity),
            contrast: descriptor.contrast.clamp(self.contrast),
            brightness: descriptor.brightness.clamp(self.brightness),
            extras,
            recolor,
        }
    }
}

fn defaults_sigma(defaults: &RecolorSettings) -> f32 {
    defaults.targets.first().map_or(25.0, |t| t.sigma)
}

pub(crate) fn clamp_or(value: f32, (lo, hi): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

/// An immutable record of one applied filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kernel: KernelId,
    pub params: FilterParams,
}

impl FilterSpec {
    pub fn new(kernel: KernelId, params: FilterParams) -> Self {
        Self { kernel, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::registry::descriptor;

    #[test]
    fn test_hex_color_serde() {
        let c: HexColor = serde_json::from_str("\"#a75d5a\"").unwrap();
        assert_eq!(c.rgb(), [0xa7, 0x5d, 0x5a]);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#a75d5a\"");
        assert!(serde_json::from_str::<HexColor>("\"teal\"").is_err());
    }

    #[test]
    fn test_clamped_limits_core_sliders() {
        let p = FilterParams::default()
            .with_intensity(250.0)
            .with_tone(-400.0, f32::NAN);
        let c = p.clamped(descriptor(KernelId::Sepia));
        assert_eq!(c.intensity, 100.0);
        assert_eq!(c.contrast, -100.0);
        assert_eq!(c.brightness, 0.0);
    }

    #[test]
    fn test_clamped_fills_and_prunes_extras() {
        let p = FilterParams::default()
            .with_extra("strength", 9.0)
            .with_extra("bogus", 1.0);
        let c = p.clamped(descriptor(KernelId::Vignette));
        assert_eq!(c.extras.get("strength"), Some(&1.0));
        assert!(!c.extras.contains_key("bogus"));

        let v = FilterParams::default().clamped(descriptor(KernelId::Vintage));
        assert_eq!(v.extra("red_shift", 0.0), 100.0);
        assert_eq!(v.extra("balance_r", 0.0), -15.0);
    }

    #[test]
    fn test_clamped_recolor_defaults() {
        let c = FilterParams::default().clamped(descriptor(KernelId::BigSur));
        let recolor = c.recolor.unwrap();
        assert_eq!(recolor.targets.len(), 1);
        assert_eq!(recolor.background, HexColor([0x8a, 0x8a, 0x8a]));

        let plain = FilterParams::default().clamped(descriptor(KernelId::Blur));
        assert!(plain.recolor.is_none());
    }

    #[test]
    fn test_params_json_shape() {
        let p = FilterParams::default().with_extra("variant", 2.0);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["intensity"], 100.0);
        assert_eq!(json["extras"]["variant"], 2.0);
        assert!(json.get("recolor").is_none());
    }
}
