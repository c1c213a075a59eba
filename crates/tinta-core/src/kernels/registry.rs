//! Kernel catalog metadata: labels, default parameters, slider bounds.
//!
//! The core owns these; a UI reads them to build its controls.

use std::sync::OnceLock;

use serde::Serialize;

use super::KernelId;
use super::params::{FilterParams, RecolorSettings, clamp_or};
use crate::tone::adjust::{BRIGHTNESS_RANGE, CONTRAST_RANGE};

/// Bounds and default for one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamRange {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(name: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self {
            name,
            default,
            min,
            max,
        }
    }

    /// Clamp into `[min, max]`; NaN and infinities become the default.
    pub fn clamp(&self, value: f32) -> f32 {
        clamp_or(value, (self.min, self.max), self.default)
    }
}

const INTENSITY: ParamRange = ParamRange::new("intensity", 100.0, 0.0, 100.0);
const CONTRAST: ParamRange = ParamRange::new("contrast", 0.0, CONTRAST_RANGE.0, CONTRAST_RANGE.1);
const BRIGHTNESS: ParamRange =
    ParamRange::new("brightness", 0.0, BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1);

/// Everything a front end needs to drive one kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KernelDescriptor {
    pub id: KernelId,
    pub label: &'static str,
    pub intensity: ParamRange,
    pub contrast: ParamRange,
    pub brightness: ParamRange,
    pub extras: Vec<ParamRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recolor: Option<RecolorSettings>,
}

impl KernelDescriptor {
    fn new(id: KernelId, extras: Vec<ParamRange>) -> Self {
        Self {
            id,
            label: id.label(),
            intensity: INTENSITY,
            contrast: CONTRAST,
            brightness: BRIGHTNESS,
            extras,
            recolor: None,
        }
    }

    /// Parameters a fresh edit panel opens with.
    pub fn default_params(&self) -> FilterParams {
        FilterParams {
            intensity: self.intensity.default,
            contrast: self.contrast.default,
            brightness: self.brightness.default,
            extras: self
                .extras
                .iter()
                .map(|r| (r.name.to_string(), r.default))
                .collect(),
            recolor: self.recolor.clone(),
        }
    }

    pub fn extra(&self, name: &str) -> Option<&ParamRange> {
        self.extras.iter().find(|r| r.name == name)
    }
}

fn regrade_extras(variant: f32) -> Vec<ParamRange> {
    vec![
        ParamRange::new("variant", variant, 1.0, 4.0),
        ParamRange::new("mid_boost", 1.05, 0.5, 1.5),
        ParamRange::new("shadow_mul", 0.93, 0.5, 1.5),
        ParamRange::new("hi_mul", 1.06, 0.5, 1.5),
    ]
}

fn build(id: KernelId) -> KernelDescriptor {
    match id {
        KernelId::OrangeTeal => KernelDescriptor::new(id, regrade_extras(1.0)),
        KernelId::OrangePink => KernelDescriptor::new(id, regrade_extras(4.0)),
        KernelId::BigSur => KernelDescriptor {
            recolor: Some(RecolorSettings::default()),
            ..KernelDescriptor::new(id, Vec::new())
        },
        KernelId::Vintage => KernelDescriptor::new(
            id,
            vec![
                ParamRange::new("red_shift", 100.0, 0.0, 255.0),
                ParamRange::new("fuse_opacity", 0.85, 0.0, 1.0),
                ParamRange::new("saturation", 1.13, 0.0, 2.0),
                ParamRange::new("brightness_mul", 1.13, 0.0, 2.0),
                ParamRange::new("contrast_mul", 1.13, 0.0, 2.0),
                ParamRange::new("balance_r", -15.0, -100.0, 100.0),
                ParamRange::new("balance_g", 15.0, -100.0, 100.0),
                ParamRange::new("balance_b", 2.0, -100.0, 100.0),
            ],
        ),
        KernelId::GoldenHills => KernelDescriptor::new(
            id,
            vec![ParamRange::new("edge_haze", 0.5, 0.0, 2.0)],
        ),
        KernelId::Sharpen => KernelDescriptor::new(
            id,
            vec![
                ParamRange::new("radius", 2.0, 0.5, 10.0),
                ParamRange::new("amount", 1.5, 0.0, 5.0),
            ],
        ),
        KernelId::Vignette => KernelDescriptor::new(
            id,
            vec![ParamRange::new("strength", 0.75, 0.0, 1.0)],
        ),
        KernelId::Blur => KernelDescriptor::new(
            id,
            vec![ParamRange::new("max_radius", 10.0, 0.0, 50.0)],
        ),
        KernelId::Sepia
        | KernelId::HighContrast
        | KernelId::Grayscale
        | KernelId::CoolTone
        | KernelId::California
        | KernelId::PfeifferBeach => KernelDescriptor::new(id, Vec::new()),
    }
}

/// The full catalog, in [`KernelId::all`] order.
pub fn registry() -> &'static [KernelDescriptor] {
    static REGISTRY: OnceLock<Vec<KernelDescriptor>> = OnceLock::new();
    REGISTRY.get_or_init(|| KernelId::all().iter().copied().map(build).collect())
}

pub fn descriptor(id: KernelId) -> &'static KernelDescriptor {
    &registry()[id.index()]
}
