//! Target-color recolor: keep pixels near the targets, false-color the rest.

use crate::image::PixelBuffer;
use crate::mask::{self, BackgroundTone, LabTarget};
use crate::tone::{self, soft_light};

use super::{FilterParams, OverlayStyle, RecolorSettings};

/// Vertical two-stop gradient evaluated per row.
struct Gradient {
    top: [f32; 3],
    bottom: [f32; 3],
    opacity: f32,
    height: f32,
}

impl Gradient {
    fn new(style: &OverlayStyle, height: u32) -> Self {
        Self {
            top: style.top.to_f32(),
            bottom: style.bottom.to_f32(),
            opacity: style.opacity,
            height: height.max(1) as f32,
        }
    }

    fn at(&self, y: u32) -> [f32; 3] {
        let t = (y as f32 + 0.5) / self.height;
        tone::mix(self.top, self.bottom, t)
    }

    fn composite(&self, rgb: [f32; 3], y: u32) -> [f32; 3] {
        tone::composite(rgb, self.at(y), soft_light, self.opacity)
    }
}

pub(crate) fn apply(source: &PixelBuffer, params: &FilterParams) -> PixelBuffer {
    let settings = params.recolor.clone().unwrap_or_default();
    let RecolorSettings {
        targets,
        background,
        overlay,
    } = &settings;

    let lab_targets: Vec<LabTarget> = targets
        .iter()
        .map(|t| LabTarget::from_rgb(t.color.rgb(), t.sigma))
        .collect();
    let background = BackgroundTone::new(background.rgb());
    let gradient = overlay.as_ref().map(|o| Gradient::new(o, source.height()));
    tracing::debug!(targets = lab_targets.len(), overlay = gradient.is_some(), "recolor");

    source.map_rgb_at(|_, y, rgb| {
        let mut graded = mask::select(rgb, &lab_targets, &background);
        if let Some(g) = &gradient {
            graded = g.composite(graded, y);
        }
        params.finish(rgb, graded)
    })
}
