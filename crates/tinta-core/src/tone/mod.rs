//! Elementary tonal operators reused by every kernel.

pub mod adjust;
pub mod blend;
pub mod spatial;

pub use adjust::{
    SmoothContrast, brightness_contrast, contrast_factor, intensity_factor, mix, scale_contrast,
    sepia,
};
pub use blend::{blend_rgb, composite, overlay, soft_light};
pub use spatial::{RadialFrame, gaussian_blur, unsharp};
