//! Tinta Core: non-destructive raster color grading.
//!
//! Color-space conversions, hue/saturation LUTs, Lab-distance masking,
//! tonal operators, the filter catalog and the undoable edit session.
//! No I/O; images arrive and leave as [`PixelBuffer`]s.

pub mod color;
pub mod error;
pub mod image;
pub mod kernels;
pub mod lut;
pub mod mask;
pub mod pipeline;
pub mod tone;

// Re-exports for convenience.
pub use error::EditError;
pub use image::PixelBuffer;
pub use kernels::{FilterParams, FilterSpec, KernelDescriptor, KernelId, apply, descriptor, registry};
pub use lut::{HueSatLut, LutCache, LutConfig, LutVariant};
pub use pipeline::{EditEvent, EditSession, SessionConfig, SessionState};
