//! Generation-tagged preview requests.
//!
//! A request captures everything needed to render off the session (shared
//! base snapshot, kernel, parameters) so a front end can evaluate it on a
//! worker thread. Only the result whose generation is still the latest is
//! accepted back; anything older is dropped.

use std::sync::Arc;

use crate::image::PixelBuffer;
use crate::kernels::{self, FilterParams, KernelId};

/// One pending preview evaluation.
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub(crate) generation: u64,
    pub(crate) kernel: KernelId,
    pub(crate) params: FilterParams,
    pub(crate) base: Arc<PixelBuffer>,
}

impl PreviewRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kernel(&self) -> KernelId {
        self.kernel
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Evaluate the kernel against the base snapshot.
    ///
    /// The base is shared with the session and is never written to.
    pub fn render(self) -> PreviewResult {
        let buffer = kernels::apply(self.kernel, &self.base, &self.params);
        PreviewResult {
            generation: self.generation,
            kernel: self.kernel,
            buffer: Arc::new(buffer),
        }
    }
}

/// A rendered preview waiting to be accepted by the session.
#[derive(Debug, Clone)]
pub struct PreviewResult {
    pub(crate) generation: u64,
    pub(crate) kernel: KernelId,
    pub(crate) buffer: Arc<PixelBuffer>,
}

impl PreviewResult {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kernel(&self) -> KernelId {
        self.kernel
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }
}

/// Monotonic source of preview generations. Starts at 1.
#[derive(Debug, Default)]
pub(crate) struct Generations {
    issued: u64,
}

impl Generations {
    pub(crate) fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }
}
