//! The non-destructive edit session.
//!
//! ```text
//!            load                 begin_edit
//!   Empty ─────────▶ Idle ─────────────────▶ Previewing
//!     ▲               ▲ │ undo/reset             │ update_preview
//!     │ new_project   │ └──────┘                 │
//!     │               └──────────────────────────┘
//!     │                 commit / cancel / close
//!     └─── from any state
//! ```
//!
//! Buffers are held as `Arc` snapshots: the preview base, the current
//! image and history entries share storage until a commit produces a new
//! buffer.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use crate::error::EditError;
use crate::image::PixelBuffer;
use crate::kernels::{self, FilterParams, FilterSpec, KernelId, descriptor};

use super::config::SessionConfig;
use super::events::EditEvent;
use super::preview::{Generations, PreviewRequest, PreviewResult};

/// Coarse lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No image loaded.
    Empty,
    /// Image loaded, no edit panel open.
    Idle,
    /// An edit panel is open for one kernel.
    Previewing,
}

impl SessionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Idle => "idle",
            Self::Previewing => "previewing",
        }
    }
}

/// Snapshot taken immediately before a commit.
#[derive(Debug, Clone)]
struct HistoryEntry {
    snapshot: Arc<PixelBuffer>,
    applied_before: Vec<FilterSpec>,
    kernel: KernelId,
}

/// The open edit panel.
#[derive(Debug)]
struct OpenEdit {
    kernel: KernelId,
    base: Arc<PixelBuffer>,
    params: FilterParams,
    preview: Option<Arc<PixelBuffer>>,
    /// Generation of the last request issued for this panel; 0 before any.
    latest: u64,
}

/// Loaded images plus the applied-filter list and its history.
#[derive(Debug)]
struct Document {
    original: Arc<PixelBuffer>,
    current: Arc<PixelBuffer>,
}

/// One document's edit state. Independent sessions share nothing.
#[derive(Debug, Default)]
pub struct EditSession {
    config: SessionConfig,
    document: Option<Document>,
    applied: Vec<FilterSpec>,
    history: VecDeque<HistoryEntry>,
    pending: BTreeMap<KernelId, FilterParams>,
    open: Option<OpenEdit>,
    generations: Generations,
}

impl EditSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        match (&self.document, &self.open) {
            (None, _) => SessionState::Empty,
            (Some(_), None) => SessionState::Idle,
            (Some(_), Some(_)) => SessionState::Previewing,
        }
    }

    fn invalid(&self, op: &'static str) -> EditError {
        EditError::InvalidTransition {
            op,
            state: self.state().as_str(),
        }
    }

    /// The loaded document, only while idle.
    fn require_idle(&self, op: &'static str) -> Result<&Document, EditError> {
        match self.state() {
            SessionState::Empty => Err(EditError::NoImageLoaded),
            SessionState::Previewing => Err(self.invalid(op)),
            SessionState::Idle => self.document.as_ref().ok_or(EditError::NoImageLoaded),
        }
    }

    fn require_open(&mut self, op: &'static str) -> Result<&mut OpenEdit, EditError> {
        match self.state() {
            SessionState::Empty => Err(EditError::NoImageLoaded),
            SessionState::Idle => Err(self.invalid(op)),
            SessionState::Previewing => self.open.as_mut().ok_or(EditError::NoImageLoaded),
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Make `buffer` both original and current, dropping prior edits.
    ///
    /// Remembered panel settings survive a reload.
    pub fn load(&mut self, buffer: PixelBuffer) -> Result<EditEvent, EditError> {
        if self.state() == SessionState::Previewing {
            return Err(self.invalid("load"));
        }
        buffer.ensure_editable()?;
        let (width, height) = (buffer.width(), buffer.height());
        let shared = Arc::new(buffer);
        self.document = Some(Document {
            original: Arc::clone(&shared),
            current: shared,
        });
        self.applied.clear();
        self.history.clear();
        tracing::info!(width, height, "image loaded");
        Ok(EditEvent::Loaded { width, height })
    }

    /// Discard everything, including the original and remembered settings.
    pub fn new_project(&mut self) -> EditEvent {
        self.document = None;
        self.open = None;
        self.applied.clear();
        self.history.clear();
        self.pending.clear();
        tracing::info!("project cleared");
        EditEvent::ProjectCleared
    }

    // ── Editing ─────────────────────────────────────────────────

    /// Open an edit panel for the kernel named `kernel`.
    ///
    /// Returns the parameters the panel should show: the remembered
    /// settings if the kernel was cancelled earlier, else its defaults.
    pub fn begin_edit(&mut self, kernel: &str) -> Result<FilterParams, EditError> {
        let document = self.require_idle("begin edit")?;
        let kernel: KernelId = kernel.parse()?;
        let base = Arc::clone(&document.current);
        let params = self
            .pending
            .get(&kernel)
            .cloned()
            .unwrap_or_else(|| descriptor(kernel).default_params());
        tracing::debug!(%kernel, "edit panel opened");
        self.open = Some(OpenEdit {
            kernel,
            base,
            params: params.clone(),
            preview: None,
            latest: 0,
        });
        Ok(params)
    }

    /// Issue a preview request for `params`, superseding earlier ones.
    pub fn request_preview(&mut self, params: FilterParams) -> Result<PreviewRequest, EditError> {
        self.require_open("preview")?;
        let generation = self.generations.next();
        let open = self.require_open("preview")?;
        open.latest = generation;
        open.params = params.clone();
        tracing::debug!(generation, kernel = %open.kernel, "preview requested");
        Ok(PreviewRequest {
            generation,
            kernel: open.kernel,
            params,
            base: Arc::clone(&open.base),
        })
    }

    /// Install a rendered preview if it is still the latest request.
    ///
    /// Returns `false` when the result was superseded (or the panel it
    /// belonged to has since closed) and was discarded.
    pub fn accept_preview(&mut self, result: PreviewResult) -> bool {
        match self.open.as_mut() {
            Some(open) if open.latest == result.generation && open.kernel == result.kernel => {
                open.preview = Some(result.buffer);
                true
            }
            _ => {
                tracing::debug!(generation = result.generation, "stale preview discarded");
                false
            }
        }
    }

    /// Synchronous preview: request, render and accept in one step.
    pub fn update_preview(&mut self, params: FilterParams) -> Result<&PixelBuffer, EditError> {
        let request = self.request_preview(params)?;
        self.accept_preview(request.render());
        self.preview().ok_or(EditError::NoImageLoaded)
    }

    /// Make the edit permanent.
    ///
    /// The result is recomputed from the preview base at full resolution,
    /// the pre-commit image is pushed to history, and the kernel's entry in
    /// the applied list is replaced in place or appended.
    pub fn commit(&mut self, params: FilterParams) -> Result<EditEvent, EditError> {
        self.require_open("commit")?;
        let Some(open) = self.open.take() else {
            return Err(EditError::NoImageLoaded);
        };
        let Some(document) = self.document.as_mut() else {
            return Err(EditError::NoImageLoaded);
        };

        let kernel = open.kernel;
        let params = params.clamped(descriptor(kernel));
        let result = kernels::apply(kernel, &open.base, &params);

        self.history.push_back(HistoryEntry {
            snapshot: Arc::clone(&document.current),
            applied_before: self.applied.clone(),
            kernel,
        });
        if let Some(limit) = self.config.history_limit {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }

        let spec = FilterSpec::new(kernel, params);
        match self.applied.iter_mut().find(|s| s.kernel == kernel) {
            Some(existing) => *existing = spec,
            None => self.applied.push(spec),
        }
        document.current = Arc::new(result);
        self.pending.remove(&kernel);

        tracing::info!(%kernel, history = self.history.len(), "filter applied");
        Ok(EditEvent::FilterApplied(kernel))
    }

    /// Close the panel, keeping `params` for the next time it opens.
    ///
    /// Returns `None` when the session is configured not to remember.
    pub fn cancel_remembering_settings(
        &mut self,
        params: FilterParams,
    ) -> Result<Option<EditEvent>, EditError> {
        let kernel = self.require_open("cancel")?.kernel;
        self.open = None;
        if !self.config.remember_on_cancel {
            tracing::debug!(%kernel, "edit cancelled");
            return Ok(None);
        }
        self.pending.insert(kernel, params);
        tracing::debug!(%kernel, "edit cancelled, settings remembered");
        Ok(Some(EditEvent::SettingsRemembered(kernel)))
    }

    /// Close the panel and forget any remembered settings for its kernel.
    pub fn close_without_remembering(&mut self) -> Result<(), EditError> {
        let kernel = self.require_open("close")?.kernel;
        self.open = None;
        self.pending.remove(&kernel);
        tracing::debug!(%kernel, "edit closed");
        Ok(())
    }

    // ── History ─────────────────────────────────────────────────

    /// Roll back the most recent commit.
    pub fn undo(&mut self) -> Result<EditEvent, EditError> {
        self.require_idle("undo")?;
        let Some(entry) = self.history.pop_back() else {
            tracing::warn!("undo with empty history");
            return Err(EditError::EmptyHistory);
        };
        let Some(document) = self.document.as_mut() else {
            return Err(EditError::NoImageLoaded);
        };
        document.current = entry.snapshot;
        self.applied = entry.applied_before;
        tracing::info!(kernel = %entry.kernel, history = self.history.len(), "filter undone");
        Ok(EditEvent::FilterUndone(entry.kernel))
    }

    /// Revert to the original image and forget all applied filters.
    pub fn reset(&mut self) -> Result<EditEvent, EditError> {
        self.require_idle("reset")?;
        let Some(document) = self.document.as_mut() else {
            return Err(EditError::NoImageLoaded);
        };
        document.current = Arc::clone(&document.original);
        self.applied.clear();
        self.history.clear();
        tracing::info!("reset to original");
        Ok(EditEvent::Reset)
    }

    // ── Accessors ───────────────────────────────────────────────

    /// The current image, for handing to an export collaborator.
    pub fn export(&self) -> Result<Arc<PixelBuffer>, EditError> {
        self.document
            .as_ref()
            .map(|d| Arc::clone(&d.current))
            .ok_or(EditError::NoImageLoaded)
    }

    pub fn current(&self) -> Option<&PixelBuffer> {
        self.document.as_ref().map(|d| &*d.current)
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.document.as_ref().map(|d| &*d.original)
    }

    /// Latest accepted preview of the open panel.
    pub fn preview(&self) -> Option<&PixelBuffer> {
        self.open.as_ref()?.preview.as_deref()
    }

    /// Kernel of the open panel.
    pub fn editing(&self) -> Option<KernelId> {
        self.open.as_ref().map(|o| o.kernel)
    }

    /// Parameters of the open panel's latest request.
    pub fn editing_params(&self) -> Option<&FilterParams> {
        self.open.as_ref().map(|o| &o.params)
    }

    pub fn applied_filters(&self) -> &[FilterSpec] {
        &self.applied
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn pending_settings(&self, kernel: KernelId) -> Option<&FilterParams> {
        self.pending.get(&kernel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> PixelBuffer {
        PixelBuffer::from_pixels(
            2,
            2,
            &[
                [200, 100, 50, 255],
                [10, 200, 200, 255],
                [90, 90, 90, 128],
                [255, 240, 10, 255],
            ],
        )
        .unwrap()
    }

    fn loaded() -> EditSession {
        let mut s = EditSession::default();
        s.load(image()).unwrap();
        s
    }

    #[test]
    fn test_state_transitions() {
        let mut s = EditSession::default();
        assert_eq!(s.state(), SessionState::Empty);
        s.load(image()).unwrap();
        assert_eq!(s.state(), SessionState::Idle);
        s.begin_edit("sepia").unwrap();
        assert_eq!(s.state(), SessionState::Previewing);
        s.commit(FilterParams::default()).unwrap();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.new_project(), EditEvent::ProjectCleared);
        assert_eq!(s.state(), SessionState::Empty);
    }

    #[test]
    fn test_operations_before_load() {
        let mut s = EditSession::default();
        assert_eq!(s.begin_edit("sepia"), Err(EditError::NoImageLoaded));
        assert_eq!(s.undo(), Err(EditError::NoImageLoaded));
        assert_eq!(s.reset(), Err(EditError::NoImageLoaded));
        assert!(s.export().is_err());
        assert_eq!(
            s.undo().unwrap_err().notification(),
            Some(EditEvent::NoImage)
        );
    }

    #[test]
    fn test_load_rejects_zero_area() {
        let mut s = EditSession::default();
        let empty = PixelBuffer::new(0, 4, Vec::new()).unwrap();
        assert!(matches!(s.load(empty), Err(EditError::InvalidInput(_))));
        assert_eq!(s.state(), SessionState::Empty);
    }

    #[test]
    fn test_unknown_kernel_stays_idle() {
        let mut s = loaded();
        assert_eq!(
            s.begin_edit("posterize"),
            Err(EditError::UnknownKernelId("posterize".into()))
        );
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut s = loaded();
        assert!(matches!(
            s.commit(FilterParams::default()),
            Err(EditError::InvalidTransition { op: "commit", .. })
        ));
        s.begin_edit("blur").unwrap();
        assert!(matches!(
            s.begin_edit("sepia"),
            Err(EditError::InvalidTransition { state: "previewing", .. })
        ));
        assert!(matches!(s.undo(), Err(EditError::InvalidTransition { .. })));
        assert!(matches!(s.load(image()), Err(EditError::InvalidTransition { .. })));
    }

    #[test]
    fn test_preview_does_not_touch_current() {
        let mut s = loaded();
        s.begin_edit("grayscale").unwrap();
        let preview = s.update_preview(FilterParams::default()).unwrap().clone();
        assert_ne!(&preview, s.current().unwrap());
        assert_eq!(s.current(), s.original());
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn test_stale_preview_is_discarded() {
        let mut s = loaded();
        s.begin_edit("vignette").unwrap();
        let first = s.request_preview(FilterParams::default().with_intensity(20.0)).unwrap();
        let second = s.request_preview(FilterParams::default().with_intensity(90.0)).unwrap();
        assert!(second.generation() > first.generation());

        let late = first.render();
        let fresh = second.render();
        assert!(s.accept_preview(fresh.clone()));
        assert!(!s.accept_preview(late));
        assert_eq!(s.preview(), Some(fresh.buffer()));
    }

    #[test]
    fn test_preview_from_closed_panel_is_discarded() {
        let mut s = loaded();
        s.begin_edit("sepia").unwrap();
        let request = s.request_preview(FilterParams::default()).unwrap();
        s.close_without_remembering().unwrap();
        s.begin_edit("sepia").unwrap();
        assert!(!s.accept_preview(request.render()));
        assert!(s.preview().is_none());
    }

    #[test]
    fn test_commit_replaces_existing_entry() {
        let mut s = loaded();
        s.begin_edit("sepia").unwrap();
        s.commit(FilterParams::default().with_intensity(40.0)).unwrap();
        s.begin_edit("blur").unwrap();
        s.commit(FilterParams::default()).unwrap();
        s.begin_edit("sepia").unwrap();
        s.commit(FilterParams::default().with_intensity(80.0)).unwrap();

        let kernels: Vec<_> = s.applied_filters().iter().map(|f| f.kernel).collect();
        assert_eq!(kernels, vec![KernelId::Sepia, KernelId::Blur]);
        assert_eq!(s.applied_filters()[0].params.intensity, 80.0);
        assert_eq!(s.history_len(), 3);

        // Undo brings back the earlier sepia entry.
        s.undo().unwrap();
        assert_eq!(s.applied_filters()[0].params.intensity, 40.0);
    }

    #[test]
    fn test_cancel_remembers_and_restores() {
        let mut s = loaded();
        s.begin_edit("vintage").unwrap();
        let tweaked = FilterParams::default().with_intensity(35.0);
        let event = s.cancel_remembering_settings(tweaked.clone()).unwrap();
        assert_eq!(event, Some(EditEvent::SettingsRemembered(KernelId::Vintage)));
        assert_eq!(s.current(), s.original());
        assert_eq!(s.pending_settings(KernelId::Vintage), Some(&tweaked));

        let reopened = s.begin_edit("vintage").unwrap();
        assert_eq!(reopened, tweaked);

        s.close_without_remembering().unwrap();
        assert!(s.pending_settings(KernelId::Vintage).is_none());
        let fresh = s.begin_edit("vintage").unwrap();
        assert_eq!(fresh, descriptor(KernelId::Vintage).default_params());
    }

    #[test]
    fn test_cancel_without_remember_config() {
        let mut s = EditSession::new(SessionConfig {
            remember_on_cancel: false,
            ..SessionConfig::default()
        });
        s.load(image()).unwrap();
        s.begin_edit("blur").unwrap();
        assert_eq!(s.cancel_remembering_settings(FilterParams::default()), Ok(None));
        assert!(s.pending_settings(KernelId::Blur).is_none());
    }

    #[test]
    fn test_history_limit_drops_oldest() {
        let mut s = EditSession::new(SessionConfig {
            history_limit: Some(2),
            ..SessionConfig::default()
        });
        s.load(image()).unwrap();
        for id in ["sepia", "blur", "vignette"] {
            s.begin_edit(id).unwrap();
            s.commit(FilterParams::default()).unwrap();
        }
        assert_eq!(s.history_len(), 2);
        s.undo().unwrap();
        s.undo().unwrap();
        assert_eq!(s.undo(), Err(EditError::EmptyHistory));
        // The sepia commit could not be undone.
        assert_ne!(s.current(), s.original());
    }

    #[test]
    fn test_nothing_to_undo() {
        let mut s = loaded();
        let err = s.undo().unwrap_err();
        assert_eq!(err.notification(), Some(EditEvent::NothingToUndo));
        assert_eq!(s.current(), s.original());
    }

    #[test]
    fn test_reload_clears_history_keeps_pending() {
        let mut s = loaded();
        s.begin_edit("sepia").unwrap();
        s.commit(FilterParams::default()).unwrap();
        s.begin_edit("blur").unwrap();
        s.cancel_remembering_settings(FilterParams::default().with_intensity(5.0))
            .unwrap();
        s.load(image()).unwrap();
        assert_eq!(s.history_len(), 0);
        assert!(s.applied_filters().is_empty());
        assert!(s.pending_settings(KernelId::Blur).is_some());
    }
}
