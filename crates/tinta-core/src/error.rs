//! Error taxonomy for the edit pipeline.

use crate::pipeline::events::EditEvent;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Zero-area or malformed pixel buffer, rejected at the boundary.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown kernel id: {0}")]
    UnknownKernelId(String),
    #[error("nothing to undo")]
    EmptyHistory,
    #[error("no image loaded")]
    NoImageLoaded,
    /// The operation is not allowed from the session's current state.
    #[error("cannot {op} while {state}")]
    InvalidTransition {
        op: &'static str,
        state: &'static str,
    },
}

impl EditError {
    /// The outcome event a presentation layer should surface, if any.
    ///
    /// Only the expected, recoverable conditions map to an event; the rest
    /// are programming or boundary errors for the caller to handle.
    pub fn notification(&self) -> Option<EditEvent> {
        match self {
            Self::EmptyHistory => Some(EditEvent::NothingToUndo),
            Self::NoImageLoaded => Some(EditEvent::NoImage),
            _ => None,
        }
    }
}
