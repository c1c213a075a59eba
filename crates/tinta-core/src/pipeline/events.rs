//! Outcome events emitted by the edit session.
//!
//! The core never formats user-facing strings; a presentation layer maps
//! these to toasts, dialogs or log lines. Serialized with the
//! `#[serde(tag = "type", content = "data")]` layout so a front end can
//! switch on `type`.

use serde::{Deserialize, Serialize};

use crate::kernels::KernelId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EditEvent {
    /// A new image became the session's original.
    Loaded {
        width: u32,
        height: u32,
    },
    /// A previewed edit was committed.
    FilterApplied(KernelId),
    /// The most recent commit was rolled back.
    FilterUndone(KernelId),
    /// Current image reverted to the original.
    Reset,
    /// An edit operation was attempted with nothing loaded.
    NoImage,
    /// Undo requested with an empty history.
    NothingToUndo,
    /// The acquisition boundary rejected a payload as not an image.
    InvalidFileType,
    /// An edit panel was closed and its values kept for next time.
    SettingsRemembered(KernelId),
    /// Everything, including the original, was discarded.
    ProjectCleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let json = serde_json::to_value(EditEvent::FilterApplied(KernelId::Vintage)).unwrap();
        assert_eq!(json["type"], "FilterApplied");
        assert_eq!(json["data"], "vintage");

        let json = serde_json::to_value(EditEvent::Loaded {
            width: 4,
            height: 2,
        })
        .unwrap();
        assert_eq!(json["data"]["width"], 4);

        let unit = serde_json::to_value(EditEvent::NothingToUndo).unwrap();
        assert_eq!(unit["type"], "NothingToUndo");
    }

    #[test]
    fn test_event_roundtrip() {
        let event = EditEvent::SettingsRemembered(KernelId::OrangeTeal);
        let text = serde_json::to_string(&event).unwrap();
        let back: EditEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
    }
}
