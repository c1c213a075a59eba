//! Session configuration.

use serde::{Deserialize, Serialize};

/// Environment variable that caps the undo history.
pub const HISTORY_LIMIT_ENV: &str = "TINTA_HISTORY_LIMIT";

/// Tunables for one [`EditSession`](super::EditSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of undo snapshots; `None` keeps all of them. When
    /// the cap is hit the oldest snapshot is dropped.
    pub history_limit: Option<usize>,
    /// Keep slider values when an edit panel is cancelled.
    pub remember_on_cancel: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            remember_on_cancel: true,
        }
    }
}

impl SessionConfig {
    /// Defaults with environment overrides applied.
    ///
    /// `TINTA_HISTORY_LIMIT` takes a positive integer; anything else is
    /// ignored.
    pub fn from_env() -> Self {
        Self {
            history_limit: std::env::var(HISTORY_LIMIT_ENV)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .filter(|&n: &usize| n > 0),
            ..Self::default()
        }
    }

    /// Parse a JSON config body. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
