//! Edit pipeline: session state machine, preview generations, outcome
//! events and session configuration.

pub mod config;
pub mod events;
pub mod preview;
pub mod session;

pub use config::SessionConfig;
pub use events::EditEvent;
pub use preview::{PreviewRequest, PreviewResult};
pub use session::{EditSession, SessionState};
