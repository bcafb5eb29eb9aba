//! Application core module
//!
//! Handles application lifecycle, state management, and coordination
//! between the TUI, the backend client, and in-flight scan runs.

mod config;
mod events;
mod state;

pub use config::{BackendConfig, Config, GeneralConfig, TuiConfig};
pub use events::{AppEvent, EventHandler, EventSender};
pub use state::{App, AppMode, AppState};
