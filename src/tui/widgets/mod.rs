//! Custom TUI widgets

mod result_panel;
mod text_input;

pub use result_panel::ResultPanel;
pub use text_input::{TextInput, TextInputState};
