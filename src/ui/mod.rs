//! Console presentation helpers

pub mod ci;
pub mod error;
pub mod terminal;
pub mod text;
pub mod theme;
pub mod views;

pub use terminal::{detect_capabilities, TerminalCapabilities};
pub use text::ColoredText;
pub use theme::Icons;
