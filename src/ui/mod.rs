//! UI components for the kiosk.

pub mod callbacks;
pub mod window;

pub use window::{AppUi, UiError};
