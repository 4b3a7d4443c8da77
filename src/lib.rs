//! memegen - meme editor core
//!
//! Keeps positioned, styled text annotations over a template image, turns
//! pointer and touch input into click-or-drag decisions, keeps the style
//! controls in sync with the selection, and exports the composition as a PNG
//! at the template's native resolution.

pub mod background;
pub mod clock;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod drag;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
mod handlers;
pub mod message;
pub mod model;
pub mod store;
pub mod style_editor;

#[cfg(test)]
mod tests;

pub use config::EditorConfig;
pub use editor::MemeEditor;
pub use error::{EditorError, Result};
pub use message::{Message, Notification};
