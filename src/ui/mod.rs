//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Frame layout, tab bar and shared feed placeholders
//! - `helpers` - Task spawning and link opening
//! - `story` - Full-screen story card ("Home")
//! - `list` - Compact filterable list ("News Feed")
//! - `picker` - Category/tag picker overlay
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod events;
mod help;
mod helpers;
mod input;
mod list;
mod loop_runner;
mod picker;
mod render;
mod status;
mod story;

// Re-export the public API
pub use loop_runner::{run, Action};
