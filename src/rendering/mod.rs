//! # Rendering Module
//!
//! Macroquad ASCII frontend. Reads the game state and draws it; nothing
//! flows back into the core.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
