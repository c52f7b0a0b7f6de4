//! Display colours carried by entities and messages.
//!
//! The core never interprets these; they only travel to the renderer.

use serde::{Deserialize, Serialize};

/// An opaque 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const DARK_RED: Rgb = Rgb::new(191, 0, 0);
    pub const ORANGE: Rgb = Rgb::new(255, 127, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const LIGHT_GREEN: Rgb = Rgb::new(63, 255, 63);
    pub const DESATURATED_GREEN: Rgb = Rgb::new(63, 127, 63);
    pub const DARKER_GREEN: Rgb = Rgb::new(0, 127, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const LIGHT_CYAN: Rgb = Rgb::new(114, 255, 255);
    pub const VIOLET: Rgb = Rgb::new(127, 0, 255);
    pub const LIGHT_VIOLET: Rgb = Rgb::new(159, 63, 255);
    pub const LIGHT_PINK: Rgb = Rgb::new(255, 114, 184);

    // Map palette
    pub const DARK_WALL: Rgb = Rgb::new(0, 0, 100);
    pub const DARK_GROUND: Rgb = Rgb::new(50, 50, 150);
    pub const LIGHT_WALL: Rgb = Rgb::new(130, 110, 50);
    pub const LIGHT_GROUND: Rgb = Rgb::new(200, 180, 50);
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}
