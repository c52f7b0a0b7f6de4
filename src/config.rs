//! # Game Configuration
//!
//! Tunable settings for generation, field of view, the message log and the
//! starting player. Everything has a default matching the classic layout, and
//! a JSON file can override any subset of fields.

use crate::generation::GenerationConfig;
use crate::{DelverError, DelverResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default map width in tiles
pub const DEFAULT_MAP_WIDTH: i32 = 80;

/// Default map height in tiles
pub const DEFAULT_MAP_HEIGHT: i32 = 43;

/// Default field-of-view radius
pub const DEFAULT_FOV_RADIUS: i32 = 10;

/// Default width of the message log, in characters
pub const DEFAULT_MESSAGE_WIDTH: usize = 58;

/// Default number of visible message lines
pub const DEFAULT_MESSAGE_HEIGHT: usize = 6;

/// Default player inventory capacity (one slot per letter)
pub const DEFAULT_INVENTORY_CAPACITY: usize = 26;

/// Field-of-view settings handed to the visibility provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FovConfig {
    /// Sight radius in tiles
    pub radius: i32,
    /// Whether the first opaque tile along a ray is itself visible
    pub light_walls: bool,
}

impl Default for FovConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_FOV_RADIUS,
            light_walls: true,
        }
    }
}

/// Message log dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageLogConfig {
    /// Wrap width in characters
    pub width: usize,
    /// Number of lines retained
    pub height: usize,
}

impl Default for MessageLogConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MESSAGE_WIDTH,
            height: DEFAULT_MESSAGE_HEIGHT,
        }
    }
}

/// Starting statistics of the player character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    pub inventory_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            hp: 30,
            defense: 2,
            power: 5,
            inventory_capacity: DEFAULT_INVENTORY_CAPACITY,
        }
    }
}

/// Complete game configuration.
///
/// # Examples
///
/// ```
/// use delver::GameConfig;
///
/// let config = GameConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.fov.radius, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub generation: GenerationConfig,
    pub fov: FovConfig,
    pub messages: MessageLogConfig,
    pub player: PlayerConfig,
}

impl GameConfig {
    /// Loads a configuration from a JSON file and validates it.
    ///
    /// Fields missing from the file keep their default values.
    pub fn load(path: &Path) -> DelverResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks that the settings can produce a playable game.
    pub fn validate(&self) -> DelverResult<()> {
        self.generation.validate()?;

        if self.messages.width == 0 || self.messages.height == 0 {
            return Err(DelverError::Configuration(format!(
                "message log must be at least 1x1, got {}x{}",
                self.messages.width, self.messages.height
            )));
        }
        if self.player.hp <= 0 {
            return Err(DelverError::Configuration(
                "player hp must be positive".to_string(),
            ));
        }
        if self.player.inventory_capacity == 0 {
            return Err(DelverError::Configuration(
                "player inventory needs at least one slot".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation.map_width, DEFAULT_MAP_WIDTH);
        assert_eq!(config.messages.height, DEFAULT_MESSAGE_HEIGHT);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "fov": { "radius": 4 } }"#).unwrap();
        assert_eq!(config.fov.radius, 4);
        assert!(config.fov.light_walls);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_zero_sized_log_is_rejected() {
        let mut config = GameConfig::default();
        config.messages.width = 0;
        assert!(matches!(
            config.validate(),
            Err(DelverError::Configuration(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delver.json");
        std::fs::write(&path, r#"{ "player": { "hp": 50 } }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.player.hp, 50);
        assert_eq!(config.player.power, 5);
    }
}
