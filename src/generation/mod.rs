//! # Generation Module
//!
//! Procedural content generation for dungeon floors, monsters and items.
//!
//! A floor is carved room by room into a solid map, the rooms are joined by
//! L-shaped tunnels, and each room is then populated from weighted monster
//! and item tables.

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::config::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};
use crate::game::Position;
use crate::{DelverError, DelverResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Map width in tiles
    pub map_width: i32,
    /// Map height in tiles
    pub map_height: i32,
    /// Number of room placement attempts per floor
    pub max_rooms: u32,
    /// Smallest room side, walls included
    pub room_min_size: i32,
    /// Largest room side, walls included
    pub room_max_size: i32,
    /// Upper bound on monsters spawned per room
    pub max_monsters_per_room: u32,
    /// Upper bound on items spawned per room
    pub max_items_per_room: u32,
}

impl GenerationConfig {
    /// Creates a configuration for testing with a small map.
    pub fn for_testing() -> Self {
        Self {
            map_width: 40,
            map_height: 30,
            max_rooms: 10,
            room_min_size: 4,
            room_max_size: 8,
            ..Self::default()
        }
    }

    /// Checks that rooms of every allowed size fit on the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::GenerationConfig;
    ///
    /// let mut config = GenerationConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.room_min_size = 12;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> DelverResult<()> {
        if self.room_min_size < 3 {
            return Err(DelverError::Configuration(format!(
                "rooms need a side of at least 3 tiles, got {}",
                self.room_min_size
            )));
        }
        if self.room_min_size > self.room_max_size {
            return Err(DelverError::Configuration(format!(
                "room size range {}..={} is empty",
                self.room_min_size, self.room_max_size
            )));
        }
        if self.room_max_size >= self.map_width || self.room_max_size >= self.map_height {
            return Err(DelverError::Configuration(format!(
                "rooms up to {} tiles do not fit a {}x{} map",
                self.room_max_size, self.map_width, self.map_height
            )));
        }
        if self.max_rooms == 0 {
            return Err(DelverError::Configuration(
                "at least one room must be attempted".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            max_rooms: 30,
            room_min_size: 6,
            room_max_size: 10,
            max_monsters_per_room: 3,
            max_items_per_room: 2,
        }
    }
}

/// A rectangular room.
///
/// The rectangle spans `top_left` to [`bottom_right`](Self::bottom_right)
/// inclusive; its outer ring stays wall and only the interior is carved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Placement order on the floor
    pub id: u32,
    pub top_left: Position,
    pub width: i32,
    pub height: i32,
}

impl Room {
    /// Creates a new room.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::{Room, Position};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert_eq!(room.floor_positions().len(), 9 * 7);
    /// ```
    pub fn new(id: u32, top_left: Position, width: i32, height: i32) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
        }
    }

    /// Gets the bottom-right corner of the room.
    pub fn bottom_right(&self) -> Position {
        Position::new(self.top_left.x + self.width, self.top_left.y + self.height)
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        let bottom_right = self.bottom_right();
        Position::new(
            (self.top_left.x + bottom_right.x) / 2,
            (self.top_left.y + bottom_right.y) / 2,
        )
    }

    /// Checks if this room's rectangle touches or overlaps another's.
    pub fn overlaps(&self, other: &Room) -> bool {
        let (a1, a2) = (self.top_left, self.bottom_right());
        let (b1, b2) = (other.top_left, other.bottom_right());
        a1.x <= b2.x && a2.x >= b1.x && a1.y <= b2.y && a2.y >= b1.y
    }

    /// Checks if a position is on the carved interior of this room.
    pub fn contains(&self, pos: Position) -> bool {
        let bottom_right = self.bottom_right();
        pos.x > self.top_left.x
            && pos.y > self.top_left.y
            && pos.x < bottom_right.x
            && pos.y < bottom_right.y
    }

    /// Gets all interior positions, row by row.
    pub fn floor_positions(&self) -> Vec<Position> {
        let bottom_right = self.bottom_right();
        let mut positions = Vec::new();
        for y in (self.top_left.y + 1)..bottom_right.y {
            for x in (self.top_left.x + 1)..bottom_right.x {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content for the floor at `depth`.
    fn generate(&self, config: &GenerationConfig, depth: u32, rng: &mut StdRng) -> DelverResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelverResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Creates a seeded random number generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generation_config_defaults() {
        let config = GenerationConfig::default();
        assert_eq!((config.map_width, config.map_height), (80, 43));
        assert_eq!(config.max_rooms, 30);
        assert_eq!((config.room_min_size, config.room_max_size), (6, 10));
        assert!(config.validate().is_ok());
        assert!(GenerationConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = GenerationConfig::default();
        config.room_max_size = 90;
        assert!(matches!(
            config.validate(),
            Err(DelverError::Configuration(_))
        ));

        let mut config = GenerationConfig::default();
        config.room_min_size = 2;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.max_rooms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(1, Position::new(5, 5), 10, 8);

        assert_eq!(room.bottom_right(), Position::new(15, 13));
        assert_eq!(room.center(), Position::new(10, 9));

        assert!(room.contains(Position::new(6, 6)));
        assert!(room.contains(Position::new(14, 12)));
        assert!(!room.contains(Position::new(5, 5)));
        assert!(!room.contains(Position::new(15, 13)));
    }

    #[test]
    fn test_room_overlap_is_inclusive() {
        let room1 = Room::new(1, Position::new(5, 5), 10, 8);
        let touching = Room::new(2, Position::new(15, 5), 6, 6);
        let apart = Room::new(3, Position::new(16, 5), 6, 6);

        assert!(room1.overlaps(&touching));
        assert!(touching.overlaps(&room1));
        assert!(!room1.overlaps(&apart));
        assert!(!apart.overlaps(&room1));
    }

    #[test]
    fn test_room_positions_are_interior() {
        let room = Room::new(1, Position::new(5, 5), 4, 4);
        let floor: HashSet<_> = room.floor_positions().into_iter().collect();

        assert_eq!(floor.len(), 9);
        assert!(floor.iter().all(|pos| room.contains(*pos)));
    }

    #[test]
    fn test_rng_is_reproducible() {
        use rand::Rng;
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        for _ in 0..5 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }
}
