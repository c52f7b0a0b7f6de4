//! # World Representation
//!
//! The tile grid of a single dungeon floor. Tiles are carved by the generator
//! and afterwards only their `explored` flag changes.

use crate::game::Position;
use crate::{DelverError, DelverResult};
use serde::{Deserialize, Serialize};

/// One map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Impassable to movement
    pub blocked: bool,
    /// Opaque to field of view
    pub block_sight: bool,
    /// Has been seen at least once
    pub explored: bool,
}

impl Tile {
    /// Solid rock.
    pub fn wall() -> Self {
        Self {
            blocked: true,
            block_sight: true,
            explored: false,
        }
    }

    /// Open floor.
    pub fn floor() -> Self {
        Self {
            blocked: false,
            block_sight: false,
            explored: false,
        }
    }
}

/// A dungeon floor: a `width` x `height` grid of tiles plus its depth.
///
/// # Examples
///
/// ```
/// use delver::{GameMap, Position};
///
/// let mut map = GameMap::new(10, 10, 1).unwrap();
/// assert!(map.is_blocked(Position::new(3, 3)));
/// map.carve(Position::new(3, 3));
/// assert!(!map.is_blocked(Position::new(3, 3)));
/// assert!(map.is_blocked(Position::new(-1, 3)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    pub width: i32,
    pub height: i32,
    /// Current dungeon depth, starting at 1
    pub depth: u32,
    /// Indexed `[y][x]`
    tiles: Vec<Vec<Tile>>,
}

impl GameMap {
    /// Creates a map filled with walls.
    pub fn new(width: i32, height: i32, depth: u32) -> DelverResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(DelverError::Configuration(format!(
                "map must be at least 1x1, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            depth,
            tiles: vec![vec![Tile::wall(); width as usize]; height as usize],
        })
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    pub fn get_tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Terrain blocks movement. Positions off the map always do.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.get_tile(pos).map_or(true, |tile| tile.blocked)
    }

    /// Terrain blocks sight. Positions off the map always do.
    pub fn is_opaque(&self, pos: Position) -> bool {
        self.get_tile(pos).map_or(true, |tile| tile.block_sight)
    }

    pub fn is_explored(&self, pos: Position) -> bool {
        self.get_tile(pos).is_some_and(|tile| tile.explored)
    }

    /// Opens a cell for movement and sight. Ignores positions off the map.
    pub fn carve(&mut self, pos: Position) {
        if let Some(tile) = self.get_tile_mut(pos) {
            *tile = Tile {
                explored: tile.explored,
                ..Tile::floor()
            };
        }
    }

    pub fn mark_explored(&mut self, pos: Position) {
        if let Some(tile) = self.get_tile_mut(pos) {
            tile.explored = true;
        }
    }

    /// All positions whose tile is open floor.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if !tile.blocked {
                    positions.push(Position::new(x as i32, y as i32));
                }
            }
        }
        positions
    }
}
