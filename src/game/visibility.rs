//! # Field of View
//!
//! Which tiles the player can currently see. The turn engine recomputes the
//! map whenever its dirty flag is set, before any rendering or AI decision
//! that depends on it.

use crate::game::{GameMap, Position};
use crate::utils::line;
use serde::{Deserialize, Serialize};

/// Source of per-tile visibility.
pub trait VisibilityProvider {
    /// Recomputes visibility from `origin`. A `radius` of zero or less means
    /// unlimited. With `light_walls`, the first opaque tile hit by a ray is
    /// itself visible.
    fn compute(&mut self, map: &GameMap, origin: Position, radius: i32, light_walls: bool);

    /// Whether `pos` was visible at the last computation.
    fn is_visible(&self, pos: Position) -> bool;
}

/// Raycasting field of view: a Bresenham ray to every cell on the edge of the
/// sight square, stopped by opaque terrain and the circular radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FovMap {
    width: i32,
    height: i32,
    visible: Vec<bool>,
}

impl FovMap {
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            visible: vec![false; cells],
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            None
        } else {
            Some((pos.y * self.width + pos.x) as usize)
        }
    }

    fn set_visible(&mut self, pos: Position) {
        if let Some(index) = self.index(pos) {
            self.visible[index] = true;
        }
    }

    /// Every visible position, row by row.
    pub fn visible_positions(&self) -> Vec<Position> {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(|(index, _)| {
                let index = index as i32;
                Position::new(index % self.width, index / self.width)
            })
            .collect()
    }

    fn cast_ray(
        &mut self,
        map: &GameMap,
        origin: Position,
        target: Position,
        radius: i32,
        light_walls: bool,
    ) {
        for cell in line(origin, target).into_iter().skip(1) {
            if !map.is_valid_position(cell) {
                break;
            }
            if radius > 0 {
                let delta = cell - origin;
                if delta.x * delta.x + delta.y * delta.y > radius * radius {
                    break;
                }
            }
            if map.is_opaque(cell) {
                if light_walls {
                    self.set_visible(cell);
                }
                break;
            }
            self.set_visible(cell);
        }
    }
}

impl VisibilityProvider for FovMap {
    fn compute(&mut self, map: &GameMap, origin: Position, radius: i32, light_walls: bool) {
        if self.width != map.width || self.height != map.height {
            *self = FovMap::new(map.width, map.height);
        } else {
            self.visible.iter_mut().for_each(|cell| *cell = false);
        }

        if !map.is_valid_position(origin) {
            return;
        }
        self.set_visible(origin);

        let (min_x, max_x, min_y, max_y) = if radius > 0 {
            (
                (origin.x - radius).max(0),
                (origin.x + radius).min(map.width - 1),
                (origin.y - radius).max(0),
                (origin.y + radius).min(map.height - 1),
            )
        } else {
            (0, map.width - 1, 0, map.height - 1)
        };

        for x in min_x..=max_x {
            self.cast_ray(map, origin, Position::new(x, min_y), radius, light_walls);
            self.cast_ray(map, origin, Position::new(x, max_y), radius, light_walls);
        }
        for y in min_y..=max_y {
            self.cast_ray(map, origin, Position::new(min_x, y), radius, light_walls);
            self.cast_ray(map, origin, Position::new(max_x, y), radius, light_walls);
        }
    }

    fn is_visible(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|index| self.visible[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room() -> GameMap {
        let mut map = GameMap::new(20, 20, 1).unwrap();
        for y in 1..19 {
            for x in 1..19 {
                map.carve(Position::new(x, y));
            }
        }
        map
    }

    #[test]
    fn test_walls_block_sight() {
        let mut map = open_room();
        // Partition at x = 10
        for y in 0..20 {
            if let Some(tile) = map.get_tile_mut(Position::new(10, y)) {
                *tile = crate::Tile::wall();
            }
        }

        let mut fov = FovMap::new(20, 20);
        fov.compute(&map, Position::new(5, 5), 0, true);

        assert!(fov.is_visible(Position::new(5, 5)));
        assert!(fov.is_visible(Position::new(9, 5)));
        assert!(fov.is_visible(Position::new(10, 5)));
        assert!(!fov.is_visible(Position::new(12, 5)));

        fov.compute(&map, Position::new(5, 5), 0, false);
        assert!(!fov.is_visible(Position::new(10, 5)));
        assert!(fov.is_visible(Position::new(9, 5)));
    }

    #[test]
    fn test_radius_limits_sight() {
        let map = open_room();
        let mut fov = FovMap::new(20, 20);
        fov.compute(&map, Position::new(9, 9), 3, true);

        assert!(fov.is_visible(Position::new(12, 9)));
        assert!(!fov.is_visible(Position::new(13, 9)));
        assert!(!fov.is_visible(Position::new(12, 12)));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let map = open_room();
        let mut fov = FovMap::new(20, 20);

        fov.compute(&map, Position::new(4, 7), 10, true);
        let first = fov.clone();
        fov.compute(&map, Position::new(4, 7), 10, true);

        assert_eq!(fov, first);
        assert_eq!(fov.visible_positions(), first.visible_positions());
    }

    #[test]
    fn test_resizes_to_map() {
        let map = open_room();
        let mut fov = FovMap::default();
        fov.compute(&map, Position::new(2, 2), 5, true);
        assert!(fov.is_visible(Position::new(3, 3)));
        assert!(!fov.is_visible(Position::new(-1, 0)));
    }
}
