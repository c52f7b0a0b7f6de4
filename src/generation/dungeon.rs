//! # Dungeon Generation
//!
//! Room-and-corridor floor layouts.
//!
//! The generator makes a fixed number of placement attempts. A candidate room
//! that touches an earlier one is dropped rather than retried, so a floor may
//! end up with fewer rooms than attempts. Every accepted room is joined to the
//! previous one by an L-shaped tunnel and then populated.

use crate::game::{Entity, GameMap, Position, RenderOrder, Rgb, Stairs};
use crate::generation::{GenerationConfig, Generator, ItemTable, MonsterTable, Room};
use crate::{DelverError, DelverResult};
use rand::{rngs::StdRng, Rng};

/// A freshly generated floor, before the player is placed on it.
#[derive(Debug, Clone)]
pub struct GeneratedFloor {
    pub map: GameMap,
    /// Monsters and items per room in placement order, then the stairs
    pub entities: Vec<Entity>,
    /// Center of the first room
    pub player_start: Position,
    pub rooms: Vec<Room>,
}

/// Primary dungeon generator using the room-and-corridor algorithm.
///
/// # Examples
///
/// ```
/// use delver::{create_rng, GenerationConfig, Generator, RoomCorridorGenerator};
///
/// let generator = RoomCorridorGenerator::new();
/// let mut rng = create_rng(42);
/// let floor = generator.generate(&GenerationConfig::default(), 1, &mut rng).unwrap();
/// assert!(!floor.rooms.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoomCorridorGenerator {
    pub monsters: MonsterTable,
    pub items: ItemTable,
}

impl RoomCorridorGenerator {
    /// Creates a generator with the standard monster and item tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples one candidate room that lies fully on the map.
    fn random_room(&self, id: u32, config: &GenerationConfig, rng: &mut StdRng) -> Room {
        let width = rng.gen_range(config.room_min_size..=config.room_max_size);
        let height = rng.gen_range(config.room_min_size..=config.room_max_size);
        let x = rng.gen_range(0..=config.map_width - width - 1);
        let y = rng.gen_range(0..=config.map_height - height - 1);
        Room::new(id, Position::new(x, y), width, height)
    }

    fn carve_room(&self, map: &mut GameMap, room: &Room) {
        for pos in room.floor_positions() {
            map.carve(pos);
        }
    }

    fn carve_h_tunnel(&self, map: &mut GameMap, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            map.carve(Position::new(x, y));
        }
    }

    fn carve_v_tunnel(&self, map: &mut GameMap, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            map.carve(Position::new(x, y));
        }
    }

    /// Carves an L-shaped corridor, horizontal leg first or vertical leg
    /// first on a coin flip.
    fn carve_l_corridor(&self, map: &mut GameMap, start: Position, end: Position, rng: &mut StdRng) {
        if rng.gen_bool(0.5) {
            self.carve_h_tunnel(map, start.x, end.x, start.y);
            self.carve_v_tunnel(map, start.y, end.y, end.x);
        } else {
            self.carve_v_tunnel(map, start.y, end.y, start.x);
            self.carve_h_tunnel(map, start.x, end.x, end.y);
        }
    }

    /// Picks a uniformly random interior cell of `room`.
    fn random_interior(&self, room: &Room, rng: &mut StdRng) -> Position {
        let bottom_right = room.bottom_right();
        Position::new(
            rng.gen_range(room.top_left.x + 1..bottom_right.x),
            rng.gen_range(room.top_left.y + 1..bottom_right.y),
        )
    }

    /// Drops monsters and items into `room`. A roll that lands on an
    /// occupied cell is skipped.
    fn populate_room(
        &self,
        room: &Room,
        config: &GenerationConfig,
        occupied: &mut Vec<Position>,
        entities: &mut Vec<Entity>,
        rng: &mut StdRng,
    ) {
        let monster_count = rng.gen_range(0..=config.max_monsters_per_room);
        let item_count = rng.gen_range(0..=config.max_items_per_room);

        for _ in 0..monster_count {
            let pos = self.random_interior(room, rng);
            if occupied.contains(&pos) {
                continue;
            }
            if let Some(monster) = self.monsters.roll(pos, rng) {
                occupied.push(pos);
                entities.push(monster);
            }
        }

        for _ in 0..item_count {
            let pos = self.random_interior(room, rng);
            if occupied.contains(&pos) {
                continue;
            }
            if let Some(item) = self.items.roll(pos, rng) {
                occupied.push(pos);
                entities.push(item);
            }
        }
    }
}

/// Creates the down-stairs leading below `depth`.
pub fn stairs_down(position: Position, depth: u32) -> Entity {
    Entity::new(position, '>', Rgb::WHITE, "Stairs", false, RenderOrder::Stairs)
        .with_stairs(Stairs { floor: depth + 1 })
}

impl Generator<GeneratedFloor> for RoomCorridorGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        depth: u32,
        rng: &mut StdRng,
    ) -> DelverResult<GeneratedFloor> {
        config.validate()?;

        let mut map = GameMap::new(config.map_width, config.map_height, depth)?;
        let mut rooms: Vec<Room> = Vec::new();
        let mut entities = Vec::new();
        let mut occupied = Vec::new();
        let mut player_start = None;

        for attempt in 0..config.max_rooms {
            let room = self.random_room(attempt, config, rng);
            if rooms.iter().any(|other| room.overlaps(other)) {
                continue;
            }

            self.carve_room(&mut map, &room);
            let center = room.center();
            match rooms.last() {
                None => {
                    player_start = Some(center);
                    occupied.push(center);
                }
                Some(previous) => {
                    let previous_center = previous.center();
                    self.carve_l_corridor(&mut map, previous_center, center, rng);
                }
            }

            self.populate_room(&room, config, &mut occupied, &mut entities, rng);
            rooms.push(room);
        }

        let (Some(player_start), Some(last_room)) = (player_start, rooms.last()) else {
            return Err(DelverError::GenerationFailed(
                "Failed to place any rooms".to_string(),
            ));
        };
        entities.push(stairs_down(last_room.center(), depth));

        log::debug!(
            "{}: depth {} with {} rooms and {} entities",
            self.generator_type(),
            depth,
            rooms.len(),
            entities.len()
        );
        if rooms.len() == 1 {
            log::warn!("Only one room fit on depth {depth}");
        }

        let floor = GeneratedFloor {
            map,
            entities,
            player_start,
            rooms,
        };
        self.validate(&floor, config)?;
        Ok(floor)
    }

    fn validate(&self, floor: &GeneratedFloor, config: &GenerationConfig) -> DelverResult<()> {
        if floor.map.width != config.map_width || floor.map.height != config.map_height {
            return Err(DelverError::GenerationFailed(format!(
                "map is {}x{}, expected {}x{}",
                floor.map.width, floor.map.height, config.map_width, config.map_height
            )));
        }
        if floor.map.is_blocked(floor.player_start) {
            return Err(DelverError::GenerationFailed(
                "player start is inside a wall".to_string(),
            ));
        }
        if !floor.entities.iter().any(|entity| entity.stairs.is_some()) {
            return Err(DelverError::GenerationFailed(
                "floor has no way down".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::create_rng;

    #[test]
    fn test_generation_with_small_map() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::for_testing();
        let mut rng = create_rng(12345);

        let floor = generator.generate(&config, 3, &mut rng).unwrap();

        assert_eq!(floor.map.width, config.map_width);
        assert_eq!(floor.map.depth, 3);
        assert!(!floor.map.floor_positions().is_empty());
        assert_eq!(floor.player_start, floor.rooms[0].center());
    }

    #[test]
    fn test_stairs_in_last_room() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::default();
        let mut rng = create_rng(99);

        let floor = generator.generate(&config, 1, &mut rng).unwrap();
        let stairs = floor.entities.last().unwrap();

        assert_eq!(stairs.stairs, Some(Stairs { floor: 2 }));
        assert_eq!(stairs.position, floor.rooms.last().unwrap().center());
        assert_eq!(stairs.render_order, RenderOrder::Stairs);
    }

    #[test]
    fn test_same_seed_same_floor() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig::default();

        let a = generator.generate(&config, 1, &mut create_rng(7)).unwrap();
        let b = generator.generate(&config, 1, &mut create_rng(7)).unwrap();

        assert_eq!(a.map, b.map);
        assert_eq!(a.rooms, b.rooms);
        assert_eq!(a.entities, b.entities);
    }

    #[test]
    fn test_l_corridor_carving() {
        let generator = RoomCorridorGenerator::new();
        let mut map = GameMap::new(20, 20, 1).unwrap();
        let mut rng = create_rng(12345);

        let start = Position::new(5, 5);
        let end = Position::new(15, 15);
        generator.carve_l_corridor(&mut map, start, end, &mut rng);

        assert!(!map.is_blocked(start));
        assert!(!map.is_blocked(end));
        // Either corner of the L is open
        assert!(!map.is_blocked(Position::new(15, 5)) || !map.is_blocked(Position::new(5, 15)));
        assert_eq!(map.floor_positions().len(), 21);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let generator = RoomCorridorGenerator::new();
        let config = GenerationConfig {
            room_min_size: 12,
            room_max_size: 8,
            ..GenerationConfig::default()
        };
        assert!(generator.generate(&config, 1, &mut create_rng(1)).is_err());
    }
}
