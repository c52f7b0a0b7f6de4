//! # Pathfinding Algorithms
//!
//! Movement helpers for monsters: an A* step toward a target that routes
//! around other creatures, and a naive straight-line step used when no short
//! path exists.

use crate::game::{Direction, EntityArena, GameMap};
use crate::{DelverResult, EntityId, Position};
use ::pathfinding::prelude::astar;
use std::collections::HashSet;

/// Paths this long or longer are abandoned in favour of a direct step.
pub const MAX_PATH_LENGTH: usize = 25;

const ORTHOGONAL_COST: u32 = 100;
const DIAGONAL_COST: u32 = 141;

/// Octile distance scaled to the step costs.
fn octile(from: Position, to: Position) -> u32 {
    let dx = (from.x - to.x).unsigned_abs();
    let dy = (from.y - to.y).unsigned_abs();
    let (short, long) = if dx < dy { (dx, dy) } else { (dy, dx) };
    DIAGONAL_COST * short + ORTHOGONAL_COST * (long - short)
}

/// Whether `mover` could stand on `pos` right now.
fn is_free(arena: &EntityArena, map: &GameMap, pos: Position) -> bool {
    !map.is_blocked(pos) && arena.blocking_entity_at(pos).is_none()
}

/// Steps `mover` one cell along the rounded direction to `target`.
///
/// Does nothing when that cell is walled off or occupied. Returns whether
/// the entity moved.
pub fn move_towards(
    arena: &mut EntityArena,
    map: &GameMap,
    mover: EntityId,
    target: Position,
) -> DelverResult<bool> {
    let origin = arena.entity(mover)?.position;
    let distance = origin.distance_to(target);
    if distance == 0.0 {
        return Ok(false);
    }

    let dx = (f64::from(target.x - origin.x) / distance).round() as i32;
    let dy = (f64::from(target.y - origin.y) / distance).round() as i32;
    let destination = origin + Position::new(dx, dy);

    if destination == origin || !is_free(arena, map, destination) {
        return Ok(false);
    }
    arena.entity_mut(mover)?.position = destination;
    Ok(true)
}

/// Shortest 8-way path from `start` to `goal`, avoiding walls and the given
/// obstacle cells. The returned path includes both ends.
pub fn find_path(
    map: &GameMap,
    obstacles: &HashSet<Position>,
    start: Position,
    goal: Position,
) -> Option<Vec<Position>> {
    astar(
        &start,
        |&pos| {
            Direction::all()
                .into_iter()
                .map(|direction| {
                    let cost = if direction.is_diagonal() {
                        DIAGONAL_COST
                    } else {
                        ORTHOGONAL_COST
                    };
                    (pos + direction.to_delta(), cost)
                })
                .filter(|(next, _)| !map.is_blocked(*next) && !obstacles.contains(next))
                .collect::<Vec<_>>()
        },
        |&pos| octile(pos, goal),
        |&pos| pos == goal,
    )
    .map(|(path, _cost)| path)
}

/// Steps `mover` one cell along the shortest path to `target`.
///
/// Other blocking entities count as walls. Falls back to [`move_towards`]
/// when there is no path or it is [`MAX_PATH_LENGTH`] steps or longer.
/// Returns whether the entity moved.
pub fn move_astar(
    arena: &mut EntityArena,
    map: &GameMap,
    mover: EntityId,
    target: EntityId,
) -> DelverResult<bool> {
    let start = arena.entity(mover)?.position;
    let goal = arena.entity(target)?.position;

    let obstacles: HashSet<Position> = arena
        .iter()
        .filter(|(id, entity)| *id != mover && *id != target && entity.blocks_movement)
        .map(|(_, entity)| entity.position)
        .collect();

    if let Some(path) = find_path(map, &obstacles, start, goal) {
        let steps = path.len().saturating_sub(1);
        if steps > 0 && steps < MAX_PATH_LENGTH {
            let next = path[1];
            if is_free(arena, map, next) {
                arena.entity_mut(mover)?.position = next;
                return Ok(true);
            }
            return Ok(false);
        }
        log::debug!("{mover}: path of {steps} steps is too long, moving directly");
    }

    move_towards(arena, map, mover, goal)
}
