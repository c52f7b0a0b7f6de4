//! # Monster AI
//!
//! One decision per monster per enemy phase. [`Ai`](crate::Ai) variants are
//! plain data on the entity; this module runs them against the world.

use crate::game::{attack, Ai, EntityArena, GameMap, Message, ResultEvent, Rgb, VisibilityProvider};
use crate::utils::{move_astar, move_towards};
use crate::{DelverResult, EntityId, Position};
use rand::Rng;

/// Runs one turn of `monster`'s AI against `player`.
///
/// Entities without an AI do nothing.
pub fn take_turn<R: Rng + ?Sized>(
    arena: &mut EntityArena,
    map: &GameMap,
    visibility: &dyn VisibilityProvider,
    rng: &mut R,
    monster: EntityId,
    player: EntityId,
) -> DelverResult<Vec<ResultEvent>> {
    let Some(ai) = arena.entity(monster)?.ai.clone() else {
        return Ok(Vec::new());
    };

    match ai {
        Ai::Basic => basic_turn(arena, map, visibility, monster, player),
        Ai::Confused {
            previous,
            remaining_turns,
        } => confused_turn(arena, map, rng, monster, *previous, remaining_turns),
    }
}

/// Chases the player while in view and attacks when adjacent.
fn basic_turn(
    arena: &mut EntityArena,
    map: &GameMap,
    visibility: &dyn VisibilityProvider,
    monster: EntityId,
    player: EntityId,
) -> DelverResult<Vec<ResultEvent>> {
    let position = arena.entity(monster)?.position;
    if !visibility.is_visible(position) {
        return Ok(Vec::new());
    }

    let target = arena.entity(player)?;
    let distance = position.distance_to(target.position);
    let player_alive = target.fighter.as_ref().is_some_and(|f| f.hp > 0);

    if distance >= 2.0 {
        move_astar(arena, map, monster, player)?;
        Ok(Vec::new())
    } else if player_alive {
        attack(arena, monster, player)
    } else {
        Ok(Vec::new())
    }
}

/// Stumbles to a random neighbouring cell, or recovers once the confusion
/// has run out.
fn confused_turn<R: Rng + ?Sized>(
    arena: &mut EntityArena,
    map: &GameMap,
    rng: &mut R,
    monster: EntityId,
    previous: Ai,
    remaining_turns: u32,
) -> DelverResult<Vec<ResultEvent>> {
    if remaining_turns > 0 {
        let origin = arena.entity(monster)?.position;
        let destination = origin + Position::new(rng.gen_range(-1..=1), rng.gen_range(-1..=1));
        if destination != origin {
            move_towards(arena, map, monster, destination)?;
        }
        arena.entity_mut(monster)?.ai = Some(Ai::Confused {
            previous: Box::new(previous),
            remaining_turns: remaining_turns - 1,
        });
        return Ok(Vec::new());
    }

    let entity = arena.entity_mut(monster)?;
    entity.ai = Some(previous);
    log::debug!("{monster} recovered from confusion");
    Ok(vec![ResultEvent::Message(Message::new(
        format!("The {} is no longer confused!", entity.name),
        Rgb::RED,
    ))])
}
