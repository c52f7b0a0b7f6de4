//! # Combat
//!
//! Melee resolution and damage. Nothing here removes entities: a lethal hit
//! only reports [`ResultEvent::Died`] and the turn engine reaps the body.

use crate::game::{capitalize, EntityArena, Message, ResultEvent, Rgb};
use crate::{DelverError, DelverResult, EntityId};

/// Resolves a melee attack.
///
/// Damage is the attacker's power minus the defender's defense. Nothing
/// happens to the defender when that is zero or less.
pub fn attack(
    arena: &mut EntityArena,
    attacker: EntityId,
    defender: EntityId,
) -> DelverResult<Vec<ResultEvent>> {
    let (attacker_name, attacker_fighter) = {
        let entity = arena.entity(attacker)?;
        let fighter = entity.fighter.clone().ok_or_else(|| {
            DelverError::InvalidAction(format!("{} cannot attack", entity.name))
        })?;
        (entity.name.clone(), fighter)
    };
    let (defender_name, damage) = {
        let entity = arena.entity(defender)?;
        let fighter = entity.fighter.as_ref().ok_or_else(|| {
            DelverError::InvalidAction(format!("{} cannot be attacked", entity.name))
        })?;
        (entity.name.clone(), attacker_fighter.damage_against(fighter))
    };

    let mut events = Vec::new();
    if damage > 0 {
        events.push(ResultEvent::Message(Message::new(
            format!(
                "{} attacks {} for {} hit points.",
                capitalize(&attacker_name),
                defender_name,
                damage
            ),
            Rgb::WHITE,
        )));
        events.extend(take_damage(arena, defender, damage)?);
    } else {
        events.push(ResultEvent::Message(Message::new(
            format!(
                "{} attacks {} but does no damage.",
                capitalize(&attacker_name),
                defender_name
            ),
            Rgb::WHITE,
        )));
    }

    log::debug!("{attacker} attacked {defender} for {damage}");
    Ok(events)
}

/// Subtracts hit points from `target`, reporting the damage and, when the
/// fighter drops to zero or below, its death.
pub fn take_damage(
    arena: &mut EntityArena,
    target: EntityId,
    amount: i32,
) -> DelverResult<Vec<ResultEvent>> {
    let entity = arena.entity_mut(target)?;
    let fighter = entity.fighter.as_mut().ok_or_else(|| {
        DelverError::InvalidAction(format!("{} cannot take damage", entity.name))
    })?;

    let mut events = vec![ResultEvent::Damaged { target, amount }];
    if fighter.take_damage(amount) {
        events.push(ResultEvent::Died {
            entity: target,
            xp_reward: fighter.xp_reward,
        });
    }
    Ok(events)
}
