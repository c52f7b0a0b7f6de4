//! # Item Effects
//!
//! Using and dropping inventory items. An effect that finds no valid target
//! reports why and leaves the item in the inventory, so a failed cast costs
//! nothing.

use crate::game::{
    take_damage, Ai, ConfuseParams, EntityArena, FireballParams, HealParams, ItemEffect,
    LightningParams, Message, ResultEvent, Rgb, VisibilityProvider,
};
use crate::{DelverError, DelverResult, EntityId, Position};

/// Result of applying one effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectOutcome {
    /// The item was used up
    pub consumed: bool,
    pub events: Vec<ResultEvent>,
}

impl EffectOutcome {
    fn consumed(events: Vec<ResultEvent>) -> Self {
        Self {
            consumed: true,
            events,
        }
    }

    fn kept(message: Message) -> Self {
        Self {
            consumed: false,
            events: vec![ResultEvent::Message(message)],
        }
    }
}

/// Applies `effect` on behalf of `caster`.
///
/// `target` is the chosen tile for effects that need one.
pub fn apply_effect(
    effect: ItemEffect,
    arena: &mut EntityArena,
    caster: EntityId,
    visibility: &dyn VisibilityProvider,
    target: Option<Position>,
) -> DelverResult<EffectOutcome> {
    match effect {
        ItemEffect::Heal(params) => heal(params, arena, caster),
        ItemEffect::Lightning(params) => cast_lightning(params, arena, caster, visibility),
        ItemEffect::Fireball(params) => {
            let target = require_target(target)?;
            cast_fireball(params, arena, visibility, target)
        }
        ItemEffect::Confuse(params) => {
            let target = require_target(target)?;
            cast_confuse(params, arena, visibility, target)
        }
    }
}

fn require_target(target: Option<Position>) -> DelverResult<Position> {
    target.ok_or_else(|| DelverError::InvalidAction("effect needs a target tile".to_string()))
}

fn heal(params: HealParams, arena: &mut EntityArena, caster: EntityId) -> DelverResult<EffectOutcome> {
    let entity = arena.entity_mut(caster)?;
    let fighter = entity
        .fighter
        .as_mut()
        .ok_or_else(|| DelverError::InvalidAction(format!("{} cannot heal", entity.name)))?;

    if fighter.is_at_full_health() {
        return Ok(EffectOutcome::kept(Message::new(
            "You are already at full health",
            Rgb::YELLOW,
        )));
    }

    fighter.heal(params.amount);
    Ok(EffectOutcome::consumed(vec![ResultEvent::Message(
        Message::new("Your wounds start to feel better!", Rgb::GREEN),
    )]))
}

fn cast_lightning(
    params: LightningParams,
    arena: &mut EntityArena,
    caster: EntityId,
    visibility: &dyn VisibilityProvider,
) -> DelverResult<EffectOutcome> {
    let origin = arena.entity(caster)?.position;

    let mut closest_distance = f64::from(params.maximum_range + 1);
    let mut target = None;
    for (id, entity) in arena.iter() {
        if id == caster || entity.fighter.is_none() || !visibility.is_visible(entity.position) {
            continue;
        }
        let distance = origin.distance_to(entity.position);
        if distance < closest_distance {
            closest_distance = distance;
            target = Some((id, entity.name.clone()));
        }
    }

    let Some((target, name)) = target else {
        return Ok(EffectOutcome::kept(Message::new(
            "No enemy is close enough to strike.",
            Rgb::RED,
        )));
    };

    let mut events = vec![ResultEvent::Message(Message::plain(format!(
        "A lightning bolt strikes the {} with a loud thunder! The damage is {}",
        name, params.damage
    )))];
    events.extend(take_damage(arena, target, params.damage)?);
    Ok(EffectOutcome::consumed(events))
}

fn cast_fireball(
    params: FireballParams,
    arena: &mut EntityArena,
    visibility: &dyn VisibilityProvider,
    target: Position,
) -> DelverResult<EffectOutcome> {
    if !visibility.is_visible(target) {
        return Ok(EffectOutcome::kept(Message::new(
            "You cannot target a tile outside your field of view.",
            Rgb::YELLOW,
        )));
    }

    let victims: Vec<(EntityId, String)> = arena
        .iter()
        .filter(|(_, entity)| {
            entity.fighter.is_some()
                && entity.position.distance_to(target) <= f64::from(params.radius)
        })
        .map(|(id, entity)| (id, entity.name.clone()))
        .collect();

    let mut events = vec![ResultEvent::Message(Message::new(
        format!(
            "The fireball explodes, burning everything within {} tiles!",
            params.radius
        ),
        Rgb::ORANGE,
    ))];
    for (id, name) in victims {
        events.push(ResultEvent::Message(Message::new(
            format!("The {} gets burned for {} hit points.", name, params.damage),
            Rgb::ORANGE,
        )));
        events.extend(take_damage(arena, id, params.damage)?);
    }
    Ok(EffectOutcome::consumed(events))
}

fn cast_confuse(
    params: ConfuseParams,
    arena: &mut EntityArena,
    visibility: &dyn VisibilityProvider,
    target: Position,
) -> DelverResult<EffectOutcome> {
    if !visibility.is_visible(target) {
        return Ok(EffectOutcome::kept(Message::new(
            "You cannot target a tile outside your field of view.",
            Rgb::YELLOW,
        )));
    }

    let victim = arena
        .iter()
        .find(|(_, entity)| entity.position == target && entity.ai.is_some())
        .map(|(id, _)| id);

    let Some(victim) = victim else {
        return Ok(EffectOutcome::kept(Message::new(
            "There is no targetable enemy at that location.",
            Rgb::YELLOW,
        )));
    };

    let entity = arena.entity_mut(victim)?;
    if let Some(previous) = entity.ai.take() {
        entity.ai = Some(Ai::confused(previous, params.turns));
    }
    Ok(EffectOutcome::consumed(vec![ResultEvent::Message(
        Message::new(
            format!(
                "The eyes of the {} look vacant, as it starts to stumble around!",
                entity.name
            ),
            Rgb::LIGHT_GREEN,
        ),
    )]))
}

/// Uses the item at `index` in `user`'s inventory.
///
/// A targeted item without a `target` asks for targeting mode instead of
/// applying. A consumed item is removed from the inventory.
pub fn use_item(
    arena: &mut EntityArena,
    user: EntityId,
    index: usize,
    visibility: &dyn VisibilityProvider,
    target: Option<Position>,
) -> DelverResult<Vec<ResultEvent>> {
    let (name, item) = {
        let inventory = arena.entity(user)?.inventory.as_ref().ok_or_else(|| {
            DelverError::InvalidAction("user has no inventory".to_string())
        })?;
        let entity = inventory
            .get(index)
            .ok_or_else(|| DelverError::InvalidAction(format!("no item in slot {index}")))?;
        let item = entity
            .item
            .clone()
            .ok_or_else(|| DelverError::InvalidState(format!("{} is not an item", entity.name)))?;
        (entity.name.clone(), item)
    };

    let Some(effect) = item.effect else {
        return Ok(vec![ResultEvent::Message(Message::new(
            format!("The {name} cannot be used"),
            Rgb::YELLOW,
        ))]);
    };

    if item.targeting && target.is_none() {
        return Ok(vec![ResultEvent::TargetingRequested { item_index: index }]);
    }

    let outcome = apply_effect(effect, arena, user, visibility, target)?;
    let mut events = outcome.events;
    if outcome.consumed {
        if let Some(inventory) = arena.entity_mut(user)?.inventory.as_mut() {
            inventory.remove_item(index);
        }
        events.push(ResultEvent::ItemConsumed { name });
    }
    Ok(events)
}

/// Takes the item at `index` out of `user`'s inventory and puts it at the
/// user's feet. The returned event carries the item back to the world.
pub fn drop_item(
    arena: &mut EntityArena,
    user: EntityId,
    index: usize,
) -> DelverResult<Vec<ResultEvent>> {
    let entity = arena.entity_mut(user)?;
    let position = entity.position;
    let mut item = entity
        .inventory
        .as_mut()
        .and_then(|inventory| inventory.remove_item(index))
        .ok_or_else(|| DelverError::InvalidAction(format!("no item in slot {index}")))?;

    item.position = position;
    let message = Message::new(format!("You dropped the {}.", item.name), Rgb::YELLOW);
    Ok(vec![
        ResultEvent::ItemDropped {
            item: Box::new(item),
        },
        ResultEvent::Message(message),
    ])
}
