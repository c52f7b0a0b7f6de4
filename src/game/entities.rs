//! # Entities
//!
//! Positioned game objects built from optional components, and the arena
//! that owns them.
//!
//! The arena hands out [`EntityId`]s that stay valid until the entity is
//! removed. Slots are never reused within a floor, so ascending id order is
//! insertion order.

use crate::config::PlayerConfig;
use crate::game::{
    Ai, Fighter, Inventory, Item, Level, Position, Rgb, Stairs,
};
use crate::{DelverError, DelverResult, EntityId};
use serde::{Deserialize, Serialize};

/// Draw layer, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderOrder {
    Stairs,
    Corpse,
    Item,
    Actor,
}

/// A game object.
///
/// # Examples
///
/// ```
/// use delver::{Entity, Fighter, Position, RenderOrder, Rgb};
///
/// let orc = Entity::new(Position::new(3, 4), 'o', Rgb::DESATURATED_GREEN, "Orc", true, RenderOrder::Actor)
///     .with_fighter(Fighter::new(10, 0, 3, 35));
/// assert!(orc.is_alive());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Position,
    pub glyph: char,
    pub color: Rgb,
    pub name: String,
    pub blocks_movement: bool,
    pub render_order: RenderOrder,
    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub item: Option<Item>,
    pub inventory: Option<Inventory>,
    pub level: Option<Level>,
    pub stairs: Option<Stairs>,
}

impl Entity {
    /// Creates an entity without components.
    pub fn new(
        position: Position,
        glyph: char,
        color: Rgb,
        name: impl Into<String>,
        blocks_movement: bool,
        render_order: RenderOrder,
    ) -> Self {
        Self {
            position,
            glyph,
            color,
            name: name.into(),
            blocks_movement,
            render_order,
            fighter: None,
            ai: None,
            item: None,
            inventory: None,
            level: None,
            stairs: None,
        }
    }

    /// Creates the player character.
    pub fn player(position: Position, config: &PlayerConfig) -> Self {
        Self::new(position, '@', Rgb::WHITE, "Player", true, RenderOrder::Actor)
            .with_fighter(Fighter::new(config.hp, config.defense, config.power, 0))
            .with_inventory(Inventory::new(config.inventory_capacity))
            .with_level(Level::new())
    }

    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self
    }

    pub fn with_ai(mut self, ai: Ai) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_stairs(mut self, stairs: Stairs) -> Self {
        self.stairs = Some(stairs);
        self
    }

    /// True for entities with a fighter that still has hit points.
    pub fn is_alive(&self) -> bool {
        self.fighter.as_ref().is_some_and(|f| !f.is_dead())
    }

    pub fn distance_to(&self, other: &Entity) -> f64 {
        self.position.distance_to(other.position)
    }

    /// Turns a dead monster into inert remains.
    pub fn make_corpse(&mut self) {
        self.glyph = '%';
        self.color = Rgb::DARK_RED;
        self.blocks_movement = false;
        self.fighter = None;
        self.ai = None;
        self.name = format!("remains of {}", self.name);
        self.render_order = RenderOrder::Corpse;
    }
}

/// Index-stable owner of every entity on the current floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityArena {
    slots: Vec<Option<Entity>>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity and returns its handle.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.slots.len());
        self.slots.push(Some(entity));
        id
    }

    /// Removes an entity, leaving its slot empty.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Like [`get`](Self::get), but a stale id is an error.
    pub fn entity(&self, id: EntityId) -> DelverResult<&Entity> {
        self.get(id)
            .ok_or_else(|| DelverError::InvalidState(format!("no entity {id}")))
    }

    /// Like [`get_mut`](Self::get_mut), but a stale id is an error.
    pub fn entity_mut(&mut self, id: EntityId) -> DelverResult<&mut Entity> {
        self.get_mut(id)
            .ok_or_else(|| DelverError::InvalidState(format!("no entity {id}")))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Live entities in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|entity| (EntityId(index), entity)))
    }

    /// Snapshot of live ids, for loops that mutate the arena.
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first entity at `position` that blocks movement.
    pub fn blocking_entity_at(&self, position: Position) -> Option<EntityId> {
        self.iter()
            .find(|(_, entity)| entity.blocks_movement && entity.position == position)
            .map(|(id, _)| id)
    }

    /// All entities standing on `position`.
    pub fn entities_at(&self, position: Position) -> Vec<EntityId> {
        self.iter()
            .filter(|(_, entity)| entity.position == position)
            .map(|(id, _)| id)
            .collect()
    }

    /// Drops everything and starts over with a single entity.
    pub fn reset_with(&mut self, entity: Entity) -> EntityId {
        self.slots.clear();
        self.insert(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orc(x: i32, y: i32) -> Entity {
        Entity::new(
            Position::new(x, y),
            'o',
            Rgb::DESATURATED_GREEN,
            "Orc",
            true,
            RenderOrder::Actor,
        )
        .with_fighter(Fighter::new(10, 0, 3, 35))
        .with_ai(Ai::Basic)
    }

    #[test]
    fn test_ids_are_stable_after_removal() {
        let mut arena = EntityArena::new();
        let a = arena.insert(orc(1, 1));
        let b = arena.insert(orc(2, 2));

        assert!(arena.remove(a).is_some());
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b).map(|e| e.position), Some(Position::new(2, 2)));
        assert_eq!(arena.len(), 1);
        assert!(arena.entity(a).is_err());

        let c = arena.insert(orc(3, 3));
        assert_ne!(c, a);
        assert_eq!(arena.ids(), vec![b, c]);
    }

    #[test]
    fn test_blocking_entity_lookup() {
        let mut arena = EntityArena::new();
        let mut corpse = orc(4, 4);
        corpse.make_corpse();
        arena.insert(corpse);
        let live = arena.insert(orc(4, 4));

        assert_eq!(arena.blocking_entity_at(Position::new(4, 4)), Some(live));
        assert_eq!(arena.entities_at(Position::new(4, 4)).len(), 2);
        assert_eq!(arena.blocking_entity_at(Position::new(5, 5)), None);
    }

    #[test]
    fn test_make_corpse() {
        let mut entity = orc(0, 0);
        entity.make_corpse();

        assert_eq!(entity.name, "remains of Orc");
        assert_eq!(entity.glyph, '%');
        assert!(!entity.blocks_movement);
        assert!(entity.fighter.is_none());
        assert!(entity.ai.is_none());
        assert_eq!(entity.render_order, RenderOrder::Corpse);
    }

    #[test]
    fn test_player_components() {
        let player = Entity::player(Position::new(1, 2), &PlayerConfig::default());
        let fighter = player.fighter.as_ref().unwrap();
        assert_eq!((fighter.hp, fighter.defense, fighter.power), (30, 2, 5));
        assert_eq!(player.inventory.as_ref().unwrap().capacity, 26);
        assert_eq!(player.level.unwrap().current_level, 1);
    }

    #[test]
    fn test_render_order_layers() {
        assert!(RenderOrder::Stairs < RenderOrder::Corpse);
        assert!(RenderOrder::Corpse < RenderOrder::Item);
        assert!(RenderOrder::Item < RenderOrder::Actor);
    }

    #[test]
    fn test_reset_with_keeps_single_entity() {
        let mut arena = EntityArena::new();
        arena.insert(orc(1, 1));
        arena.insert(orc(2, 2));
        let id = arena.reset_with(orc(5, 5));
        assert_eq!(id, EntityId(0));
        assert_eq!(arena.len(), 1);
    }
}
