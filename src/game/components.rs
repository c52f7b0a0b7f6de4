//! # Entity Components
//!
//! Capability modules attached to entities. Each entity carries zero or one of
//! each component. Components hold data and local rules only; anything that
//! needs to see other entities lives in `combat`, `effects` or `ai` and is
//! given the owner's [`EntityId`](crate::EntityId).

use crate::game::{Entity, EntityId, Message, ResultEvent};
use serde::{Deserialize, Serialize};

/// Combat statistics.
///
/// `0 <= hp <= max_hp` holds at all times except transiently after lethal
/// damage, before the turn engine reaps the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub max_hp: i32,
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    /// Experience granted to the player when this fighter dies
    pub xp_reward: u32,
}

impl Fighter {
    /// Creates a fighter at full health.
    pub fn new(hp: i32, defense: i32, power: i32, xp_reward: u32) -> Self {
        Self {
            max_hp: hp,
            hp,
            defense,
            power,
            xp_reward,
        }
    }

    /// Damage this fighter would deal to `defender`; zero or less means none.
    pub fn damage_against(&self, defender: &Fighter) -> i32 {
        self.power - defender.defense
    }

    /// Subtracts hit points. Returns true when the fighter is now dead.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        self.is_dead()
    }

    /// Restores hit points, never above `max_hp` and never lowering them.
    pub fn heal(&mut self, amount: i32) {
        if amount <= 0 || self.hp >= self.max_hp {
            return;
        }
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn is_at_full_health(&self) -> bool {
        self.hp >= self.max_hp
    }
}

/// Monster decision-making.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    /// Approach the player when seen and attack when adjacent.
    Basic,
    /// Stumble around at random, then return to `previous`.
    Confused {
        previous: Box<Ai>,
        remaining_turns: u32,
    },
}

impl Ai {
    /// Wraps an AI in a confusion decorator lasting `turns` turns.
    pub fn confused(previous: Ai, turns: u32) -> Self {
        Ai::Confused {
            previous: Box::new(previous),
            remaining_turns: turns,
        }
    }

    pub fn is_confused(&self) -> bool {
        matches!(self, Ai::Confused { .. })
    }
}

/// Parameters of a healing potion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealParams {
    pub amount: i32,
}

/// Parameters of a lightning bolt, which strikes the closest visible enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightningParams {
    pub damage: i32,
    pub maximum_range: i32,
}

/// Parameters of a fireball, which burns everything around a target tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireballParams {
    pub damage: i32,
    pub radius: i32,
}

/// Parameters of a confusion spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfuseParams {
    pub turns: u32,
}

/// What happens when an item is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    Heal(HealParams),
    Lightning(LightningParams),
    Fireball(FireballParams),
    Confuse(ConfuseParams),
}

/// Marks an entity as something that can be picked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Effect on use; `None` for inert items
    pub effect: Option<ItemEffect>,
    /// Use needs a target tile, chosen in targeting mode
    pub targeting: bool,
    /// Prompt shown when targeting mode starts
    pub targeting_message: Option<Message>,
}

impl Item {
    /// An item that applies immediately on use.
    pub fn instant(effect: ItemEffect) -> Self {
        Self {
            effect: Some(effect),
            targeting: false,
            targeting_message: None,
        }
    }

    /// An item that needs a target tile before it can be used.
    pub fn targeted(effect: ItemEffect, prompt: Message) -> Self {
        Self {
            effect: Some(effect),
            targeting: true,
            targeting_message: Some(prompt),
        }
    }
}

/// Returned by [`Inventory::add_item`] when there is no free slot. The item
/// is handed back untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryFull {
    pub item: Entity,
}

impl InventoryFull {
    pub fn message(&self) -> Message {
        Inventory::full_message()
    }
}

/// Fixed-capacity bag of item entities, in pickup order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub capacity: usize,
    pub items: Vec<Entity>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Shown when a pickup fails for lack of space.
    pub fn full_message() -> Message {
        Message::new(
            "You cannot carry any more, your inventory is full",
            crate::game::Rgb::YELLOW,
        )
    }

    /// Stores an item if there is a free slot.
    pub fn add_item(&mut self, item: Entity) -> Result<(), InventoryFull> {
        if self.is_full() {
            return Err(InventoryFull { item });
        }
        self.items.push(item);
        Ok(())
    }

    /// Stores an item lifted off the floor. The reported event names the
    /// world entity `source` so the turn engine can take it off the floor.
    pub fn pick_up(&mut self, source: EntityId, item: Entity) -> Result<Vec<ResultEvent>, InventoryFull> {
        let name = item.name.clone();
        self.add_item(item)?;
        Ok(vec![
            ResultEvent::ItemPickedUp {
                entity: source,
                name: name.clone(),
            },
            ResultEvent::Message(Message::new(
                format!("You pick up the {name}!"),
                crate::game::Rgb::BLUE,
            )),
        ])
    }

    /// Removes the item at `index`, shifting later items up.
    pub fn remove_item(&mut self, index: usize) -> Option<Entity> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Experience and character level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub current_level: u32,
    pub current_xp: u32,
    pub level_up_base: u32,
    pub level_up_factor: u32,
}

impl Level {
    pub fn new() -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            level_up_base: 200,
            level_up_factor: 150,
        }
    }

    /// Experience needed to reach the next level.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::Level;
    ///
    /// let level = Level::new();
    /// assert_eq!(level.experience_to_next_level(), 350);
    /// ```
    pub fn experience_to_next_level(&self) -> u32 {
        self.level_up_base + self.current_level * self.level_up_factor
    }

    /// Adds experience. Returns true when a level was gained.
    pub fn add_xp(&mut self, xp: u32) -> bool {
        self.current_xp += xp;

        let threshold = self.experience_to_next_level();
        if self.current_xp > threshold {
            self.current_xp -= threshold;
            self.current_level += 1;
            true
        } else {
            false
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

/// Down-stairs leading to another floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stairs {
    pub floor: u32,
}
