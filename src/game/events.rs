//! # Result Events
//!
//! Outcomes reported by combat, items, inventories and AI. Producers never
//! touch the turn state directly; the turn engine folds these in order.

use crate::game::{Entity, EntityId, Message};
use serde::{Deserialize, Serialize};

/// One outcome of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultEvent {
    /// Text for the message log
    Message(Message),
    /// A fighter lost hit points
    Damaged { target: EntityId, amount: i32 },
    /// A fighter reached zero hit points and must be reaped
    Died { entity: EntityId, xp_reward: u32 },
    /// Experience for the player
    XpGained { xp: u32 },
    /// An item moved into the player's inventory; `entity` is the floor
    /// entity to remove
    ItemPickedUp { entity: EntityId, name: String },
    /// An item was used up
    ItemConsumed { name: String },
    /// An item left the inventory and must be placed back in the world
    ItemDropped { item: Box<Entity> },
    /// The inventory item at this index needs a target before it can be used
    TargetingRequested { item_index: usize },
    /// The pending targeted use was abandoned
    TargetingCancelled,
}

impl ResultEvent {
    /// Whether folding this event ends the player's turn.
    pub fn ends_turn(&self) -> bool {
        matches!(
            self,
            ResultEvent::ItemPickedUp { .. }
                | ResultEvent::ItemConsumed { .. }
                | ResultEvent::ItemDropped { .. }
        )
    }
}

impl From<Message> for ResultEvent {
    fn from(message: Message) -> Self {
        ResultEvent::Message(message)
    }
}

/// Collects the message texts of an event list, in order.
pub fn message_texts(events: &[ResultEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            ResultEvent::Message(message) => Some(message.text.as_str()),
            _ => None,
        })
        .collect()
}
