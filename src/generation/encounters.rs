//! # Encounter Generation
//!
//! The monster table: which creatures can appear and how often.

use crate::game::{Ai, Entity, Fighter, Position, RenderOrder, Rgb};
use crate::utils::random_choice_index;
use rand::Rng;

/// Stat block and look of one monster kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: Rgb,
    /// Relative spawn weight
    pub weight: u32,
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    pub xp_reward: u32,
}

impl MonsterTemplate {
    /// Creates a monster of this kind at `position`.
    pub fn spawn(&self, position: Position) -> Entity {
        Entity::new(position, self.glyph, self.color, self.name, true, RenderOrder::Actor)
            .with_fighter(Fighter::new(self.hp, self.defense, self.power, self.xp_reward))
            .with_ai(Ai::Basic)
    }
}

/// Weighted monster table.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterTable {
    templates: Vec<MonsterTemplate>,
}

impl MonsterTable {
    pub fn new(templates: Vec<MonsterTemplate>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[MonsterTemplate] {
        &self.templates
    }

    /// Rolls a monster kind and spawns it at `position`.
    pub fn roll<R: Rng + ?Sized>(&self, position: Position, rng: &mut R) -> Option<Entity> {
        let weights: Vec<u32> = self.templates.iter().map(|t| t.weight).collect();
        random_choice_index(&weights, rng).map(|index| self.templates[index].spawn(position))
    }
}

impl Default for MonsterTable {
    /// Orcs four times out of five, trolls otherwise.
    fn default() -> Self {
        Self::new(vec![
            MonsterTemplate {
                name: "Orc",
                glyph: 'o',
                color: Rgb::DESATURATED_GREEN,
                weight: 80,
                hp: 10,
                defense: 0,
                power: 3,
                xp_reward: 35,
            },
            MonsterTemplate {
                name: "Troll",
                glyph: 'T',
                color: Rgb::DARKER_GREEN,
                weight: 20,
                hp: 16,
                defense: 1,
                power: 4,
                xp_reward: 100,
            },
        ])
    }
}
