//! # Item Generation
//!
//! The item table: potions and scrolls that can be found lying around.

use crate::game::{
    ConfuseParams, Entity, FireballParams, HealParams, Item, ItemEffect, LightningParams,
    Message, Position, RenderOrder, Rgb,
};
use crate::utils::random_choice_index;
use rand::Rng;

/// Look and behaviour of one item kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: Rgb,
    /// Relative spawn weight
    pub weight: u32,
    pub item: Item,
}

impl ItemTemplate {
    /// Creates an item of this kind lying at `position`.
    pub fn spawn(&self, position: Position) -> Entity {
        Entity::new(position, self.glyph, self.color, self.name, false, RenderOrder::Item)
            .with_item(self.item.clone())
    }
}

/// Weighted item table.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTable {
    templates: Vec<ItemTemplate>,
}

impl ItemTable {
    pub fn new(templates: Vec<ItemTemplate>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[ItemTemplate] {
        &self.templates
    }

    /// Finds a template by display name.
    pub fn find(&self, name: &str) -> Option<&ItemTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Rolls an item kind and spawns it at `position`.
    pub fn roll<R: Rng + ?Sized>(&self, position: Position, rng: &mut R) -> Option<Entity> {
        let weights: Vec<u32> = self.templates.iter().map(|t| t.weight).collect();
        random_choice_index(&weights, rng).map(|index| self.templates[index].spawn(position))
    }
}

impl Default for ItemTable {
    fn default() -> Self {
        Self::new(vec![
            ItemTemplate {
                name: "Healing Potion",
                glyph: '!',
                color: Rgb::VIOLET,
                weight: 70,
                item: Item::instant(ItemEffect::Heal(HealParams { amount: 4 })),
            },
            ItemTemplate {
                name: "Fireball Scroll",
                glyph: '#',
                color: Rgb::RED,
                weight: 10,
                item: Item::targeted(
                    ItemEffect::Fireball(FireballParams {
                        damage: 12,
                        radius: 3,
                    }),
                    Message::new(
                        "Left-click a target tile for the fireball, or right-click to cancel.",
                        Rgb::LIGHT_CYAN,
                    ),
                ),
            },
            ItemTemplate {
                name: "Confusion Scroll",
                glyph: '#',
                color: Rgb::LIGHT_PINK,
                weight: 10,
                item: Item::targeted(
                    ItemEffect::Confuse(ConfuseParams { turns: 10 }),
                    Message::new(
                        "Left-click an enemy to confuse it, or right-click to cancel.",
                        Rgb::LIGHT_CYAN,
                    ),
                ),
            },
            ItemTemplate {
                name: "Lightning Scroll",
                glyph: '#',
                color: Rgb::YELLOW,
                weight: 10,
                item: Item::instant(ItemEffect::Lightning(LightningParams {
                    damage: 20,
                    maximum_range: 5,
                })),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_targeting_flags() {
        let table = ItemTable::default();
        assert!(!table.find("Healing Potion").unwrap().item.targeting);
        assert!(table.find("Fireball Scroll").unwrap().item.targeting);
        assert!(table.find("Confusion Scroll").unwrap().item.targeting);
        assert!(!table.find("Lightning Scroll").unwrap().item.targeting);
        assert!(table
            .templates()
            .iter()
            .filter(|t| t.item.targeting)
            .all(|t| t.item.targeting_message.is_some()));
    }

    #[test]
    fn test_spawned_items_do_not_block() {
        let table = ItemTable::default();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..30 {
            let item = table.roll(Position::new(4, 4), &mut rng).unwrap();
            assert!(!item.blocks_movement);
            assert_eq!(item.render_order, RenderOrder::Item);
            assert!(item.item.is_some());
            assert!(item.fighter.is_none());
        }
    }

    #[test]
    fn test_potions_are_most_common() {
        let table = ItemTable::default();
        let mut rng = StdRng::seed_from_u64(8);
        let potions = (0..1000)
            .filter_map(|_| table.roll(Position::new(0, 0), &mut rng))
            .filter(|item| item.name == "Healing Potion")
            .count();
        assert!(potions > 600 && potions < 800);
    }
}
