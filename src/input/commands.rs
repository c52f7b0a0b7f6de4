//! # Command Definitions
//!
//! The abstract intents the turn engine accepts, independent of any keyboard
//! or mouse.

use crate::game::Position;
use serde::{Deserialize, Serialize};

/// Mouse button used in targeting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickKind {
    /// Confirm the target
    Left,
    /// Cancel targeting
    Right,
}

/// Stat boost offered on level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelUpChoice {
    /// +20 max HP, and heal 20
    Constitution,
    /// +1 attack
    Strength,
    /// +1 defense
    Agility,
}

impl LevelUpChoice {
    /// Menu entries, in display order.
    pub fn all() -> [LevelUpChoice; 3] {
        [
            LevelUpChoice::Constitution,
            LevelUpChoice::Strength,
            LevelUpChoice::Agility,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            LevelUpChoice::Constitution => "Constitution (+20 HP)",
            LevelUpChoice::Strength => "Strength (+1 attack)",
            LevelUpChoice::Agility => "Agility (+1 defense)",
        }
    }
}

/// One decoded player request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Move { dx: i32, dy: i32 },
    Pickup,
    ShowInventory,
    DropInventory,
    /// Inventory slot chosen from a menu
    InventoryIndex(usize),
    TakeStairs,
    LevelUp(LevelUpChoice),
    TargetingClick { kind: ClickKind, position: Position },
    ToggleFullscreen,
    Exit,
}

impl Intent {
    /// Convenience constructor for movement.
    pub fn step(dx: i32, dy: i32) -> Self {
        Intent::Move { dx, dy }
    }
}
