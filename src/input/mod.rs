//! # Input Module
//!
//! Decodes keyboard and mouse input into [`Intent`]s. Which keys mean what
//! depends on the active [`TurnState`]: letters move the player during its
//! turn but pick inventory slots while a menu is open.

pub mod commands;

pub use commands::*;

use crate::game::{Position, TurnState};
use macroquad::prelude::*;

/// Input handler for processing player commands.
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjklyubn)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::InputHandler;
    ///
    /// let input_handler = InputHandler::new();
    /// assert!(input_handler.vi_keys_enabled);
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Reads this frame's input. At most one intent is produced per frame.
    ///
    /// `to_tile` maps a mouse position in pixels to a map position.
    pub fn poll(&self, state: TurnState, to_tile: impl Fn(f32, f32) -> Position) -> Option<Intent> {
        let alt = is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt);

        let mut intent = None;
        for key in get_keys_pressed() {
            if let Some(decoded) = intent_for_key(state, key, alt) {
                intent = Some(decoded);
                break;
            }
        }

        // Drain the character queue every frame so stale characters never
        // leak into a later menu
        while let Some(character) = get_char_pressed() {
            if intent.is_none() {
                intent = self.intent_for_char(state, character);
            }
        }

        if intent.is_none() && state == TurnState::Targeting {
            let (x, y) = mouse_position();
            if is_mouse_button_pressed(MouseButton::Left) {
                intent = Some(Intent::TargetingClick {
                    kind: ClickKind::Left,
                    position: to_tile(x, y),
                });
            } else if is_mouse_button_pressed(MouseButton::Right) {
                intent = Some(Intent::TargetingClick {
                    kind: ClickKind::Right,
                    position: to_tile(x, y),
                });
            }
        }

        intent
    }

    /// Decodes a typed character.
    pub fn intent_for_char(&self, state: TurnState, character: char) -> Option<Intent> {
        match state {
            TurnState::PlayersTurn => match character {
                'g' | ',' => Some(Intent::Pickup),
                'i' => Some(Intent::ShowInventory),
                'd' => Some(Intent::DropInventory),
                '>' => Some(Intent::TakeStairs),
                _ if self.vi_keys_enabled => vi_move(character),
                _ => None,
            },
            TurnState::ShowInventory | TurnState::DropInventory => {
                inventory_index(character).map(Intent::InventoryIndex)
            }
            TurnState::LevelUp => match character {
                'a' => Some(Intent::LevelUp(LevelUpChoice::Constitution)),
                'b' => Some(Intent::LevelUp(LevelUpChoice::Strength)),
                'c' => Some(Intent::LevelUp(LevelUpChoice::Agility)),
                _ => None,
            },
            TurnState::EnemyTurn | TurnState::PlayerDead | TurnState::Targeting => None,
        }
    }
}

/// Decodes a non-character key.
pub fn intent_for_key(state: TurnState, key: KeyCode, alt: bool) -> Option<Intent> {
    match key {
        KeyCode::Enter if alt => return Some(Intent::ToggleFullscreen),
        KeyCode::Escape => return Some(Intent::Exit),
        _ => {}
    }

    if state != TurnState::PlayersTurn {
        return None;
    }
    match key {
        KeyCode::Up => Some(Intent::step(0, -1)),
        KeyCode::Down => Some(Intent::step(0, 1)),
        KeyCode::Left => Some(Intent::step(-1, 0)),
        KeyCode::Right => Some(Intent::step(1, 0)),
        KeyCode::Enter | KeyCode::KpEnter => Some(Intent::TakeStairs),
        _ => None,
    }
}

fn vi_move(character: char) -> Option<Intent> {
    let (dx, dy) = match character {
        'k' => (0, -1),
        'j' => (0, 1),
        'h' => (-1, 0),
        'l' => (1, 0),
        'y' => (-1, -1),
        'u' => (1, -1),
        'b' => (-1, 1),
        'n' => (1, 1),
        _ => return None,
    };
    Some(Intent::step(dx, dy))
}

/// Maps `a`..`z` to inventory slots 0..25.
pub fn inventory_index(character: char) -> Option<usize> {
    if character.is_ascii_lowercase() {
        Some(character as usize - 'a' as usize)
    } else {
        None
    }
}
