//! # User Interface Elements
//!
//! Lettered menus drawn over the map: inventory, drop, level-up and the main
//! menu. The menu text is built by plain functions so it can be checked
//! without a window.

use crate::game::{Entity, GameState, TurnState};
use crate::input::LevelUpChoice;
use crate::rendering::display::to_color;
use crate::DelverResult;
use crate::Rgb;
use macroquad::prelude::*;

/// Most entries a lettered menu can show.
pub const MAX_MENU_OPTIONS: usize = 26;

/// Prefixes each option with its selection letter.
///
/// # Examples
///
/// ```
/// use delver::rendering::lettered_options;
///
/// let lines = lettered_options(&["Sword".to_string(), "Shield".to_string()]);
/// assert_eq!(lines, vec!["(a) Sword", "(b) Shield"]);
/// ```
pub fn lettered_options(options: &[String]) -> Vec<String> {
    options
        .iter()
        .take(MAX_MENU_OPTIONS)
        .zip('a'..='z')
        .map(|(option, letter)| format!("({letter}) {option}"))
        .collect()
}

/// Names of the items an entity carries, in slot order.
pub fn inventory_options(entity: &Entity) -> Vec<String> {
    match &entity.inventory {
        Some(inventory) if !inventory.is_empty() => inventory
            .items
            .iter()
            .map(|item| item.name.clone())
            .collect(),
        _ => vec!["Inventory is empty.".to_string()],
    }
}

/// Level-up entries with the player's current values.
pub fn level_up_options(player: &Entity) -> Vec<String> {
    let Some(fighter) = &player.fighter else {
        return LevelUpChoice::all()
            .iter()
            .map(|choice| choice.label().to_string())
            .collect();
    };
    LevelUpChoice::all()
        .iter()
        .map(|choice| {
            let current = match choice {
                LevelUpChoice::Constitution => fighter.max_hp,
                LevelUpChoice::Strength => fighter.power,
                LevelUpChoice::Agility => fighter.defense,
            };
            format!("{}, from {current}", choice.label())
        })
        .collect()
}

/// Draws the menu belonging to the active turn state, if any.
pub fn render_state_overlay(game_state: &GameState, tile_size: f32) -> DelverResult<()> {
    match game_state.current_state() {
        TurnState::ShowInventory => {
            let options = inventory_options(game_state.player()?);
            render_menu(
                "Press the key next to an item to use it, or Esc to cancel.",
                &options,
                50,
                tile_size,
            );
        }
        TurnState::DropInventory => {
            let options = inventory_options(game_state.player()?);
            render_menu(
                "Press the key next to an item to drop it, or Esc to cancel.",
                &options,
                50,
                tile_size,
            );
        }
        TurnState::LevelUp => {
            let options = level_up_options(game_state.player()?);
            render_menu("Level up! Choose a stat to raise:", &options, 40, tile_size);
        }
        TurnState::Targeting => {
            let (x, y) = mouse_position();
            let cell_x = (x / tile_size).floor() * tile_size;
            let cell_y = (y / tile_size).floor() * tile_size;
            draw_rectangle_lines(cell_x, cell_y, tile_size, tile_size, 2.0, to_color(Rgb::LIGHT_CYAN));
        }
        TurnState::PlayerDead => {
            render_message_box("You died! Press Esc to leave.", 30, tile_size);
        }
        TurnState::PlayersTurn | TurnState::EnemyTurn => {}
    }
    Ok(())
}

/// Draws a centred menu `width` cells wide.
pub fn render_menu(header: &str, options: &[String], width: usize, tile_size: f32) {
    let header_lines = textwrap::wrap(header, width.max(1));
    let lines = lettered_options(options);
    let rows = header_lines.len() + lines.len() + 1;

    let box_width = width as f32 * tile_size;
    let box_height = rows as f32 * tile_size;
    let x = (screen_width() - box_width) / 2.0;
    let y = (screen_height() - box_height) / 2.0;

    draw_rectangle(x, y, box_width, box_height, Color::new(0.0, 0.0, 0.0, 0.85));
    let mut baseline = y + tile_size;
    for line in &header_lines {
        draw_text(line, x, baseline, tile_size, WHITE);
        baseline += tile_size;
    }
    baseline += tile_size;
    for line in &lines {
        draw_text(line, x, baseline, tile_size, WHITE);
        baseline += tile_size;
    }
}

/// A menu with no options.
pub fn render_message_box(text: &str, width: usize, tile_size: f32) {
    render_menu(text, &[], width, tile_size);
}

/// Draws the title screen.
pub fn render_main_menu(show_missing_save: bool, tile_size: f32) {
    clear_background(BLACK);

    let title = "DELVER";
    let title_size = tile_size * 2.0;
    let dims = measure_text(title, None, title_size as u16, 1.0);
    draw_text(
        title,
        (screen_width() - dims.width) / 2.0,
        screen_height() / 2.0 - tile_size * 6.0,
        title_size,
        to_color(Rgb::LIGHT_WALL),
    );

    let options = [
        "Play a new game".to_string(),
        "Continue last game".to_string(),
        "Quit".to_string(),
    ];
    render_menu("", &options, 24, tile_size);

    if show_missing_save {
        let text = "No save game to load.";
        let dims = measure_text(text, None, tile_size as u16, 1.0);
        draw_text(
            text,
            (screen_width() - dims.width) / 2.0,
            screen_height() / 2.0 + tile_size * 4.0,
            tile_size,
            to_color(Rgb::YELLOW),
        );
    }
}
