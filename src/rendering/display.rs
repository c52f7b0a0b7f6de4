//! # Display Management
//!
//! Draws a floor as coloured ASCII cells with macroquad: the map, the
//! entities standing on it, and a bottom panel with the HP bar, the dungeon
//! depth, the names under the mouse and the message log.

use crate::game::{capitalize, Entity, GameState, Position, RenderOrder, Rgb};
use crate::rendering::ui;
use crate::DelverResult;
use macroquad::prelude::*;

/// Height of the bottom status panel, in cells.
pub const PANEL_HEIGHT: i32 = 7;
/// Width of the HP bar, in cells.
pub const BAR_WIDTH: i32 = 20;

/// Converts a core colour to a macroquad colour.
pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, 255)
}

/// Macroquad display manager for the game.
///
/// The map is drawn through a viewport that follows the player when the
/// floor is larger than the window.
pub struct MacroquadDisplay {
    /// Screen width in pixels
    pub screen_width: f32,
    /// Screen height in pixels
    pub screen_height: f32,
    /// Cell size in pixels
    pub tile_size: f32,
    /// Map viewport offset x in tiles
    pub viewport_x: i32,
    /// Map viewport offset y in tiles
    pub viewport_y: i32,
    /// Map viewport width in tiles
    pub map_width: i32,
    /// Map viewport height in tiles
    pub map_height: i32,
}

impl MacroquadDisplay {
    /// Creates a display sized to the current window.
    pub fn new(tile_size: f32) -> Self {
        let mut display = Self {
            screen_width: 0.0,
            screen_height: 0.0,
            tile_size,
            viewport_x: 0,
            viewport_y: 0,
            map_width: 0,
            map_height: 0,
        };
        display.resize(screen_width(), screen_height());
        display
    }

    /// Recomputes the viewport size after the window changed.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;
        self.map_width = ((width / self.tile_size) as i32).max(1);
        self.map_height = ((height / self.tile_size) as i32 - PANEL_HEIGHT).max(1);
    }

    /// Maps a pixel position to the map tile under it.
    pub fn screen_to_tile(&self, x: f32, y: f32) -> Position {
        Position::new(
            self.viewport_x + (x / self.tile_size).floor() as i32,
            self.viewport_y + (y / self.tile_size).floor() as i32,
        )
    }

    /// Centres the viewport on `position`, clamped to the floor edges.
    pub fn center_viewport_on_position(&mut self, position: Position, width: i32, height: i32) {
        self.viewport_x = clamp_axis(position.x - self.map_width / 2, width, self.map_width);
        self.viewport_y = clamp_axis(position.y - self.map_height / 2, height, self.map_height);
    }

    /// Renders the complete game screen, including any open menu.
    ///
    /// Visibility must be fresh; call [`GameState::refresh_visibility`]
    /// first.
    pub fn render_game(&mut self, game_state: &GameState) -> DelverResult<()> {
        if screen_width() != self.screen_width || screen_height() != self.screen_height {
            self.resize(screen_width(), screen_height());
        }
        let player_pos = game_state.player_position()?;
        self.center_viewport_on_position(player_pos, game_state.map.width, game_state.map.height);

        clear_background(BLACK);
        self.render_map(game_state);
        self.render_entities(game_state);
        self.render_panel(game_state)?;
        ui::render_state_overlay(game_state, self.tile_size)?;
        Ok(())
    }

    fn render_map(&self, game_state: &GameState) {
        for screen_y in 0..self.map_height {
            for screen_x in 0..self.map_width {
                let world_pos =
                    Position::new(self.viewport_x + screen_x, self.viewport_y + screen_y);
                let Some(tile) = game_state.map.get_tile(world_pos) else {
                    continue;
                };

                let visible = game_state.is_visible(world_pos);
                let color = match (visible, tile.block_sight) {
                    (true, true) => Rgb::LIGHT_WALL,
                    (true, false) => Rgb::LIGHT_GROUND,
                    (false, true) if tile.explored => Rgb::DARK_WALL,
                    (false, false) if tile.explored => Rgb::DARK_GROUND,
                    // Unexplored tiles stay black
                    _ => continue,
                };

                draw_rectangle(
                    screen_x as f32 * self.tile_size,
                    screen_y as f32 * self.tile_size,
                    self.tile_size,
                    self.tile_size,
                    to_color(color),
                );
            }
        }
    }

    fn render_entities(&self, game_state: &GameState) {
        let mut drawable: Vec<&Entity> = game_state
            .entities
            .iter()
            .map(|(_, entity)| entity)
            .filter(|entity| is_drawable(game_state, entity))
            .collect();
        drawable.sort_by_key(|entity| entity.render_order);

        for entity in drawable {
            let screen_x = entity.position.x - self.viewport_x;
            let screen_y = entity.position.y - self.viewport_y;
            if screen_x < 0
                || screen_y < 0
                || screen_x >= self.map_width
                || screen_y >= self.map_height
            {
                continue;
            }
            self.draw_glyph(
                entity.glyph,
                screen_x as f32 * self.tile_size,
                screen_y as f32 * self.tile_size,
                to_color(entity.color),
            );
        }
    }

    fn draw_glyph(&self, glyph: char, x: f32, y: f32, color: Color) {
        let mut buffer = [0u8; 4];
        let text: &str = glyph.encode_utf8(&mut buffer);
        let dims = measure_text(text, None, self.tile_size as u16, 1.0);
        draw_text(
            text,
            x + (self.tile_size - dims.width) / 2.0,
            y + self.tile_size - (self.tile_size - dims.height) / 2.0,
            self.tile_size,
            color,
        );
    }

    /// Renders the bottom panel: hover names, HP bar, depth and the log.
    fn render_panel(&self, game_state: &GameState) -> DelverResult<()> {
        let panel_y = self.map_height as f32 * self.tile_size;
        draw_rectangle(
            0.0,
            panel_y,
            self.screen_width,
            PANEL_HEIGHT as f32 * self.tile_size,
            BLACK,
        );

        let (mouse_x, mouse_y) = mouse_position();
        let hovered = self.screen_to_tile(mouse_x, mouse_y);
        draw_text(
            &names_under_mouse(game_state, hovered),
            self.tile_size,
            panel_y + self.tile_size * 0.8,
            self.tile_size,
            LIGHTGRAY,
        );

        let player = game_state.player()?;
        if let Some(fighter) = &player.fighter {
            self.render_bar(
                self.tile_size,
                panel_y + self.tile_size,
                "HP",
                fighter.hp,
                fighter.max_hp,
            );
        }
        draw_text(
            &format!("Dungeon level: {}", game_state.map.depth),
            self.tile_size,
            panel_y + self.tile_size * 3.5,
            self.tile_size,
            WHITE,
        );
        if let Some(level) = &player.level {
            draw_text(
                &format!("Character level: {}", level.current_level),
                self.tile_size,
                panel_y + self.tile_size * 4.5,
                self.tile_size,
                WHITE,
            );
        }

        let log_x = (BAR_WIDTH + 2) as f32 * self.tile_size;
        for (row, message) in game_state.message_log.iter().enumerate() {
            draw_text(
                &message.text,
                log_x,
                panel_y + (row as f32 + 1.0) * self.tile_size,
                self.tile_size,
                to_color(message.color),
            );
        }
        Ok(())
    }

    fn render_bar(&self, x: f32, y: f32, name: &str, value: i32, maximum: i32) {
        let total_width = BAR_WIDTH as f32 * self.tile_size;
        let filled = if maximum > 0 {
            total_width * value.clamp(0, maximum) as f32 / maximum as f32
        } else {
            0.0
        };

        draw_rectangle(x, y, total_width, self.tile_size, to_color(Rgb::DARK_RED));
        if filled > 0.0 {
            draw_rectangle(x, y, filled, self.tile_size, to_color(Rgb::RED));
        }

        let label = format!("{name}: {value}/{maximum}");
        let dims = measure_text(&label, None, self.tile_size as u16, 1.0);
        draw_text(
            &label,
            x + (total_width - dims.width) / 2.0,
            y + self.tile_size * 0.8,
            self.tile_size,
            WHITE,
        );
    }
}

/// Entities are drawn while in view; stairs stay drawn once explored.
fn is_drawable(game_state: &GameState, entity: &Entity) -> bool {
    game_state.is_visible(entity.position)
        || (entity.render_order == RenderOrder::Stairs
            && game_state.map.is_explored(entity.position))
}

/// Comma-separated names of the visible entities on `position`.
pub fn names_under_mouse(game_state: &GameState, position: Position) -> String {
    if !game_state.is_visible(position) {
        return String::new();
    }
    game_state
        .entities
        .entities_at(position)
        .into_iter()
        .filter_map(|id| game_state.entities.get(id))
        .map(|entity| capitalize(&entity.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn clamp_axis(offset: i32, world: i32, view: i32) -> i32 {
    if world <= view {
        0
    } else {
        offset.clamp(0, world - view)
    }
}
