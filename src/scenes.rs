//! # Scene Management System
//!
//! The title menu and the playing scene, and the frame loop that switches
//! between them. The playing scene turns decoded input into intents for the
//! [`GameState`] and saves when the player leaves.

use crate::rendering::ui;
use crate::{
    DelverResult, EngineSignal, GameConfig, GameState, InputHandler, MacroquadDisplay, SaveStore,
};
use macroquad::prelude::*;

/// Cell size used for both the map and the menus, in pixels.
pub const TILE_SIZE: f32 = 16.0;

/// Represents the current scene in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneType {
    MainMenu,
    Playing,
}

/// A main menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    NewGame,
    Continue,
    Quit,
}

impl MenuChoice {
    /// Decodes a key typed on the title screen.
    pub fn from_char(character: char) -> Option<Self> {
        match character {
            'a' => Some(MenuChoice::NewGame),
            'b' => Some(MenuChoice::Continue),
            'c' => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

/// The main scene manager that coordinates all game scenes
pub struct SceneManager {
    current_scene: SceneType,
    game_state: Option<GameState>,
    display: MacroquadDisplay,
    input_handler: InputHandler,
    config: GameConfig,
    seed: Option<u64>,
    save_store: SaveStore,
    /// "Continue" was chosen but there was nothing to load
    show_missing_save: bool,
    fullscreen: bool,
}

impl SceneManager {
    /// Creates a scene manager showing the main menu.
    ///
    /// `seed` fixes the first new game's dungeon; later new games draw a
    /// fresh seed.
    pub fn new(config: GameConfig, seed: Option<u64>, save_store: SaveStore) -> Self {
        Self {
            current_scene: SceneType::MainMenu,
            game_state: None,
            display: MacroquadDisplay::new(TILE_SIZE),
            input_handler: InputHandler::new(),
            config,
            seed,
            save_store,
            show_missing_save: false,
            fullscreen: false,
        }
    }

    /// Runs the main scene loop until the game exits
    pub async fn run(&mut self) -> DelverResult<()> {
        loop {
            let exit = match self.current_scene {
                SceneType::MainMenu => self.update_main_menu()?,
                SceneType::Playing => self.update_playing_scene()?,
            };
            if exit {
                break;
            }
            next_frame().await;
        }
        log::info!("Leaving the game");
        Ok(())
    }

    /// Updates the title screen, returns true if exit is requested
    fn update_main_menu(&mut self) -> DelverResult<bool> {
        let mut choice = None;
        while let Some(character) = get_char_pressed() {
            if choice.is_none() {
                choice = MenuChoice::from_char(character);
            }
        }
        if is_key_pressed(KeyCode::Escape) {
            choice = Some(MenuChoice::Quit);
        }

        match choice {
            Some(MenuChoice::NewGame) => self.start_new_game()?,
            Some(MenuChoice::Continue) => self.continue_game()?,
            Some(MenuChoice::Quit) => return Ok(true),
            None => {}
        }

        if self.current_scene == SceneType::MainMenu {
            ui::render_main_menu(self.show_missing_save, TILE_SIZE);
        }
        Ok(false)
    }

    fn start_new_game(&mut self) -> DelverResult<()> {
        let seed = self.seed.take().unwrap_or_else(::rand::random);
        log::info!("Starting new game with seed {seed}");

        self.game_state = Some(GameState::new(self.config.clone(), seed)?);
        self.show_missing_save = false;
        self.current_scene = SceneType::Playing;
        Ok(())
    }

    fn continue_game(&mut self) -> DelverResult<()> {
        match self.save_store.load()? {
            Some(state) => {
                self.game_state = Some(state);
                self.show_missing_save = false;
                self.current_scene = SceneType::Playing;
            }
            None => self.show_missing_save = true,
        }
        Ok(())
    }

    /// Updates the playing scene, returns true if exit is requested
    fn update_playing_scene(&mut self) -> DelverResult<bool> {
        let Some(game_state) = self.game_state.as_mut() else {
            self.current_scene = SceneType::MainMenu;
            return Ok(false);
        };

        game_state.refresh_visibility()?;
        let display = &self.display;
        let intent = self
            .input_handler
            .poll(game_state.current_state(), |x, y| display.screen_to_tile(x, y));

        if let Some(intent) = intent {
            match game_state.handle_intent(intent)? {
                EngineSignal::Continue => {}
                EngineSignal::ToggleFullscreen => {
                    self.fullscreen = !self.fullscreen;
                    set_fullscreen(self.fullscreen);
                }
                EngineSignal::ExitRequested => {
                    self.save_store.save(game_state)?;
                    self.game_state = None;
                    self.current_scene = SceneType::MainMenu;
                    return Ok(false);
                }
            }
        }

        game_state.refresh_visibility()?;
        self.display.render_game(game_state)?;
        Ok(false)
    }
}
