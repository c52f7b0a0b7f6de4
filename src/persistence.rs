//! # Save Games
//!
//! A single save slot stored as pretty-printed JSON. A missing file is a
//! normal condition reported as `Ok(None)`, so the menu can offer a new game.

use crate::game::GameState;
use crate::DelverResult;
use std::path::{Path, PathBuf};

/// Default save file name, relative to the working directory.
pub const DEFAULT_SAVE_FILE: &str = "savegame.json";

/// File-backed save slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes the whole game to the save file, replacing any earlier save.
    pub fn save(&self, state: &GameState) -> DelverResult<()> {
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)?;
        log::info!("Saved game to {}", self.path.display());
        Ok(())
    }

    /// Reads the save file. Returns `Ok(None)` when there is none.
    pub fn load(&self) -> DelverResult<Option<GameState>> {
        if !self.exists() {
            log::info!("No save game at {}", self.path.display());
            return Ok(None);
        }

        let json = std::fs::read_to_string(&self.path)?;
        let mut state: GameState = serde_json::from_str(&json)?;
        state.restore_runtime();
        log::info!("Loaded game from {}", self.path.display());
        Ok(Some(state))
    }

    /// Removes the save file if present.
    pub fn delete(&self) -> DelverResult<()> {
        if self.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SaveStore {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_FILE)
    }
}
