//! # Delver
//!
//! A turn-based dungeon crawler: explore procedurally generated floors, fight
//! monsters, collect scrolls and potions, and descend as deep as you can.
//!
//! ## Architecture Overview
//!
//! The crate is split between a deterministic core and thin frontends:
//!
//! - **Game State**: `GameState` owns the map, the entity arena, the message
//!   log and the turn-state stack, and resolves one [`Intent`] at a time
//! - **Entity Model**: plain entities with optional components (fighter, AI,
//!   item, inventory, level, stairs) stored in an index-stable arena
//! - **Result Events**: every component operation reports its outcome as a
//!   list of [`ResultEvent`]s that the turn engine folds into the world
//! - **Generation System**: room-and-corridor floors populated from weighted
//!   monster and item tables
//! - **Frontends**: macroquad input decoding and ASCII rendering, kept out of
//!   the core so the engine can be driven headless in tests

pub mod config;
pub mod game;
pub mod generation;
pub mod input;
pub mod persistence;
pub mod rendering;
pub mod scenes;
pub mod utils;

// Core module re-exports
pub use config::*;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use persistence::*;
pub use utils::*;

pub use rendering::MacroquadDisplay;
pub use scenes::SceneManager;

/// Core error type for the Delver game engine.
#[derive(thiserror::Error, Debug)]
pub enum DelverError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Settings that cannot produce a playable game
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type used throughout the Delver codebase.
pub type DelverResult<T> = Result<T, DelverError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
