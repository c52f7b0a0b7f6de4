//! # Delver Main Entry Point
//!
//! Parses the command line, loads the settings, sets up logging and hands
//! control to the scene manager.

use clap::Parser;
use delver::{DelverResult, GameConfig, SaveStore, SceneManager, DEFAULT_SAVE_FILE};
use macroquad::prelude::*;
use std::path::PathBuf;

/// Command line arguments for Delver.
#[derive(Parser, Debug)]
#[command(name = "delver")]
#[command(about = "A turn-based dungeon crawler")]
#[command(version)]
struct Args {
    /// Random seed for the first new game's dungeon
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON settings file; missing fields use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the game is saved on exit
    #[arg(long, default_value = DEFAULT_SAVE_FILE)]
    save_file: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Delver".to_string(),
        window_width: 1280,
        window_height: 800,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() -> DelverResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);
    log::info!("Starting Delver v{}", delver::VERSION);

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.validate()?;

    let mut scenes = SceneManager::new(config, args.seed, SaveStore::new(args.save_file));
    scenes.run().await
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        tracing::info!("tracing subscriber installed");
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .parse_default_env()
            .init();
    }
}
