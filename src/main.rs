use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use smooth_snake::game::{Difficulty, GameConfig};
use smooth_snake::modes::HumanMode;
use smooth_snake::services::{HighScoreStore, JsonFileStore, MemoryStore};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smooth_snake")]
#[command(version, about = "Snake with smooth, interpolated movement")]
struct Cli {
    /// Cells per side of the square board
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(4..=60))]
    tile_count: u16,

    /// Initial speed; can be changed on the start and game-over screens
    #[arg(long, default_value = "medium")]
    difficulty: Speed,

    /// File that keeps the high score between sessions
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_save: bool,

    /// Start with sound off
    #[arg(long)]
    mute: bool,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Speed {
    /// 200 ms per cell
    Easy,
    /// 150 ms per cell
    Medium,
    /// 100 ms per cell
    Hard,
    /// 50 ms per cell
    Insane,
}

impl From<Speed> for Difficulty {
    fn from(speed: Speed) -> Self {
        match speed {
            Speed::Easy => Difficulty::Easy,
            Speed::Medium => Difficulty::Medium,
            Speed::Hard => Difficulty::Hard,
            Speed::Insane => Difficulty::Insane,
        }
    }
}

/// The terminal belongs to the TUI, so logs only go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    // Create game configuration from CLI arguments
    let config = GameConfig::new(cli.tile_count as usize).with_difficulty(cli.difficulty.into());

    let store: Box<dyn HighScoreStore> = if cli.no_save {
        Box::new(MemoryStore::default())
    } else {
        Box::new(JsonFileStore::new(cli.high_score_file))
    };

    let mut human_mode = HumanMode::new(config, store, !cli.mute);
    human_mode.run().await?;

    Ok(())
}
