use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::Position;

/// Selectable tick interval of the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    /// Milliseconds per logical tick
    pub fn tick_ms(&self) -> u32 {
        match self {
            Difficulty::Easy => 200,
            Difficulty::Medium => 150,
            Difficulty::Hard => 100,
            Difficulty::Insane => 50,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Insane => "Insane",
        }
    }

    /// Menu slot, `1..=4`
    pub fn from_menu_key(key: char) -> Option<Difficulty> {
        key.to_digit(10)
            .and_then(|d| d.checked_sub(1))
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ms)", self.name(), self.tick_ms())
    }
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cells per side of the square board
    pub tile_count: usize,
    /// Selected tick interval, kept across restarts
    pub difficulty: Difficulty,
    /// Divisor applied to the tick interval while a direction is held
    pub acceleration_multiplier: f64,
    /// Interval of the render loop, in milliseconds
    pub frame_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 20,
            difficulty: Difficulty::Medium,
            acceleration_multiplier: 2.5,
            frame_interval_ms: 16,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            ..Default::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Base tick interval of the selected difficulty, in milliseconds
    pub fn base_speed_ms(&self) -> f64 {
        self.difficulty.tick_ms() as f64
    }

    /// Cell the snake starts on
    pub fn start_position(&self) -> Position {
        let center = (self.tile_count / 2) as i32;
        Position::new(center, center)
    }
}
