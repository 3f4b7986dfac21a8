//! Collaborators the game notifies but never depends on.

pub mod audio;
pub mod high_score;

pub use audio::{AudioNotifier, Muted, TerminalBell};
pub use high_score::{HighScoreStore, JsonFileStore, MemoryStore};
