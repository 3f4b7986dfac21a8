//! Smooth Snake - a terminal Snake game with interpolated movement
//!
//! This library provides:
//! - Core game logic: fixed-step simulation, timing and interpolation (game module)
//! - Keyboard, on-screen button and swipe input adapters (input module)
//! - TUI rendering (render module)
//! - Audio cues and high-score persistence (services module)
//! - The interactive frame loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod services;
