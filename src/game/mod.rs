//! Core game logic module for Snake
//!
//! This module contains the simulation, the fixed-step timing and the render
//! interpolation without any I/O or rendering dependencies. The frame loop in
//! `modes` owns a single [`GameState`] and hands it to [`GameEngine`] once per
//! frame.

pub mod action;
pub mod config;
pub mod control;
pub mod engine;
pub mod interpolate;
pub mod state;
pub mod timing;

// Re-export commonly used types
pub use action::Direction;
pub use config::{Difficulty, GameConfig};
pub use engine::{FrameReport, GameEngine, TickOutcome};
pub use interpolate::{smoothstep, update_render_positions};
pub use state::{CollisionType, EndReason, GameState, Phase, Position, Segment, Snake};
pub use timing::TimingController;
