//! Adapters from terminal events to the game's direction and hold primitives.
//!
//! Keyboard, on-screen buttons and swipe gestures all end up as the same
//! [`KeyAction`] values.

pub mod gesture;
pub mod handler;
pub mod hold;

pub use gesture::SwipeTracker;
pub use handler::{ButtonMap, InputHandler, KeyAction};
pub use hold::RepeatHoldTracker;
