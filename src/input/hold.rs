use std::collections::{HashMap, HashSet};

use crate::game::Direction;

/// Infers held keys on terminals that never report key releases.
///
/// Without release events the only sign of a held key is the auto-repeat
/// stream: presses of the same key arriving closer together than `window_ms`.
/// A hold ends once the repeats stop for longer than the window.
#[derive(Debug, Clone)]
pub struct RepeatHoldTracker {
    window_ms: f64,
    last_press: HashMap<Direction, f64>,
    held: HashSet<Direction>,
}

impl RepeatHoldTracker {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            last_press: HashMap::new(),
            held: HashSet::new(),
        }
    }

    /// Record a press at `now_ms`; returns true when it continues a repeat stream
    pub fn on_press(&mut self, direction: Direction, now_ms: f64) -> bool {
        let repeating = self
            .last_press
            .get(&direction)
            .is_some_and(|&t| now_ms - t <= self.window_ms);
        self.last_press.insert(direction, now_ms);
        if repeating {
            self.held.insert(direction);
        }
        repeating
    }

    /// Holds whose repeat stream has gone quiet, removed from the tracker
    pub fn expire(&mut self, now_ms: f64) -> Vec<Direction> {
        let stale: Vec<Direction> = self
            .held
            .iter()
            .copied()
            .filter(|d| {
                self.last_press
                    .get(d)
                    .map_or(true, |&t| now_ms - t > self.window_ms)
            })
            .collect();
        for direction in &stale {
            self.held.remove(direction);
        }
        stale
    }

    pub fn clear(&mut self) {
        self.last_press.clear();
        self.held.clear();
    }
}

impl Default for RepeatHoldTracker {
    fn default() -> Self {
        Self::new(120.0)
    }
}
