//! Direction and hold primitives shared by every input source.

use super::action::Direction;
use super::state::GameState;

/// Request a new heading.
///
/// The exact reverse of the current heading is ignored. Anything else takes
/// effect immediately and is used by the next tick. Returns whether the
/// request was accepted.
pub fn set_direction(state: &mut GameState, requested: Direction) -> bool {
    if let Some(current) = state.direction {
        if current.is_opposite(requested) {
            return false;
        }
    }
    state.direction = Some(requested);
    true
}

/// Mark a directional input as held or released.
pub fn set_held(state: &mut GameState, direction: Direction, held: bool) {
    if held {
        state.held.insert(direction);
    } else {
        state.held.remove(&direction);
    }
}

/// Press of a direction: change heading and, if accepted, count it as held.
pub fn press(state: &mut GameState, direction: Direction) -> bool {
    let accepted = set_direction(state, direction);
    if accepted {
        set_held(state, direction, true);
    }
    accepted
}

pub fn release_all(state: &mut GameState) {
    state.held.clear();
}
