//! Per-frame render positions between two logical ticks.

use super::action::Direction;
use super::state::Snake;

/// Smoothstep easing, `t²(3 − 2t)`, for `t` in `[0, 1]`
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Move every segment's render position toward its target by the eased `progress`.
///
/// The head heads for the next cell in `direction`; each other segment heads
/// for the cell of the segment ahead of it. Without a direction nothing moves.
pub fn update_render_positions(snake: &mut Snake, direction: Option<Direction>, progress: f64) {
    let Some(direction) = direction else {
        return;
    };
    let eased = smoothstep(progress);

    let mut target = snake.head().moved_in_direction(direction);
    for segment in snake.body.iter_mut() {
        let cell = segment.cell;
        segment.render_x = lerp(cell.x as f64, target.x as f64, eased);
        segment.render_y = lerp(cell.y as f64, target.y as f64, eased);
        target = cell;
    }
}
