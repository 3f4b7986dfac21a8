use crate::game::Direction;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// Turns a mouse press/release pair into a swipe direction
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
    /// Minimum travel, in row heights, for a release to count as a swipe
    threshold: f64,
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            start: None,
            threshold,
        }
    }

    pub fn begin(&mut self, column: u16, row: u16) {
        self.start = Some((column, row));
    }

    /// Finish the gesture; short drags and releases without a press yield nothing
    pub fn end(&mut self, column: u16, row: u16) -> Option<Direction> {
        let (start_col, start_row) = self.start.take()?;
        let dx = (column as f64 - start_col as f64) / CELL_ASPECT;
        let dy = row as f64 - start_row as f64;

        if dx.abs() < self.threshold && dy.abs() < self.threshold {
            return None;
        }

        if dx.abs() > dy.abs() {
            Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
        } else {
            Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(2.0)
    }
}
