use std::collections::HashSet;

use super::action::Direction;
use super::timing::TimingController;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// One link of the snake.
///
/// `cell` only changes on a simulation tick; `render_x`/`render_y` are
/// recomputed every frame by the interpolation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub cell: Position,
    pub render_x: f64,
    pub render_y: f64,
}

impl Segment {
    /// Segment drawn exactly on its cell
    pub fn at(cell: Position) -> Self {
        Self {
            cell,
            render_x: cell.x as f64,
            render_y: cell.y as f64,
        }
    }

    pub fn render_position(&self) -> (f64, f64) {
        (self.render_x, self.render_y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Segment>,
}

impl Snake {
    /// Create a one-segment snake
    pub fn new(head: Position) -> Self {
        Self {
            body: vec![Segment::at(head)],
        }
    }

    /// Create a snake from cells, head first
    pub fn from_cells(cells: &[Position]) -> Self {
        Self {
            body: cells.iter().copied().map(Segment::at).collect(),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0].cell
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1].cell
    }

    /// Logical cells, head first
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().map(|s| s.cell)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body[1..].iter().any(|s| s.cell == pos)
    }

    /// Check if any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.iter().any(|s| s.cell == pos)
    }

    /// Insert a new head whose render position already equals its cell
    pub fn push_head(&mut self, cell: Position) {
        self.body.insert(0, Segment::at(cell));
    }

    pub fn pop_tail(&mut self) -> Option<Segment> {
        self.body.pop()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Collision(CollisionType),
    /// The snake covers every cell, so no food can be placed
    BoardFilled,
}

/// Game-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    GameOver(EndReason),
}

/// Complete game state, owned by the frame loop and mutated in place
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub tile_count: usize,
    /// `None` until the first direction input, then the active heading
    pub direction: Option<Direction>,
    /// Directional inputs currently held down
    pub held: HashSet<Direction>,
    pub timing: TimingController,
    pub score: u32,
    pub high_score: u32,
    /// Ticks in which the snake moved since the game started
    pub steps: u32,
    pub phase: Phase,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, tile_count: usize, timing: TimingController) -> Self {
        Self {
            snake,
            food,
            tile_count,
            direction: None,
            held: HashSet::new(),
            timing,
            score: 0,
            high_score: 0,
            steps: 0,
            phase: Phase::NotStarted,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let n = self.tile_count as i32;
        pos.x >= 0 && pos.x < n && pos.y >= 0 && pos.y < n
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn any_held(&self) -> bool {
        !self.held.is_empty()
    }
}
