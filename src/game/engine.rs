use super::{
    config::{Difficulty, GameConfig},
    interpolate::update_render_positions,
    state::{CollisionType, EndReason, GameState, Phase, Position, Snake},
    timing::TimingController,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

/// Random draws tried before falling back to enumerating the free cells
const FOOD_ATTEMPTS_PER_CELL: usize = 4;

/// Result of one simulation tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Whether the snake moved at all (false while stopped or not running)
    pub moved: bool,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Whether the score passed the previous high score
    pub new_high_score: bool,
    /// Set when this tick ended the game
    pub end: Option<EndReason>,
}

impl TickOutcome {
    pub fn terminated(&self) -> bool {
        self.end.is_some()
    }
}

/// What happened during one frame of the loop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Elapsed time since the previous frame, in milliseconds
    pub delta_ms: f64,
    /// Whether the held state flipped the tick rate this frame
    pub speed_changed: bool,
    /// Present when the accumulator reached a full tick and the snake moved
    pub tick: Option<TickOutcome>,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with deterministic food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Select the tick interval used by the next start or restart
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
    }

    /// Build a fresh, not yet started game
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(self.config.start_position());
        let timing = TimingController::new(
            self.config.base_speed_ms(),
            self.config.acceleration_multiplier,
        );
        let food = self.spawn_food(&snake, self.config.tile_count);

        let mut state = GameState::new(
            snake,
            food.unwrap_or_else(|| self.config.start_position()),
            self.config.tile_count,
            timing,
        );
        if food.is_none() {
            state.phase = Phase::GameOver(EndReason::BoardFilled);
        }
        state
    }

    /// Move a fresh game into the running phase with its clock at `now_ms`
    pub fn start(&mut self, state: &mut GameState, now_ms: f64) {
        if state.phase != Phase::NotStarted {
            return;
        }
        state.timing.restart(self.config.base_speed_ms(), now_ms);
        state.phase = Phase::Running;
        info!(
            difficulty = %self.config.difficulty,
            tile_count = self.config.tile_count,
            "game started"
        );
    }

    /// Replace the game with a new running one, keeping the high score
    pub fn restart(&mut self, state: &mut GameState, now_ms: f64) {
        let high_score = state.high_score;
        *state = self.reset();
        state.high_score = high_score;
        self.start(state, now_ms);
    }

    /// Run one frame of the fixed-step loop at timestamp `now_ms`.
    ///
    /// At most one tick runs per frame; once the accumulator reaches the tick
    /// interval it is cleared even if the snake is not moving.
    pub fn advance_frame(&mut self, state: &mut GameState, now_ms: f64) -> FrameReport {
        let mut report = FrameReport::default();
        if !state.is_running() {
            return report;
        }

        report.delta_ms = state.timing.begin_frame(now_ms);
        report.speed_changed = state.timing.update_acceleration(state.any_held());

        if state.direction.is_some() {
            let progress = state.timing.refresh_progress();
            update_render_positions(&mut state.snake, state.direction, progress);
        }

        if state.timing.tick_due() {
            if state.direction.is_some() {
                let outcome = self.tick(state);
                let terminated = outcome.terminated();
                report.tick = Some(outcome);
                if terminated {
                    return report;
                }
            }
            state.timing.consume_tick();
        }

        report
    }

    /// Execute one simulation step
    pub fn tick(&mut self, state: &mut GameState) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let Some(direction) = state.direction else {
            return outcome;
        };
        if !state.is_running() {
            return outcome;
        }

        let new_head = state.snake.head().moved_in_direction(direction);
        state.snake.push_head(new_head);
        outcome.moved = true;

        if new_head == state.food {
            outcome.ate_food = true;
            state.score += 1;
            debug!(score = state.score, length = state.snake.len(), "food eaten");

            match self.spawn_food(&state.snake, state.tile_count) {
                Some(food) => state.food = food,
                None => outcome.end = Some(EndReason::BoardFilled),
            }

            if state.score > state.high_score {
                state.high_score = state.score;
                outcome.new_high_score = true;
            }
        } else {
            state.snake.pop_tail();
        }

        state.timing.reset_progress();
        state.steps += 1;

        if let Some(collision) = Self::is_collision(state) {
            outcome.end = Some(EndReason::Collision(collision));
        }

        if let Some(reason) = outcome.end {
            state.phase = Phase::GameOver(reason);
            info!(?reason, score = state.score, steps = state.steps, "game over");
        }

        outcome
    }

    /// Check whether the current head is out of bounds or on the body
    pub fn is_collision(state: &GameState) -> Option<CollisionType> {
        let head = state.snake.head();

        if !state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random cell not covered by the snake.
    ///
    /// Returns `None` when the snake covers the whole board.
    pub fn spawn_food(&mut self, snake: &Snake, tile_count: usize) -> Option<Position> {
        let total = tile_count * tile_count;
        if total == 0 {
            return None;
        }

        for _ in 0..total * FOOD_ATTEMPTS_PER_CELL {
            let x = self.rng.gen_range(0..tile_count) as i32;
            let y = self.rng.gen_range(0..tile_count) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..tile_count as i32)
            .flat_map(|y| (0..tile_count as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        if free.is_empty() {
            None
        } else {
            Some(free[self.rng.gen_range(0..free.len())])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::Direction;

    fn running_state(
        engine: &mut GameEngine,
        cells: &[Position],
        direction: Option<Direction>,
        food: Position,
    ) -> GameState {
        let mut state = engine.reset();
        state.snake = Snake::from_cells(cells);
        state.food = food;
        state.direction = direction;
        state.phase = Phase::NotStarted;
        engine.start(&mut state, 0.0);
        state
    }

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset();

        assert_eq!(state.phase, Phase::NotStarted);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.direction, None);
        assert!(!state.snake.occupies(state.food));
        assert!(state.is_in_bounds(state.food));
    }

    #[test]
    fn test_eat_food_scenario() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(10, 10)],
            Some(Direction::Right),
            Position::new(11, 10),
        );

        let outcome = engine.tick(&mut state);

        assert!(outcome.ate_food);
        assert!(!outcome.terminated());
        assert_eq!(state.snake.head(), Position::new(11, 10));
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 2);
        assert_ne!(state.food, Position::new(11, 10));
        assert!(!state.snake.occupies(state.food));
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_new_head_renders_on_its_cell() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(4, 4), Position::new(3, 4)],
            Some(Direction::Down),
            Position::new(0, 0),
        );

        engine.tick(&mut state);
        assert_eq!(state.snake.body[0].render_position(), (4.0, 5.0));
        assert_eq!(state.timing.move_progress(), 0.0);
    }

    #[test]
    fn test_wall_collision_scenario() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(0, 10), Position::new(1, 10)],
            Some(Direction::Left),
            Position::new(5, 5),
        );

        let outcome = engine.tick(&mut state);

        assert_eq!(state.snake.head(), Position::new(-1, 10));
        assert_eq!(
            outcome.end,
            Some(EndReason::Collision(CollisionType::Wall))
        );
        assert_eq!(
            state.phase,
            Phase::GameOver(EndReason::Collision(CollisionType::Wall))
        );

        // No further ticks until restart
        let steps = state.steps;
        let outcome = engine.tick(&mut state);
        assert!(!outcome.moved);
        assert_eq!(state.steps, steps);
    }

    #[test]
    fn test_far_wall_collision() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(19, 3)],
            Some(Direction::Right),
            Position::new(5, 5),
        );
        engine.tick(&mut state);
        assert_eq!(state.snake.head(), Position::new(20, 3));
        assert_eq!(
            GameEngine::is_collision(&state),
            Some(CollisionType::Wall)
        );

        let mut state = running_state(
            &mut engine,
            &[Position::new(3, 19)],
            Some(Direction::Down),
            Position::new(5, 5),
        );
        let outcome = engine.tick(&mut state);
        assert!(outcome.terminated());
    }

    #[test]
    fn test_edge_cells_are_safe() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(1, 0)],
            Some(Direction::Left),
            Position::new(5, 5),
        );
        let outcome = engine.tick(&mut state);
        assert!(!outcome.terminated());
        assert_eq!(state.snake.head(), Position::new(0, 0));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();
        // Head at (5,5) moving up into (5,4), which is part of the body
        let mut state = running_state(
            &mut engine,
            &[
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 4),
                Position::new(5, 4),
                Position::new(4, 4),
            ],
            Some(Direction::Up),
            Position::new(0, 0),
        );

        let outcome = engine.tick(&mut state);
        assert_eq!(
            outcome.end,
            Some(EndReason::Collision(CollisionType::SelfCollision))
        );
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        let mut engine = engine();
        // A 2x2 loop: the head chases the tail cell that is popped this tick
        let mut state = running_state(
            &mut engine,
            &[
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 4),
                Position::new(5, 4),
            ],
            Some(Direction::Up),
            Position::new(0, 0),
        );

        let outcome = engine.tick(&mut state);
        assert!(!outcome.terminated());
        assert_eq!(state.snake.head(), Position::new(5, 4));
    }

    #[test]
    fn test_body_follows_head_path() {
        let mut engine = engine();
        let cells = [
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(4, 6),
            Position::new(4, 7),
        ];
        let mut state = running_state(
            &mut engine,
            &cells,
            Some(Direction::Up),
            Position::new(0, 0),
        );

        let before: Vec<Position> = state.snake.cells().collect();
        let outcome = engine.tick(&mut state);
        let after: Vec<Position> = state.snake.cells().collect();

        assert!(!outcome.ate_food);
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0], Position::new(5, 4));
        // Every segment moves onto its predecessor's former cell
        for i in 1..after.len() {
            assert_eq!(after[i], before[i - 1]);
        }
        assert!(!after.contains(&before[before.len() - 1]));
    }

    #[test]
    fn test_length_changes_only_on_food() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(2, 2)],
            Some(Direction::Right),
            Position::new(4, 2),
        );

        let mut length = state.snake.len();
        let mut eaten = 0;
        for _ in 0..6 {
            let outcome = engine.tick(&mut state);
            let expected = length + usize::from(outcome.ate_food);
            assert_eq!(state.snake.len(), expected);
            length = expected;
            eaten += u32::from(outcome.ate_food);
        }
        assert!(eaten >= 1);
        assert_eq!(state.score, eaten);
    }

    #[test]
    fn test_high_score_tracking() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(2, 2)],
            Some(Direction::Right),
            Position::new(3, 2),
        );
        state.high_score = 1;

        let outcome = engine.tick(&mut state);
        assert!(outcome.ate_food);
        assert!(!outcome.new_high_score);
        assert_eq!(state.high_score, 1);

        state.food = state.snake.head().moved_in_direction(Direction::Right);
        let outcome = engine.tick(&mut state);
        assert!(outcome.new_high_score);
        assert_eq!(state.high_score, 2);
    }

    #[test]
    fn test_stopped_snake_does_not_tick() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(2, 2)],
            None,
            Position::new(3, 2),
        );

        let outcome = engine.tick(&mut state);
        assert!(!outcome.moved);
        assert_eq!(state.snake.head(), Position::new(2, 2));
    }

    #[test]
    fn test_food_avoids_snake_up_to_one_free_cell() {
        let mut engine = GameEngine::with_seed(GameConfig::new(4), 11);
        let all: Vec<Position> = (0..4)
            .flat_map(|y| (0..4).map(move |x| Position::new(x, y)))
            .collect();

        for occupied in 1..all.len() {
            let snake = Snake::from_cells(&all[..occupied]);
            for _ in 0..20 {
                let food = engine.spawn_food(&snake, 4);
                let food = food.expect("a free cell exists");
                assert!(!snake.occupies(food));
            }
        }

        let full = Snake::from_cells(&all);
        assert_eq!(engine.spawn_food(&full, 4), None);
    }

    #[test]
    fn test_filling_the_board_ends_the_game() {
        let mut engine = GameEngine::with_seed(GameConfig::new(2), 3);
        let mut state = running_state(
            &mut engine,
            &[Position::new(0, 1), Position::new(1, 1), Position::new(1, 0)],
            Some(Direction::Up),
            Position::new(0, 0),
        );

        let outcome = engine.tick(&mut state);
        assert!(outcome.ate_food);
        assert_eq!(outcome.end, Some(EndReason::BoardFilled));
        assert_eq!(state.phase, Phase::GameOver(EndReason::BoardFilled));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_frame_timing_scenario() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(10, 10)],
            Some(Direction::Right),
            Position::new(0, 0),
        );

        let first = engine.advance_frame(&mut state, 80.0);
        assert_eq!(first.tick, None);
        assert_eq!(state.timing.accumulator(), 80.0);
        assert!((state.timing.move_progress() - 0.5333).abs() < 1e-3);
        assert_eq!(state.snake.head(), Position::new(10, 10));

        let second = engine.advance_frame(&mut state, 160.0);
        assert!(second.tick.is_some_and(|t| t.moved));
        assert_eq!(state.timing.accumulator(), 0.0);
        assert_eq!(state.snake.head(), Position::new(11, 10));
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_one_tick_per_frame_after_stall() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(2, 10)],
            Some(Direction::Right),
            Position::new(0, 0),
        );

        engine.advance_frame(&mut state, 1000.0);
        assert_eq!(state.steps, 1);
        assert_eq!(state.timing.accumulator(), 0.0);
        assert_eq!(state.snake.head(), Position::new(3, 10));
    }

    #[test]
    fn test_stopped_snake_still_drains_accumulator() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(10, 10)],
            None,
            Position::new(0, 0),
        );

        let report = engine.advance_frame(&mut state, 200.0);
        assert_eq!(report.tick, None);
        assert_eq!(state.timing.accumulator(), 0.0);
        assert_eq!(state.timing.move_progress(), 0.0);
    }

    #[test]
    fn test_held_input_accelerates_ticks() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(5, 10)],
            Some(Direction::Right),
            Position::new(0, 0),
        );
        state.held.insert(Direction::Right);

        let report = engine.advance_frame(&mut state, 60.0);
        assert!(report.speed_changed);
        assert_eq!(state.timing.current_speed(), 60.0);
        assert!(report.tick.is_some());

        state.held.clear();
        let report = engine.advance_frame(&mut state, 100.0);
        assert!(report.speed_changed);
        assert_eq!(state.timing.current_speed(), 150.0);
        assert_eq!(report.tick, None);
    }

    #[test]
    fn test_collision_stops_frame_chain() {
        let mut engine = engine();
        let mut state = running_state(
            &mut engine,
            &[Position::new(0, 10), Position::new(1, 10)],
            Some(Direction::Left),
            Position::new(5, 5),
        );

        let report = engine.advance_frame(&mut state, 150.0);
        assert!(report.tick.is_some_and(|t| t.terminated()));
        assert!(!state.is_running());

        let report = engine.advance_frame(&mut state, 300.0);
        assert_eq!(report, FrameReport::default());
    }

    #[test]
    fn test_restart_keeps_high_score_and_difficulty() {
        let mut engine = engine();
        engine.set_difficulty(Difficulty::Hard);
        let mut state = engine.reset();
        engine.start(&mut state, 0.0);
        state.score = 7;
        state.high_score = 9;
        state.direction = Some(Direction::Up);
        state.phase = Phase::GameOver(EndReason::Collision(CollisionType::Wall));

        engine.restart(&mut state, 5000.0);

        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 9);
        assert_eq!(state.direction, None);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.timing.base_speed(), 100.0);
        assert_eq!(state.timing.accumulator(), 0.0);
    }
}
