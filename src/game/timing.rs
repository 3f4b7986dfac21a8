//! Fixed-timestep accumulator driven by a variable-rate frame callback.
//!
//! Every frame adds the elapsed wall-clock time to an accumulator. Once the
//! accumulator reaches the active tick interval the caller runs one
//! simulation tick and the accumulator is reset to zero. Surplus time beyond
//! one tick is discarded rather than caught up, so a long frame stall shows up
//! as slow motion instead of a burst of skipped cells.

/// Timing state of one game session, all values in milliseconds
#[derive(Debug, Clone, PartialEq)]
pub struct TimingController {
    last_time: f64,
    accumulator: f64,
    base_speed: f64,
    current_speed: f64,
    acceleration_multiplier: f64,
    accelerating: bool,
    move_progress: f64,
}

impl TimingController {
    pub fn new(base_speed: f64, acceleration_multiplier: f64) -> Self {
        Self {
            last_time: 0.0,
            accumulator: 0.0,
            base_speed,
            current_speed: base_speed,
            acceleration_multiplier,
            accelerating: false,
            move_progress: 0.0,
        }
    }

    /// Start a fresh frame chain at `now` with no accumulated time
    pub fn restart(&mut self, base_speed: f64, now: f64) {
        self.base_speed = base_speed;
        self.current_speed = base_speed;
        self.accelerating = false;
        self.accumulator = 0.0;
        self.move_progress = 0.0;
        self.last_time = now;
    }

    /// Record the frame timestamp and accumulate the elapsed time.
    ///
    /// Returns the elapsed time. A clock that steps backwards contributes
    /// nothing.
    pub fn begin_frame(&mut self, now: f64) -> f64 {
        let delta = (now - self.last_time).max(0.0);
        self.last_time = now;
        self.accumulator += delta;
        delta
    }

    /// Switch between base and accelerated speed on the edges of the held state.
    ///
    /// Returns true when the speed changed.
    pub fn update_acceleration(&mut self, any_held: bool) -> bool {
        if any_held && !self.accelerating {
            self.accelerating = true;
            self.current_speed = self.base_speed / self.acceleration_multiplier;
            true
        } else if !any_held && self.accelerating {
            self.accelerating = false;
            self.current_speed = self.base_speed;
            true
        } else {
            false
        }
    }

    /// Recompute the fraction of the current tick that has elapsed
    pub fn refresh_progress(&mut self) -> f64 {
        self.move_progress = (self.accumulator / self.current_speed).min(1.0);
        self.move_progress
    }

    pub fn tick_due(&self) -> bool {
        self.accumulator >= self.current_speed
    }

    /// Drop all accumulated time, including any surplus beyond one tick
    pub fn consume_tick(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn reset_progress(&mut self) {
        self.move_progress = 0.0;
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }

    pub fn move_progress(&self) -> f64 {
        self.move_progress
    }

    pub fn is_accelerating(&self) -> bool {
        self.accelerating
    }
}
