use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::game::{GameConfig, GameEngine, GameState, Phase, TickOutcome, control};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{HudInfo, Renderer, ScreenLayout};
use crate::services::{AudioNotifier, HighScoreStore, Muted, TerminalBell};

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    audio: Box<dyn AudioNotifier>,
    store: Box<dyn HighScoreStore>,
    sound_enabled: bool,
    layout: ScreenLayout,
    clock: Instant,
    keyboard_enhanced: bool,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>, sound_enabled: bool) -> Self {
        let mut engine = GameEngine::new(config);
        let mut state = engine.reset();

        state.high_score = match store.load() {
            Ok(high_score) => high_score,
            Err(err) => {
                warn!(error = %err, "could not load high score, starting from 0");
                0
            }
        };

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::default(),
            audio: Self::audio_for(sound_enabled),
            store,
            sound_enabled,
            layout: ScreenLayout::default(),
            clock: Instant::now(),
            keyboard_enhanced: false,
            should_quit: false,
        }
    }

    fn audio_for(sound_enabled: bool) -> Box<dyn AudioNotifier> {
        if sound_enabled {
            Box::new(TerminalBell::new())
        } else {
            Box::new(Muted)
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;

        // Release events are needed to know when a held key is let go
        self.keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
        if self.keyboard_enhanced {
            execute!(
                stderr,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .context("Failed to enable key release events")?;
        }
        self.input_handler = InputHandler::new(self.keyboard_enhanced);
        info!(
            release_events = self.keyboard_enhanced,
            "terminal input configured"
        );

        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // One simulation/render pass per frame
        let frame_interval = Duration::from_millis(self.engine.config().frame_interval_ms);
        let mut frame_timer = interval(frame_interval);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !self.should_quit {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Frame callback
                _ = frame_timer.tick() => {
                    self.frame();
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.layout = self.renderer.render(frame, &self.state, &self.metrics, hud);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }
        }

        info!(games_played = self.metrics.games_played, "quitting");
        Ok(())
    }

    fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    fn hud(&self) -> HudInfo {
        HudInfo {
            difficulty: self.engine.config().difficulty,
            sound_enabled: self.sound_enabled,
            now_ms: self.now_ms(),
        }
    }

    /// One pass of the frame loop; does nothing to the game unless it is running
    fn frame(&mut self) {
        let now = self.now_ms();
        for direction in self.input_handler.expired_holds(now) {
            control::set_held(&mut self.state, direction, false);
        }

        let report = self.engine.advance_frame(&mut self.state, now);
        if report.speed_changed {
            debug!(
                tick_ms = self.state.timing.current_speed(),
                accelerating = self.state.timing.is_accelerating(),
                "tick rate changed"
            );
        }
        if let Some(tick) = report.tick {
            self.after_tick(&tick);
        }

        self.metrics.update();
    }

    fn after_tick(&mut self, tick: &TickOutcome) {
        if tick.ate_food {
            self.audio.on_eat();
        }
        if tick.new_high_score {
            self.persist_high_score();
        }
        if tick.terminated() {
            self.audio.on_game_over();
            self.metrics.on_game_over();
            control::release_all(&mut self.state);
            self.input_handler.reset();
        }
    }

    fn persist_high_score(&mut self) {
        if let Err(err) = self.store.save(self.state.high_score) {
            warn!(error = %err, high_score = self.state.high_score, "could not save high score");
        }
    }

    fn handle_event(&mut self, event: Event) {
        let action = match event {
            Event::Key(key) => self.input_handler.handle_key_event(key, self.now_ms()),
            Event::Mouse(mouse) => self
                .input_handler
                .handle_mouse_event(mouse, &self.layout.buttons),
            Event::Resize(columns, rows) => {
                debug!(columns, rows, "terminal resized");
                KeyAction::None
            }
            _ => KeyAction::None,
        };
        self.apply(action);
    }

    fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Press(direction) if self.state.is_running() => {
                if control::press(&mut self.state, direction) {
                    self.audio.on_move();
                }
            }
            KeyAction::Turn(direction) if self.state.is_running() => {
                if control::set_direction(&mut self.state, direction) {
                    self.audio.on_move();
                }
            }
            KeyAction::Press(_) | KeyAction::Turn(_) => {}
            KeyAction::Release(direction) => {
                control::set_held(&mut self.state, direction, false);
            }
            KeyAction::SelectDifficulty(difficulty) => {
                if !self.state.is_running() {
                    self.engine.set_difficulty(difficulty);
                    info!(%difficulty, "difficulty selected");
                }
            }
            KeyAction::Start => match self.state.phase {
                Phase::NotStarted => self.start_game(),
                Phase::GameOver(_) => self.reset_game(),
                Phase::Running => {}
            },
            KeyAction::Restart => {
                if matches!(self.state.phase, Phase::GameOver(_)) {
                    self.reset_game();
                }
            }
            KeyAction::ToggleSound => {
                self.sound_enabled = !self.sound_enabled;
                self.audio = Self::audio_for(self.sound_enabled);
                debug!(sound_enabled = self.sound_enabled, "sound toggled");
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn start_game(&mut self) {
        let now = self.now_ms();
        self.engine.start(&mut self.state, now);
        self.metrics.on_game_start();
        self.input_handler.reset();
    }

    fn reset_game(&mut self) {
        let now = self.now_ms();
        self.engine.restart(&mut self.state, now);
        self.metrics.on_game_start();
        self.input_handler.reset();
        info!(difficulty = %self.engine.config().difficulty, "game restarted");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        if self.keyboard_enhanced {
            execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
                .context("Failed to restore keyboard mode")?;
        }
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
