use std::io::{self, Write};

/// Sound cues fired by the game loop.
///
/// Calls are fire-and-forget. Implementations swallow their own failures so
/// a broken output never reaches the simulation.
pub trait AudioNotifier {
    fn on_eat(&mut self);
    fn on_game_over(&mut self);
    fn on_move(&mut self);
}

/// Rings the terminal bell on food and on game over.
///
/// Turns are silent: the bell has a single tone and would fire on every key.
pub struct TerminalBell<W: Write = io::Stderr> {
    out: W,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self { out: io::stderr() }
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    fn ring(&mut self) {
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }
}

impl<W: Write> AudioNotifier for TerminalBell<W> {
    fn on_eat(&mut self) {
        self.ring();
    }

    fn on_game_over(&mut self) {
        self.ring();
    }

    fn on_move(&mut self) {}
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl AudioNotifier for Muted {
    fn on_eat(&mut self) {}
    fn on_game_over(&mut self) {}
    fn on_move(&mut self) {}
}
