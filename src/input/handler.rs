use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use super::gesture::SwipeTracker;
use super::hold::RepeatHoldTracker;
use crate::game::{Difficulty, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Change heading and, if accepted, count the input as held
    Press(Direction),
    /// Change heading without touching the held set
    Turn(Direction),
    /// A held input was let go
    Release(Direction),
    SelectDifficulty(Difficulty),
    Start,
    Restart,
    ToggleSound,
    Quit,
    None,
}

/// Screen areas of the on-screen direction buttons, refreshed every frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonMap {
    buttons: Vec<(Rect, Direction)>,
}

impl ButtonMap {
    pub fn new(buttons: Vec<(Rect, Direction)>) -> Self {
        Self { buttons }
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<Direction> {
        self.buttons
            .iter()
            .find(|(rect, _)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(_, direction)| *direction)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Rect, Direction)> {
        self.buttons.iter()
    }
}

pub struct InputHandler {
    /// Whether the terminal reports key release events
    release_events: bool,
    repeat_hold: RepeatHoldTracker,
    swipe: SwipeTracker,
    pressed_button: Option<Direction>,
}

impl InputHandler {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            repeat_hold: RepeatHoldTracker::default(),
            swipe: SwipeTracker::default(),
            pressed_button: None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, now_ms: f64) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(direction) = Self::direction_for(key.code) {
            return self.handle_direction_key(direction, key.kind, now_ms);
        }

        if key.kind == KeyEventKind::Release {
            return KeyAction::None;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Start,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::ToggleSound,
            KeyCode::Char(c) => Difficulty::from_menu_key(c)
                .map(KeyAction::SelectDifficulty)
                .unwrap_or(KeyAction::None),
            _ => KeyAction::None,
        }
    }

    fn direction_for(code: KeyCode) -> Option<Direction> {
        match code {
            // Movement - Arrow keys
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            _ => None,
        }
    }

    fn handle_direction_key(
        &mut self,
        direction: Direction,
        kind: KeyEventKind,
        now_ms: f64,
    ) -> KeyAction {
        match (self.release_events, kind) {
            (true, KeyEventKind::Release) => KeyAction::Release(direction),
            (true, _) => KeyAction::Press(direction),
            (false, KeyEventKind::Release) => KeyAction::None,
            (false, _) => {
                if self.repeat_hold.on_press(direction, now_ms) {
                    KeyAction::Press(direction)
                } else {
                    KeyAction::Turn(direction)
                }
            }
        }
    }

    /// Holds inferred from key repeat that have since stopped
    pub fn expired_holds(&mut self, now_ms: f64) -> Vec<Direction> {
        if self.release_events {
            return Vec::new();
        }
        self.repeat_hold.expire(now_ms)
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, buttons: &ButtonMap) -> KeyAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(direction) = buttons.hit(mouse.column, mouse.row) {
                    self.swipe.cancel();
                    self.pressed_button = Some(direction);
                    KeyAction::Press(direction)
                } else {
                    self.swipe.begin(mouse.column, mouse.row);
                    KeyAction::None
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(direction) = self.pressed_button.take() {
                    return KeyAction::Release(direction);
                }
                self.swipe
                    .end(mouse.column, mouse.row)
                    .map(KeyAction::Turn)
                    .unwrap_or(KeyAction::None)
            }
            _ => KeyAction::None,
        }
    }

    /// Forget all in-flight holds and gestures, e.g. on restart
    pub fn reset(&mut self) {
        self.repeat_hold.clear();
        self.swipe.cancel();
        self.pressed_button = None;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(false)
    }
}
