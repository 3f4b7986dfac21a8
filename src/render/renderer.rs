use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Paragraph, Widget,
        canvas::{Canvas, Painter, Shape},
    },
};

use crate::game::{CollisionType, Difficulty, Direction, EndReason, GameState, Phase};
use crate::input::ButtonMap;
use crate::metrics::GameMetrics;

const BUTTON_WIDTH: u16 = 7;
const BUTTON_GAP: u16 = 1;

/// Settings outside the game state that the header and menus display
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub difficulty: Difficulty,
    pub sound_enabled: bool,
    /// Wall-clock milliseconds, only used for the food pulse
    pub now_ms: f64,
}

/// Where interactive elements ended up on screen this frame
#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    pub board: Rect,
    pub buttons: ButtonMap,
}

/// Axis-aligned filled square in canvas coordinates
struct FilledSquare {
    x: f64,
    y: f64,
    size: f64,
    bound: f64,
    color: Color,
}

impl Shape for FilledSquare {
    fn draw(&self, painter: &mut Painter) {
        let clamp = |v: f64| v.clamp(0.0, self.bound);
        let Some((left, top)) = painter.get_point(clamp(self.x), clamp(self.y + self.size)) else {
            return;
        };
        let Some((right, bottom)) = painter.get_point(clamp(self.x + self.size), clamp(self.y))
        else {
            return;
        };
        for px in left..=right {
            for py in top..=bottom {
                painter.paint(px, py, self.color);
            }
        }
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        hud: HudInfo,
    ) -> ScreenLayout {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Direction buttons
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics, hud);
        frame.render_widget(stats, chunks[0]);

        let board = Self::board_rect(chunks[1]);
        match state.phase {
            Phase::NotStarted => {
                frame.render_widget(self.render_start(hud), board);
            }
            Phase::Running => {
                frame.render_widget(self.render_board(state, hud), board);
            }
            Phase::GameOver(reason) => {
                frame.render_widget(self.render_game_over(state, reason, hud), board);
            }
        }

        let buttons = Self::button_rects(chunks[2]);
        for (rect, direction) in buttons.iter() {
            let held = state.held.contains(direction);
            frame.render_widget(Self::render_button(*direction, held), *rect);
        }

        frame.render_widget(self.render_controls(), chunks[3]);

        ScreenLayout { board, buttons }
    }

    /// Largest square-looking area (two columns per row) centred in `area`
    fn board_rect(area: Rect) -> Rect {
        let inner_rows = area.height.saturating_sub(2).min(area.width.saturating_sub(2) / 2);
        let height = inner_rows + 2;
        let width = inner_rows * 2 + 2;
        Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width: width.min(area.width),
            height: height.min(area.height),
        }
    }

    fn button_rects(area: Rect) -> ButtonMap {
        let order = [
            Direction::Left,
            Direction::Up,
            Direction::Down,
            Direction::Right,
        ];
        let total = BUTTON_WIDTH * order.len() as u16 + BUTTON_GAP * (order.len() as u16 - 1);
        let start = area.x + area.width.saturating_sub(total) / 2;

        let buttons = order
            .iter()
            .enumerate()
            .map(|(i, direction)| {
                let x = start + i as u16 * (BUTTON_WIDTH + BUTTON_GAP);
                let rect = Rect::new(x, area.y, BUTTON_WIDTH, area.height).intersection(area);
                (rect, *direction)
            })
            .filter(|(rect, _)| rect.width > 0 && rect.height > 0)
            .collect();
        ButtonMap::new(buttons)
    }

    fn render_button(direction: Direction, held: bool) -> Paragraph<'static> {
        let arrow = match direction {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Left => "◀",
            Direction::Right => "▶",
        };
        let color = if held { Color::Yellow } else { Color::Cyan };
        Paragraph::new(Line::from(Span::styled(
            arrow,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_board<'a>(&self, state: &'a GameState, hud: HudInfo) -> impl Widget + 'a {
        let n = state.tile_count as f64;
        // Canvas y grows upwards, grid y grows downwards
        let flip = move |y: f64| n - y - 1.0;

        let pulse = 1.0 + (hud.now_ms * 0.006).sin() * 0.15;
        let food_size = 0.6 * pulse;
        let food = FilledSquare {
            x: state.food.x as f64 + (1.0 - food_size) / 2.0,
            y: flip(state.food.y as f64) + (1.0 - food_size) / 2.0,
            size: food_size,
            bound: n,
            color: Color::Rgb(255, 107, 107),
        };

        let length = state.snake.len();
        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .marker(Marker::HalfBlock)
            .x_bounds([0.0, n])
            .y_bounds([0.0, n])
            .paint(move |ctx| {
                ctx.draw(&food);
                // Tail first so the head stays on top
                for (i, segment) in state.snake.body.iter().enumerate().rev() {
                    let inset = if i == 0 { 0.05 } else { 0.1 };
                    ctx.draw(&FilledSquare {
                        x: segment.render_x + inset,
                        y: flip(segment.render_y) + inset,
                        size: 1.0 - 2.0 * inset,
                        bound: n,
                        color: segment_color(i, length),
                    });
                }
            })
    }

    fn render_stats(
        &self,
        state: &GameState,
        metrics: &GameMetrics,
        hud: HudInfo,
    ) -> Paragraph<'_> {
        let sound = if hud.sound_enabled { "on" } else { "off" };
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Level: ", Style::default().fg(Color::Yellow)),
            Span::styled(hud.difficulty.name(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Sound: ", Style::default().fg(Color::Yellow)),
            Span::styled(sound, Style::default().fg(Color::White)),
        ];
        if state.timing.is_accelerating() {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "BOOST",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(""), Line::from(spans)]).alignment(Alignment::Center)
    }

    fn difficulty_menu(selected: Difficulty) -> Vec<Line<'static>> {
        Difficulty::ALL
            .iter()
            .enumerate()
            .map(|(i, difficulty)| {
                let style = if *difficulty == selected {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(vec![
                    Span::styled(format!("{} ", i + 1), Style::default().fg(Color::Cyan)),
                    Span::styled(format!(" {} ", difficulty), style),
                ])
            })
            .collect()
    }

    fn render_start(&self, hud: HudInfo) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(Span::styled("Select speed:", Style::default().fg(Color::Yellow))),
        ];
        text.extend(Self::difficulty_menu(hud.difficulty));
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to start", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White)),
        )
    }

    fn render_game_over(
        &self,
        state: &GameState,
        reason: EndReason,
        hud: HudInfo,
    ) -> Paragraph<'_> {
        let (title, detail) = match reason {
            EndReason::Collision(CollisionType::Wall) => ("GAME OVER", "You hit the wall"),
            EndReason::Collision(CollisionType::SelfCollision) => {
                ("GAME OVER", "You bit yourself")
            }
            EndReason::BoardFilled => ("BOARD CLEARED", "There is no room left"),
        };

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(detail, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Best: ", Style::default().fg(Color::Yellow)),
                Span::styled(state.high_score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
        ];
        text.extend(Self::difficulty_menu(hud.difficulty));
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move, hold to boost | "),
            Span::styled("M", Style::default().fg(Color::Cyan)),
            Span::raw(" sound | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Head in cyan, body fading from teal to green toward the tail
fn segment_color(index: usize, length: usize) -> Color {
    if index == 0 {
        return Color::Rgb(93, 211, 240);
    }
    let t = if length > 1 {
        index as f64 / (length - 1) as f64
    } else {
        0.0
    };
    let mix = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
    Color::Rgb(mix(69, 46), mix(183, 160), mix(209, 90))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};
    use ratatui::{Terminal, backend::TestBackend};

    fn hud() -> HudInfo {
        HudInfo {
            difficulty: Difficulty::Medium,
            sound_enabled: true,
            now_ms: 0.0,
        }
    }

    #[test]
    fn test_board_rect_is_square_looking() {
        let rect = Renderer::board_rect(Rect::new(0, 3, 100, 30));
        assert_eq!(rect.height, 30);
        assert_eq!(rect.width, 58);
        assert_eq!(rect.x, 21);

        let narrow = Renderer::board_rect(Rect::new(0, 0, 22, 40));
        assert_eq!(narrow.width, 22);
        assert_eq!(narrow.height, 12);
    }

    #[test]
    fn test_buttons_are_laid_out_in_a_row() {
        let buttons = Renderer::button_rects(Rect::new(0, 30, 80, 3));
        let rects: Vec<_> = buttons.iter().collect();
        assert_eq!(rects.len(), 4);
        assert_eq!(rects[0].1, Direction::Left);
        assert_eq!(rects[3].1, Direction::Right);
        assert!(rects.windows(2).all(|w| w[0].0.x < w[1].0.x));
        assert_eq!(buttons.hit(rects[1].0.x + 1, 31), Some(Direction::Up));
    }

    #[test]
    fn test_segment_colors() {
        assert_eq!(segment_color(0, 5), Color::Rgb(93, 211, 240));
        assert_eq!(segment_color(4, 5), Color::Rgb(46, 160, 90));
    }

    #[test]
    fn test_render_every_phase() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let mut state = engine.reset();
        let metrics = GameMetrics::new();
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();

        let mut layout = ScreenLayout::default();
        terminal
            .draw(|frame| layout = renderer.render(frame, &state, &metrics, hud()))
            .unwrap();
        assert!(layout.board.width > 0);
        assert_eq!(layout.buttons.iter().count(), 4);

        engine.start(&mut state, 0.0);
        state.direction = Some(Direction::Right);
        engine.advance_frame(&mut state, 75.0);
        terminal
            .draw(|frame| {
                renderer.render(frame, &state, &metrics, hud());
            })
            .unwrap();

        state.phase = Phase::GameOver(EndReason::BoardFilled);
        terminal
            .draw(|frame| {
                renderer.render(frame, &state, &metrics, hud());
            })
            .unwrap();
    }
}
