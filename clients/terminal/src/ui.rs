use crate::app::{App, MIN_GAME_HEIGHT, MIN_GAME_WIDTH};
use pong_core::{MatchState, RenderHelper, View};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph, Widget},
};

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(game_area) = self.calculate_game_area(area) else {
            self.render_resize_message(area, buf);
            return;
        };

        let view = self.game.view();

        // Create layout for score + field + controls
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Score
                Constraint::Min(8),    // Field
                Constraint::Length(3), // Controls
            ])
            .split(game_area);

        self.render_header(chunks[0], buf, &view);
        render_field(chunks[1], buf, &view);

        match view.state {
            MatchState::Title => render_overlay(
                chunks[1],
                buf,
                &["P O N G", "", "Press SPACE to start"],
                Color::Cyan,
            ),
            MatchState::GameOver(winner) => {
                let name = self.player_name(winner);
                let headline = if name == "You" {
                    "You win!".to_string()
                } else {
                    format!("{name} wins")
                };
                render_overlay(
                    chunks[1],
                    buf,
                    &["GAME OVER", "", &headline, "", "Press R to play again"],
                    Color::Yellow,
                );
            }
            MatchState::Playing => {}
        }

        self.render_controls(chunks[2], buf);
    }
}

impl App {
    fn render_resize_message(&self, area: Rect, buf: &mut Buffer) {
        let message = format!(
            "Terminal too small!\n\nMinimum required: {}×{}\nCurrent size: {}×{}\n\nPlease resize your terminal to continue playing.",
            MIN_GAME_WIDTH, MIN_GAME_HEIGHT, self.terminal_size.0, self.terminal_size.1
        );

        Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("⚠ Resize Required ⚠")
                    .title_alignment(Alignment::Center),
            )
            .render(area, buf);
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer, view: &View) {
        let mut content = format!(
            "{}  {} - {}  {}    {}    FPS: {}",
            self.player_name(pong_core::Side::Left),
            view.score[0],
            view.score[1],
            self.player_name(pong_core::Side::Right),
            self.game.status_string(),
            self.fps.fps()
        );
        if let (MatchState::Playing, Some(side)) = (view.state, self.last_point) {
            content.push_str(&format!("    Point: {}", self.player_name(side)));
        }

        Paragraph::new(content)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Pong")
                    .title_alignment(Alignment::Center),
            )
            .render(area, buf);
    }

    fn render_controls(&self, area: Rect, buf: &mut Buffer) {
        let controls_text = if self.game.two_player {
            "P1: W/S  P2: ↑/↓  SPACE: Start  R: Restart  Q/ESC: Quit"
        } else {
            "Paddle: ↑/↓  SPACE: Start  R: Restart  Q/ESC: Quit"
        };

        Paragraph::new(controls_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(format!("Controls ({})", self.input_system.mode_description()))
                    .title_alignment(Alignment::Center),
            )
            .render(area, buf);
    }
}

/// Draw the playfield into a bordered block. Paddle sizes in cells depend
/// only on the paddle height so they never flicker while moving.
fn render_field(area: Rect, buf: &mut Buffer, view: &View) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title("Field")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    block.render(area, buf);

    let cols = inner.width as usize;
    let rows = inner.height as usize;
    if cols == 0 || rows == 0 {
        return; // Too small to render
    }

    let helper = RenderHelper::for_view(cols, rows, view);
    let mut grid = vec![vec![' '; cols]; rows];

    // Dashed centre line
    let center_x = cols / 2;
    for (y, row) in grid.iter_mut().enumerate() {
        if y % 2 == 0 {
            row[center_x] = '┊';
        }
    }

    for paddle in &view.paddles {
        if let Some(rect) = helper.cell_rect(paddle) {
            for row in &mut grid[rect.top..=rect.bottom] {
                for cell in &mut row[rect.left..=rect.right] {
                    *cell = '█';
                }
            }
        }
    }

    if let Some((x, y)) = helper.center_cell(&view.ball) {
        grid[y][x] = '●';
    }

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| Line::from(row.into_iter().collect::<String>()))
        .collect();
    Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .render(inner, buf);
}

/// Centred message box over the field
fn render_overlay(area: Rect, buf: &mut Buffer, lines: &[&str], color: Color) {
    let width = lines
        .iter()
        .map(|line| line.chars().count() as u16)
        .max()
        .unwrap_or(0)
        + 6;
    let height = lines.len() as u16 + 2;

    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    };

    Clear.render(popup, buf);
    Paragraph::new(lines.iter().map(|line| Line::from(*line)).collect::<Vec<_>>())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_type(BorderType::Double))
        .render(popup, buf);
}
