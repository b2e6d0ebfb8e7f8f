use blockfall_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, SessionStatsDisplay, color, style};

/// The playing field with the statistics panel beside it.
///
/// The border color follows the session state, and a popup covers the board
/// while paused or after the game is over.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, show_ghost: bool) -> Self {
        Self {
            session,
            show_ghost,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.session.state() {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }

    fn game_board(&self) -> BoardDisplay<'a> {
        let game = self.session.game();
        let widget = BoardDisplay::new(game.board())
            .falling_piece(game.active_piece().copied())
            .block(
                Block::bordered()
                    .border_style(self.border_color())
                    .style(style::DEFAULT),
            );
        if self.show_ghost {
            widget.ghost(game.drop_position())
        } else {
            widget
        }
    }

    fn session_stats(&self) -> SessionStatsDisplay<'a> {
        SessionStatsDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::symmetric(
                    self.horizontal_padding,
                    self.vertical_padding,
                ))
                .border_style(self.border_color())
                .style(style::DEFAULT),
        )
    }

    pub fn height(&self) -> u16 {
        u16::max(self.game_board().height(), self.session_stats().height())
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game_board = self.game_board();
        let session_stats = self.session_stats();

        let [left_column, center_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);

        let popup = match self.session.state() {
            SessionState::Playing => None,
            SessionState::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            SessionState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::SessionConfig;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn session() -> GameSession {
        let seed = "0f0e0d0c0b0a09080706050403020100".parse().unwrap();
        GameSession::with_seed(SessionConfig::default(), seed).unwrap()
    }

    fn render(session: &GameSession) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(SessionDisplay::new(session, true), frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_height_fits_board() {
        let session = session();
        assert_eq!(SessionDisplay::new(&session, true).height(), 22);
    }

    #[test]
    fn test_render_shows_stats_and_ghost() {
        let screen = render(&session());
        assert!(screen.contains("STATS"), "{screen}");
        assert!(screen.contains("SCORE:"), "{screen}");
        assert!(screen.contains("[]"), "{screen}");
        assert!(!screen.contains("PAUSED"), "{screen}");
    }

    #[test]
    fn test_render_pause_popup() {
        let mut session = session();
        session.toggle_pause();
        let screen = render(&session);
        assert!(screen.contains("PAUSED"), "{screen}");
    }
}
