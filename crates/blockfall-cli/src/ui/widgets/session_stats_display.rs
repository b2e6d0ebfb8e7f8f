use blockfall_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::{ui::widgets::style, util};

/// Score, play time and line statistics of a session.
#[derive(Debug)]
pub struct SessionStatsDisplay<'a> {
    rows: Vec<Row>,
    block: Option<BlockWidget<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Row {
    Blank,
    /// Label on its own line, value right-aligned on the next.
    Heading(&'static str, String),
    /// Label and value on one line.
    Counter(&'static str, String),
}

impl Row {
    fn height(&self) -> u16 {
        match self {
            Row::Blank | Row::Counter(..) => 1,
            Row::Heading(..) => 2,
        }
    }
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(session: &GameSession) -> Self {
        let stats = session.stats();
        let [_, singles, doubles, triples, fours] = *stats.line_cleared_counter();
        let rows = vec![
            Row::Heading("SCORE:", stats.score().to_string()),
            Row::Heading("TIME:", util::format_duration(session.duration())),
            Row::Blank,
            Row::Counter("LINES:", stats.total_cleared_lines().to_string()),
            Row::Counter("PIECES:", stats.completed_pieces().to_string()),
            Row::Blank,
            Row::Counter("SINGLES:", singles.to_string()),
            Row::Counter("DOUBLES:", doubles.to_string()),
            Row::Counter("TRIPLES:", triples.to_string()),
            Row::Counter("FOURS:", fours.to_string()),
        ];
        Self { rows, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        18 + super::block_margin(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        let rows = self.rows.iter().map(Row::height).sum::<u16>();
        rows + super::block_margin(self.block.as_ref()).1
    }
}

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let row_areas =
            Layout::vertical(self.rows.iter().map(|row| Constraint::Length(row.height())))
                .split(area);

        for (row, area) in self.rows.into_iter().zip(row_areas.iter().copied()) {
            match row {
                Row::Blank => {}
                Row::Heading(label, value) => {
                    let [label_area, value_area] =
                        area.layout(&Layout::vertical([Constraint::Length(1); 2]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value, style)
                        .right_aligned()
                        .render(value_area, buf);
                }
                Row::Counter(label, value) => {
                    let [label_area, value_area] =
                        area.layout(&Layout::horizontal([Constraint::Fill(1); 2]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value, style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::SessionConfig;

    use super::*;

    #[test]
    fn test_rows_follow_stats() {
        let seed = "00000000000000000000000000000001".parse().unwrap();
        let mut session = GameSession::with_seed(SessionConfig::default(), seed).unwrap();
        session.apply(blockfall_engine::Command::HardDrop);

        let display = SessionStatsDisplay::new(&session);
        assert_eq!(display.rows[0], Row::Heading("SCORE:", "0".to_owned()));
        assert_eq!(display.rows[4], Row::Counter("PIECES:", "1".to_owned()));
        assert_eq!(display.height(), 12);
        assert_eq!(display.block(BlockWidget::bordered()).height(), 14);
    }
}
