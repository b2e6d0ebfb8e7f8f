use std::iter;

use blockfall_engine::{Block, Board, GRID_HEIGHT, GRID_WIDTH, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::BlockDisplay;

#[allow(clippy::cast_possible_truncation)]
const COLUMNS: u16 = GRID_WIDTH as u16;
#[allow(clippy::cast_possible_truncation)]
const ROWS: u16 = GRID_HEIGHT as u16;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn falling_piece(self, piece: Option<Piece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        COLUMNS * BlockDisplay::width() + super::block_margin(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        ROWS * BlockDisplay::height() + super::block_margin(self.block.as_ref()).1
    }

    /// Cells as drawn: settled blocks, then the ghost, then the falling piece.
    fn cells(&self) -> [[BlockDisplay; GRID_WIDTH]; GRID_HEIGHT] {
        let mut cells = [[BlockDisplay::from_block(Block::Empty); GRID_WIDTH]; GRID_HEIGHT];
        for (cell_row, row) in iter::zip(&mut cells, self.board.rows()) {
            for (cell, block) in iter::zip(cell_row, row) {
                *cell = BlockDisplay::from_block(*block);
            }
        }

        let mut overlay = |piece: &Piece, display: BlockDisplay| {
            for (x, y) in piece.occupied_positions() {
                if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                    && let Some(cell) = cells.get_mut(y).and_then(|row| row.get_mut(x))
                {
                    *cell = display;
                }
            }
        };
        if let Some(ghost) = &self.ghost {
            overlay(ghost, BlockDisplay::GHOST);
        }
        if let Some(piece) = &self.falling_piece {
            overlay(piece, BlockDisplay::from_block(Block::Piece(piece.kind())));
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..GRID_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..GRID_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<GRID_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<GRID_WIDTH>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.cells()) {
            for (grid_cell, block_display) in iter::zip(grid_row, row) {
                block_display.render(grid_cell, buf);
            }
        }
    }
}
