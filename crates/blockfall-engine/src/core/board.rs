use serde::Serialize;

use super::{
    GRID_HEIGHT, GRID_HEIGHT_I32, GRID_WIDTH, GRID_WIDTH_I32,
    piece::{Piece, PieceKind},
};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Settled cell left by a frozen piece of the given kind.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Returns `.` for empty cells and the piece character otherwise.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Piece(kind) => kind.as_char(),
        }
    }
}

/// A single row of the board.
pub type BoardRow = [Block; GRID_WIDTH];

const EMPTY_ROW: BoardRow = [Block::Empty; GRID_WIDTH];

fn is_row_filled(row: &BoardRow) -> bool {
    row.iter().all(|b| !b.is_empty())
}

/// The fixed-size grid of settled cells.
///
/// Row 0 is the top of the board and row `GRID_HEIGHT - 1` the bottom.
/// Dimensions never change; cells are only written by [`Self::fill_piece`]
/// and moved or erased by [`Self::clear_lines`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let board = Board::from_ascii(
///     "
///     ..........
///     #####..####
///     ",
/// );
/// assert!(!board.is_colliding(&Piece::new(PieceKind::O)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; GRID_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["..........", ..., "IIII..OO.."] (top to bottom)
        serializer.collect_seq(self.rows.iter().map(|row| {
            let mut line = String::with_capacity(GRID_WIDTH);
            for block in row {
                line.push(block.as_char());
            }
            line
        }))
    }
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; GRID_HEIGHT],
    };

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    /// Returns the cell at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Block> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Returns the number of settled cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|block| !block.is_empty())
            .count()
    }

    /// Checks whether the piece is outside the board or overlaps a settled cell.
    ///
    /// A cell collides when its x is outside `[0, GRID_WIDTH)`, its y is
    /// outside `[-GRID_HEIGHT, GRID_HEIGHT)`, or it overlaps an occupied cell.
    /// Cells above the top edge (negative y) are not checked for occupancy.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece.occupied_positions().into_iter().any(|(x, y)| {
            if !(0..GRID_WIDTH_I32).contains(&x)
                || !(-GRID_HEIGHT_I32..GRID_HEIGHT_I32).contains(&y)
            {
                return true;
            }
            y >= 0 && self.cell(x, y).is_some_and(|b| !b.is_empty())
        })
    }

    /// Writes the piece's cells into the board.
    ///
    /// Cells above the top edge are dropped. The caller guarantees the piece
    /// does not collide.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.occupied_positions() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x))
            {
                *cell = Block::Piece(piece.kind());
            }
        }
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Rows are scanned bottom to top. When a row is full, every row above it
    /// shifts down by one and row 0 becomes empty; the same index is then
    /// examined again since it now holds the row that was above.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        let mut y = GRID_HEIGHT;
        while y > 0 {
            if is_row_filled(&self.rows[y - 1]) {
                count += 1;
                self.rows.copy_within(0..y - 1, 1);
                self.rows[0] = EMPTY_ROW;
            } else {
                y -= 1;
            }
        }
        count
    }

    /// Creates a `Board` from ASCII art.
    ///
    /// '.' is an empty cell; a piece character (`IOTSZJL`) or `#` is an
    /// occupied cell (`#` is stored as an I block). Rows are given top to
    /// bottom and aligned to the bottom of the board, so short art describes
    /// the lowest rows.
    ///
    /// # Panics
    ///
    /// Panics if a row is not exactly `GRID_WIDTH` cells wide or there are more
    /// than `GRID_HEIGHT` rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(
            lines.len() <= GRID_HEIGHT,
            "At most {GRID_HEIGHT} rows are allowed, got {}",
            lines.len()
        );

        let top = GRID_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<Block> = line
                .chars()
                .filter_map(|ch| match ch {
                    '.' => Some(Block::Empty),
                    '#' => Some(Block::Piece(PieceKind::I)),
                    ch => PieceKind::from_char(ch).map(Block::Piece),
                })
                .collect();
            assert_eq!(
                cells.len(),
                GRID_WIDTH,
                "Each row must have exactly {GRID_WIDTH} cells, got {} at row {i}",
                cells.len()
            );
            board.rows[top + i].copy_from_slice(&cells);
        }
        board
    }

    /// Renders the board as ASCII art in the format read by [`Self::from_ascii`].
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut art = String::with_capacity((GRID_WIDTH + 1) * GRID_HEIGHT);
        for row in &self.rows {
            for block in row {
                art.push(block.as_char());
            }
            art.push('\n');
        }
        art
    }
}
