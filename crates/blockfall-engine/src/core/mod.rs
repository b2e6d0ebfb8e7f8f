pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns of the board.
pub const GRID_WIDTH: usize = 10;
/// Number of rows of the board.
pub const GRID_HEIGHT: usize = 20;

// Signed copies for coordinate arithmetic on piece anchors, which may leave the board.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) const GRID_WIDTH_I32: i32 = GRID_WIDTH as i32;
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) const GRID_HEIGHT_I32: i32 = GRID_HEIGHT as i32;
