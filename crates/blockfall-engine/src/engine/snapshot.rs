use serde::Serialize;

use crate::core::{board::Board, piece::Piece};

use super::game_stats::GameStats;

/// Read-only view of a [`Game`](super::Game) at one point in time.
///
/// Borrowed from the game, so it is only valid until the next command. The
/// serialized form is what `--save-snapshot` writes:
///
/// ```json
/// {
///   "board": ["..........", ...],
///   "piece": { "kind": "O", "color": {..}, "x": 4, "y": 0, "shape": ["11", "11"] },
///   "score": 0,
///   "game_over": false,
///   "stats": { .. }
/// }
/// ```
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GameSnapshot<'a> {
    board: &'a Board,
    piece: Option<&'a Piece>,
    score: usize,
    game_over: bool,
    stats: &'a GameStats,
}

impl<'a> GameSnapshot<'a> {
    #[must_use]
    pub fn new(
        board: &'a Board,
        piece: Option<&'a Piece>,
        stats: &'a GameStats,
        game_over: bool,
    ) -> Self {
        Self {
            board,
            piece,
            score: stats.score(),
            game_over,
            stats,
        }
    }

    #[must_use]
    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// The active piece; on game over, the piece that failed to spawn.
    #[must_use]
    pub fn piece(&self) -> Option<&'a Piece> {
        self.piece
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn stats(&self) -> &'a GameStats {
        self.stats
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}
