use crate::{
    MoveError, PieceCollisionError, RotateError,
    core::{board::Board, piece::Piece},
};

use super::{
    game_stats::GameStats,
    snapshot::GameSnapshot,
    spawner::{PieceSeed, PieceSpawner, ShapeSource},
};

/// Phase of the piece lifecycle.
///
/// ```text
/// Spawning ──> Active ──(blocked descent)──> Freezing ──> ClearCheck ──> Spawning
///    │
///    └──(spawn collides)──> GameOver
/// ```
///
/// Between calls a game is always `Active` or `GameOver`; the other phases
/// only exist while the lock sequence runs. `GameOver` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Phase {
    Spawning,
    Active,
    Freezing,
    ClearCheck,
    GameOver,
}

/// A single game: the board, the active piece, and the score.
///
/// `Game` owns all game rules. It is driven by explicit commands
/// ([`Self::try_move`], [`Self::try_rotate`], [`Self::hard_drop`]); timing is
/// left to the caller (see [`GameSession`](super::GameSession)).
///
/// # Example
///
/// ```
/// use blockfall_engine::{Game, PieceKind, SequenceSource};
///
/// let mut game = Game::with_source(SequenceSource::new([PieceKind::O]));
/// assert!(game.try_move(-1, 0).is_ok());
///
/// let cleared = game.hard_drop().unwrap();
/// assert_eq!(cleared, 0);
/// assert_eq!(game.board().occupied_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Game<S = PieceSpawner> {
    board: Board,
    piece: Option<Piece>,
    stats: GameStats,
    phase: Phase,
    source: S,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game with a randomly seeded uniform spawner.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(PieceSpawner::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(PieceSpawner::with_seed(seed))
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.source.seed()
    }
}

impl<S> Game<S>
where
    S: ShapeSource,
{
    /// Creates a game on an empty board and spawns the first piece.
    #[must_use]
    pub fn with_source(source: S) -> Self {
        Self::with_board(Board::EMPTY, source)
    }

    /// Creates a game on a prepared board and spawns the first piece.
    ///
    /// If the first piece already collides, the game starts in `GameOver`.
    #[must_use]
    pub fn with_board(board: Board, source: S) -> Self {
        let mut game = Self {
            board,
            piece: None,
            stats: GameStats::new(),
            phase: Phase::Spawning,
            source,
        };
        game.run_phases();
        game
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// Returns a read-only view of the state for rendering or export.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot<'_> {
        GameSnapshot::new(&self.board, self.piece.as_ref(), &self.stats, self.is_game_over())
    }

    /// Replaces the active piece with a new one from the shape source.
    ///
    /// If the new piece collides at its spawn position, the game is over; the
    /// colliding piece is kept for display but accepts no further commands.
    /// Does nothing once the game is over.
    pub fn spawn_piece(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.phase = Phase::Spawning;
        self.run_phases();
    }

    /// Translates the active piece by `(dx, dy)`.
    ///
    /// A colliding translation is rejected and the piece keeps its position.
    /// Any delta is accepted; one that leaves the board's range collides.
    /// When a downward step (`dy > 0`) is rejected, the piece is frozen into
    /// the board, full lines are cleared, and the next piece is spawned; this
    /// is reported as [`MoveError::Locked`].
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let piece = self.piece.ok_or(MoveError::NoActivePiece)?;

        let moved = piece.translated(dx, dy);
        if !self.board.is_colliding(&moved) {
            self.piece = Some(moved);
            return Ok(());
        }

        if dy > 0 {
            self.phase = Phase::Freezing;
            let cleared_lines = self.run_phases();
            return Err(MoveError::Locked { cleared_lines });
        }
        Err(MoveError::Collision(PieceCollisionError))
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        self.try_move(-1, 0)
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        self.try_move(1, 0)
    }

    pub fn try_soft_drop(&mut self) -> Result<(), MoveError> {
        self.try_move(0, 1)
    }

    /// Rotates the active piece 90° clockwise if the result fits.
    pub fn try_rotate(&mut self) -> Result<(), RotateError> {
        if self.is_game_over() {
            return Err(RotateError::GameOver);
        }
        let piece = self.piece.ok_or(RotateError::NoActivePiece)?;

        let rotated = piece.rotated_right();
        if self.board.is_colliding(&rotated) {
            return Err(RotateError::Collision(PieceCollisionError));
        }
        self.piece = Some(rotated);
        Ok(())
    }

    /// Moves the active piece down until it locks.
    ///
    /// Returns the number of lines cleared by the lock.
    pub fn hard_drop(&mut self) -> Result<usize, MoveError> {
        loop {
            match self.try_soft_drop() {
                Ok(()) => {}
                Err(MoveError::Locked { cleared_lines }) => return Ok(cleared_lines),
                Err(e) => return Err(e),
            }
        }
    }

    /// Returns where the active piece would lock after a hard drop.
    #[must_use]
    pub fn drop_position(&self) -> Option<Piece> {
        if self.is_game_over() {
            return None;
        }
        let mut dropped = self.piece?;
        loop {
            let next = dropped.translated(0, 1);
            if self.board.is_colliding(&next) {
                return Some(dropped);
            }
            dropped = next;
        }
    }

    /// Clears every full row and adds the line clear score.
    ///
    /// Returns the number of rows cleared. Does nothing once the game is over.
    pub fn clear_lines(&mut self) -> usize {
        if self.is_game_over() {
            return 0;
        }
        let cleared_lines = self.board.clear_lines();
        self.stats.record_line_clear(cleared_lines);
        cleared_lines
    }

    /// Runs the lock sequence from the current phase until the game is
    /// `Active` or `GameOver`, returning the number of lines cleared.
    fn run_phases(&mut self) -> usize {
        let mut cleared_lines = 0;
        loop {
            self.phase = match self.phase {
                Phase::Freezing => {
                    self.freeze_piece();
                    Phase::ClearCheck
                }
                Phase::ClearCheck => {
                    cleared_lines = self.clear_lines();
                    Phase::Spawning
                }
                Phase::Spawning => self.spawn(),
                Phase::Active | Phase::GameOver => return cleared_lines,
            };
        }
    }

    fn freeze_piece(&mut self) {
        if let Some(piece) = self.piece.take() {
            self.board.fill_piece(&piece);
            self.stats.record_lock();
        }
    }

    fn spawn(&mut self) -> Phase {
        let piece = Piece::new(self.source.next_kind());
        let collides = self.board.is_colliding(&piece);
        self.piece = Some(piece);
        if collides {
            Phase::GameOver
        } else {
            Phase::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Block, PieceKind, PiecePosition, SequenceSource};

    use super::*;

    fn game_with(kinds: &[PieceKind]) -> Game<SequenceSource> {
        Game::with_source(SequenceSource::new(kinds.iter().copied()))
    }

    fn position(game: &Game<SequenceSource>) -> PiecePosition {
        game.active_piece().unwrap().position()
    }

    #[test]
    fn test_new_game_spawns_first_piece() {
        let game = game_with(&[PieceKind::T]);
        assert_eq!(game.phase(), Phase::Active);
        let piece = game.active_piece().unwrap();
        assert_eq!(piece.kind(), PieceKind::T);
        assert_eq!(piece.position(), PiecePosition::new(4, 0));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_o_piece_falls_and_freezes_at_bottom() {
        let mut game = game_with(&[PieceKind::O, PieceKind::T]);
        assert_eq!(position(&game), PiecePosition::new(4, 0));

        for _ in 0..18 {
            assert_eq!(game.try_soft_drop(), Ok(()));
        }
        assert_eq!(position(&game), PiecePosition::new(4, 18));
        assert_eq!(
            game.try_soft_drop(),
            Err(MoveError::Locked { cleared_lines: 0 })
        );

        let expected = Board::from_ascii(
            "
            ....OO....
            ....OO....
            ",
        );
        assert_eq!(game.board(), &expected);
        assert_eq!(game.active_piece().unwrap().kind(), PieceKind::T);
        assert_eq!(position(&game), PiecePosition::new(4, 0));
        assert_eq!(game.score(), 0);
        assert_eq!(game.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_filling_gap_clears_bottom_row() {
        let board = Board::from_ascii(
            "
            L.........
            ####..####
            ",
        );
        let mut game = Game::with_board(board, SequenceSource::new([PieceKind::O]));

        assert_eq!(game.hard_drop(), Ok(1));
        let expected = Board::from_ascii(
            "
            L...OO....
            ",
        );
        assert_eq!(game.board(), &expected);
        assert_eq!(game.score(), 100);
        assert_eq!(game.stats().total_cleared_lines(), 1);
    }

    #[test]
    fn test_four_line_clear_awards_1000() {
        let board = Board::from_ascii(
            "
            #########.
            #########.
            #########.
            #########.
            ",
        );
        let mut game = Game::with_board(board, SequenceSource::new([PieceKind::I]));
        game.try_rotate().unwrap();
        // Vertical I occupies column x + 0; move it to column 9.
        while game.try_move_right().is_ok() {}
        assert_eq!(game.active_piece().unwrap().position().x(), 9);

        assert_eq!(game.hard_drop(), Ok(4));
        assert_eq!(game.board(), &Board::EMPTY);
        assert_eq!(game.score(), 1000);
        assert_eq!(game.stats().line_cleared_counter()[4], 1);
    }

    #[test]
    fn test_blocked_lateral_move_keeps_position() {
        let mut game = game_with(&[PieceKind::O]);
        for _ in 0..4 {
            assert_eq!(game.try_move_left(), Ok(()));
        }
        assert_eq!(position(&game), PiecePosition::new(0, 0));
        assert_eq!(
            game.try_move_left(),
            Err(MoveError::Collision(PieceCollisionError))
        );
        assert_eq!(position(&game), PiecePosition::new(0, 0));
        assert_eq!(game.board().occupied_count(), 0);
    }

    #[test]
    fn test_upward_move_never_freezes() {
        let mut game = game_with(&[PieceKind::O]);
        assert!(game.try_move(0, -1).is_ok());
        assert_eq!(position(&game), PiecePosition::new(4, -1));
        assert!(game.try_move(0, -5).is_ok());
        assert_eq!(game.board().occupied_count(), 0);
    }

    #[test]
    fn test_huge_deltas_collide() {
        let mut game = game_with(&[PieceKind::O]);
        let start = position(&game);
        for (dx, dy) in [(i32::MAX, 0), (i32::MIN, 0), (0, i32::MIN), (0, -50_000_000)] {
            assert_eq!(
                game.try_move(dx, dy),
                Err(MoveError::Collision(PieceCollisionError)),
                "({dx}, {dy})"
            );
            assert_eq!(position(&game), start);
        }
        assert_eq!(
            game.try_move(0, i32::MAX),
            Err(MoveError::Locked { cleared_lines: 0 })
        );
        // frozen where it stood
        assert_eq!(game.board().cell(4, 0), Some(Block::Piece(PieceKind::O)));
    }

    #[test]
    fn test_rise_is_bounded_above_board() {
        let mut game = game_with(&[PieceKind::O]);
        while game.try_move(0, -1).is_ok() {}
        assert_eq!(position(&game), PiecePosition::new(4, -20));

        assert_eq!(game.drop_position().unwrap().position().y(), 18);
        assert_eq!(game.hard_drop(), Ok(0));
        assert_eq!(game.board().occupied_count(), 4);
    }

    #[test]
    fn test_move_and_back_restores_anchor() {
        let mut game = game_with(&[PieceKind::T]);
        let start = position(&game);
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1)] {
            let before = position(&game);
            game.try_move(dx, dy).unwrap();
            game.try_move(-dx, -dy).unwrap();
            assert_eq!(position(&game), before);
        }
        assert_eq!(position(&game), start);
    }

    #[test]
    fn test_rotation_blocked_by_wall_is_discarded() {
        let mut game = game_with(&[PieceKind::I]);
        game.try_rotate().unwrap();
        while game.try_move_right().is_ok() {}
        let vertical = *game.active_piece().unwrap();
        assert_eq!(vertical.position().x(), 9);

        // Horizontal I anchored at x = 9 would extend past the right wall.
        assert_eq!(
            game.try_rotate(),
            Err(RotateError::Collision(PieceCollisionError))
        );
        assert_eq!(game.active_piece(), Some(&vertical));
    }

    #[test]
    fn test_rotation_blocked_by_settled_cells() {
        let mut art = String::from(".....#....\n");
        art.push_str(&"..........\n".repeat(19));
        let board = Board::from_ascii(&art);

        // J spawns as [J..][JJJ] at (4, 0), clear of the cell at (5, 0).
        let mut game = Game::with_board(board, SequenceSource::new([PieceKind::J]));
        assert!(!game.is_game_over());

        // Rotated J is [JJ][J.][J.], which needs (5, 0).
        let before = *game.active_piece().unwrap();
        assert!(game.try_rotate().unwrap_err().is_collision());
        assert_eq!(game.active_piece(), Some(&before));
    }

    #[test]
    fn test_four_rotations_restore_piece() {
        for kind in PieceKind::ALL {
            let mut game = game_with(&[kind]);
            game.try_move(0, 5).unwrap();
            let before = *game.active_piece().unwrap();
            for _ in 0..4 {
                game.try_rotate().unwrap();
            }
            let after = game.active_piece().unwrap();
            assert_eq!(after.shape(), before.shape(), "{kind:?}");
            assert_eq!(after.position(), before.position(), "{kind:?}");
        }
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let board = Board::from_ascii(&"....#.....\n".repeat(20));
        let game = Game::with_board(board, SequenceSource::new([PieceKind::O]));
        assert!(game.is_game_over());
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(game.active_piece().is_some());
    }

    #[test]
    fn test_game_over_is_final() {
        let mut game = game_with(&[PieceKind::I]);
        // Stack vertical I pieces in column 0 until the spawn area is blocked.
        let mut guard = 0;
        while !game.is_game_over() {
            game.try_rotate().ok();
            while game.try_move_left().is_ok() {}
            game.hard_drop().ok();
            guard += 1;
            assert!(guard < 100, "game never ended");
        }

        let board = game.board().clone();
        let piece = game.active_piece().copied();
        let score = game.score();

        assert_eq!(game.try_move_left(), Err(MoveError::GameOver));
        assert_eq!(game.try_soft_drop(), Err(MoveError::GameOver));
        assert_eq!(game.hard_drop(), Err(MoveError::GameOver));
        assert_eq!(game.try_rotate(), Err(RotateError::GameOver));
        game.spawn_piece();
        assert_eq!(game.clear_lines(), 0);

        assert_eq!(game.board(), &board);
        assert_eq!(game.active_piece().copied(), piece);
        assert_eq!(game.score(), score);
        assert!(game.drop_position().is_none());
    }

    #[test]
    fn test_spawn_piece_replaces_active_piece() {
        let mut game = game_with(&[PieceKind::O, PieceKind::S]);
        game.try_move(0, 3).unwrap();
        game.spawn_piece();
        let piece = game.active_piece().unwrap();
        assert_eq!(piece.kind(), PieceKind::S);
        assert_eq!(piece.position(), PiecePosition::new(4, 0));
        assert_eq!(game.board().occupied_count(), 0);
    }

    #[test]
    fn test_drop_position_matches_hard_drop() {
        let board = Board::from_ascii(
            "
            ..#.......
            ..##......
            ",
        );
        let mut game = Game::with_board(board, SequenceSource::new([PieceKind::Z]));
        game.try_move(-2, 0).unwrap();
        let landing = game.drop_position().unwrap();

        game.hard_drop().unwrap();
        for (x, y) in landing.occupied_positions() {
            assert_eq!(game.board().cell(x, y), Some(Block::Piece(PieceKind::Z)));
        }
    }

    #[test]
    fn test_clear_lines_direct() {
        let board = Board::from_ascii(
            "
            ##########
            ##########
            ",
        );
        let mut game = Game::with_board(board, SequenceSource::new([PieceKind::T]));
        assert_eq!(game.clear_lines(), 2);
        assert_eq!(game.score(), 200);
        assert_eq!(game.board().occupied_count(), 0);
    }
}
