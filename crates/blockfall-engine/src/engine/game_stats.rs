use serde::Serialize;

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 200 points
/// - 3 lines: 500 points
/// - 4 lines: 1000 points
const SCORE_TABLE: [usize; 5] = [0, 100, 200, 500, 1000];

/// Returns the points awarded for clearing `lines` rows at once.
///
/// More than four rows can only be cleared on a hand-built board; those clears
/// are scored like a four-row clear.
#[must_use]
pub fn line_clear_score(lines: usize) -> usize {
    SCORE_TABLE[lines.min(SCORE_TABLE.len() - 1)]
}

/// Game statistics tracking score, lines cleared, and piece count.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_lock();
/// stats.record_line_clear(4);
///
/// assert_eq!(stats.score(), 1000);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Returns the current score (sum of all line clear points).
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the total number of pieces that have been frozen into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of line clear passes by count.
    ///
    /// Array indices represent:
    /// - `[0]`: Number of passes that cleared nothing
    /// - `[1]`: Number of singles (1 line)
    /// - `[2]`: Number of doubles (2 lines)
    /// - `[3]`: Number of triples (3 lines)
    /// - `[4]`: Number of four-line clears
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    pub const fn record_lock(&mut self) {
        self.completed_pieces += 1;
    }

    /// Updates statistics after a line clear pass.
    ///
    /// # Arguments
    ///
    /// * `cleared_lines` - Number of lines cleared in this pass
    pub fn record_line_clear(&mut self, cleared_lines: usize) {
        self.total_cleared_lines += cleared_lines;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        self.score += line_clear_score(cleared_lines);
    }
}
