//! Game rules and their timing.
//!
//! - [`Game`] - Board, active piece and score, driven by explicit commands
//! - [`GameSession`] - Frame clock around a [`Game`]: gravity, soft drop, pause
//! - [`GameStats`] - Score and line-clear statistics
//! - [`GameSnapshot`] - Read-only, serializable view of a game
//! - [`PieceSpawner`] - Seeded uniform piece generation ([`PieceSeed`])
//!
//! # Game Flow
//!
//! 1. A piece spawns at the top center of the board
//! 2. The player moves and rotates it; gravity pulls it down one row at a time
//! 3. When a downward step is blocked, the piece freezes into the board
//! 4. Full rows are cleared and scored, and the next piece spawns
//! 5. The game ends when a new piece collides at its spawn position
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Command, GameSession, PieceSeed, SessionConfig};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let mut session = GameSession::with_seed(SessionConfig::default(), seed).unwrap();
//!
//! session.apply(Command::MoveLeft);
//! session.apply(Command::HardDrop);
//! session.increment_frame();
//!
//! assert_eq!(session.stats().completed_pieces(), 1);
//! assert!(session.state().is_playing());
//! ```

pub use self::{game::*, game_stats::*, session::*, snapshot::*, spawner::*};

mod game;
mod game_stats;
mod session;
mod snapshot;
mod spawner;
