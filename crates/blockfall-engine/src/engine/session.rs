use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::MoveError;

use super::{
    game::Game,
    game_stats::GameStats,
    snapshot::GameSnapshot,
    spawner::{PieceSeed, PieceSpawner, ShapeSource},
};

/// Timing parameters of a [`GameSession`].
///
/// Gravity is counted in frames: the active piece falls one row every
/// `gravity_frames` frames, or every `fast_gravity_frames` frames while soft
/// drop is held. Missing fields take their default when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub fps: u64,
    pub gravity_frames: u64,
    pub fast_gravity_frames: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            gravity_frames: 50,
            fast_gravity_frames: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidConfigError {
    #[display("fps must be greater than zero")]
    ZeroFps,
    #[display("fps must be at most {}", SessionConfig::MAX_FPS)]
    FpsTooHigh,
    #[display("gravity frames must be greater than zero")]
    ZeroGravityFrames,
}

impl SessionConfig {
    pub const MAX_FPS: u64 = 1000;

    /// Checks that every interval is non-zero and `fps` is at most
    /// [`Self::MAX_FPS`].
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid value.
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if self.fps == 0 {
            return Err(InvalidConfigError::ZeroFps);
        }
        if self.fps > Self::MAX_FPS {
            return Err(InvalidConfigError::FpsTooHigh);
        }
        if self.gravity_frames == 0 || self.fast_gravity_frames == 0 {
            return Err(InvalidConfigError::ZeroGravityFrames);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Player commands understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateCw,
    SoftDropOn,
    SoftDropOff,
    HardDrop,
}

/// A game driven by a frame clock.
///
/// The session owns the timing that [`Game`] leaves to its caller: the caller
/// calls [`Self::increment_frame`] once per tick and forwards player input
/// through [`Self::apply`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{Game, GameSession, PieceKind, SequenceSource, SessionConfig};
///
/// let game = Game::with_source(SequenceSource::new([PieceKind::O]));
/// let mut session = GameSession::with_game(SessionConfig::default(), game).unwrap();
///
/// for _ in 0..50 {
///     session.increment_frame();
/// }
/// assert_eq!(session.game().active_piece().unwrap().position().y(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession<S = PieceSpawner> {
    game: Game<S>,
    config: SessionConfig,
    state: SessionState,
    soft_drop: bool,
    frames_since_drop: u64,
    total_frames: u64,
}

impl GameSession {
    /// Starts a session with a randomly seeded spawner.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: SessionConfig) -> Result<Self, InvalidConfigError> {
        Self::with_game(config, Game::new())
    }

    /// Starts a session whose piece sequence is determined by `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn with_seed(config: SessionConfig, seed: PieceSeed) -> Result<Self, InvalidConfigError> {
        Self::with_game(config, Game::with_seed(seed))
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.game.seed()
    }
}

impl<S> GameSession<S>
where
    S: ShapeSource,
{
    /// Wraps an existing game.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn with_game(config: SessionConfig, game: Game<S>) -> Result<Self, InvalidConfigError> {
        config.validate()?;
        let state = if game.is_game_over() {
            SessionState::GameOver
        } else {
            SessionState::Playing
        };
        Ok(Self {
            game,
            config,
            state,
            soft_drop: false,
            frames_since_drop: 0,
            total_frames: 0,
        })
    }

    #[must_use]
    pub fn game(&self) -> &Game<S> {
        &self.game
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        self.game.stats()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot<'_> {
        self.game.snapshot()
    }

    /// Elapsed play time. Frames spent paused or after game over don't count.
    #[must_use]
    pub fn duration(&self) -> Duration {
        const NANOS_PER_SEC: u64 = 1_000_000_000;
        let fps = self.config.fps;
        let secs = self.total_frames / fps;
        let nanos = (self.total_frames % fps) * NANOS_PER_SEC / fps;
        Duration::from_secs(secs) + Duration::from_nanos(nanos)
    }

    fn gravity_interval(&self) -> u64 {
        if self.soft_drop {
            self.config.fast_gravity_frames
        } else {
            self.config.gravity_frames
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Applies a player command.
    ///
    /// Movement is ignored unless the session is playing. The soft-drop flag
    /// follows the key state even while paused so that a release is never
    /// lost.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SoftDropOn => self.soft_drop = true,
            Command::SoftDropOff => self.soft_drop = false,
            _ if !self.state.is_playing() => {}
            Command::MoveLeft => _ = self.game.try_move_left(),
            Command::MoveRight => _ = self.game.try_move_right(),
            Command::RotateCw => _ = self.game.try_rotate(),
            Command::HardDrop => {
                _ = self.game.hard_drop();
                self.frames_since_drop = 0;
            }
        }
        self.sync_state();
    }

    /// Advances the clock by one frame, applying gravity when it is due.
    pub fn increment_frame(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        self.total_frames += 1;
        self.frames_since_drop += 1;
        if self.frames_since_drop >= self.gravity_interval() {
            self.frames_since_drop = 0;
            let dropped = self.game.try_soft_drop();
            debug_assert!(
                matches!(dropped, Ok(()) | Err(MoveError::Locked { .. })),
                "{dropped:?}"
            );
            self.sync_state();
        }
    }

    fn sync_state(&mut self) {
        if self.game.is_game_over() {
            self.state = SessionState::GameOver;
        }
    }
}
