use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameSession, PieceSeed, SessionConfig};

use crate::{command::play::app::PlayApp, tui::Tui, util};

mod app;
mod input;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (32 hex digits); random if omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Session settings file (JSON); flags below override its values
    #[clap(long)]
    config: Option<PathBuf>,
    /// Frames per second
    #[clap(long)]
    fps: Option<u64>,
    /// Frames between gravity steps
    #[clap(long)]
    gravity_frames: Option<u64>,
    /// Frames between gravity steps while soft dropping
    #[clap(long)]
    fast_gravity_frames: Option<u64>,
    /// Hide the landing preview of the falling piece
    #[clap(long)]
    no_ghost: bool,
    /// Write the final game state as JSON to this file on exit
    #[clap(long)]
    save_snapshot: Option<PathBuf>,
}

impl PlayArg {
    /// Builds the session settings: defaults, then the config file, then flags.
    fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("session config", path)?,
            None => SessionConfig::default(),
        };
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(frames) = self.gravity_frames {
            config.gravity_frames = frames;
        }
        if let Some(frames) = self.fast_gravity_frames {
            config.fast_gravity_frames = frames;
        }
        config
            .validate()
            .context("Invalid session configuration")?;
        Ok(config)
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = arg.session_config()?;
    let session = match arg.seed {
        Some(seed) => GameSession::with_seed(config, seed)?,
        None => GameSession::new(config)?,
    };

    let mut app = PlayApp::new(session, !arg.no_ghost);
    Tui::new().run(&mut app)?;
    let session = app.into_session();

    println!("{}", summary(&session));
    if let Some(path) = &arg.save_snapshot {
        util::write_json_file("snapshot", path, &session.snapshot())?;
        println!("Snapshot saved to {}", path.display());
    }

    Ok(())
}

fn summary(session: &GameSession) -> String {
    let stats = session.stats();
    let outcome = if session.state().is_game_over() {
        "Game over"
    } else {
        "Quit"
    };
    format!(
        "{outcome}: score {}, lines {}, pieces {}, time {}, seed {}",
        stats.score(),
        stats.total_cleared_lines(),
        stats.completed_pieces(),
        util::format_duration(session.duration()),
        session.seed(),
    )
}
