use clap::Parser;

use self::play::PlayArg;

mod play;

/// Falling-block puzzle game for the terminal
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    play: PlayArg,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    play::run(&args.play)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }
}
