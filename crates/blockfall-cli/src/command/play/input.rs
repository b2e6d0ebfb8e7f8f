use blockfall_engine::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the play screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    Command(Command),
    TogglePause,
    Quit,
}

/// Maps a key event to an action.
///
/// Auto-repeat presses are handled like presses. A release only matters for
/// the soft drop key; it is only seen on terminals that report releases.
pub(super) fn map_key(event: &KeyEvent) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return (event.code == KeyCode::Down).then_some(Action::Command(Command::SoftDropOff));
    }

    let action = match event.code {
        KeyCode::Left => Action::Command(Command::MoveLeft),
        KeyCode::Right => Action::Command(Command::MoveRight),
        KeyCode::Up => Action::Command(Command::RotateCw),
        KeyCode::Down => Action::Command(Command::SoftDropOn),
        KeyCode::Char(' ') => Action::Command(Command::HardDrop),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('p' | 'P') => Action::TogglePause,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}
