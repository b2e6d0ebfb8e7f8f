use std::io;

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};

/// Requests key release events from the terminal for as long as it lives.
///
/// Most terminals only report key presses (and auto-repeat presses). Terminals
/// implementing the kitty keyboard protocol can also report releases, which is
/// what a held soft drop needs.
#[derive(Debug)]
pub(super) struct KeyReleaseReporting {
    enabled: bool,
}

impl KeyReleaseReporting {
    /// Enables release reporting if the terminal supports it.
    pub(super) fn enable() -> io::Result<Self> {
        let enabled = terminal::supports_keyboard_enhancement()?;
        if enabled {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(Self { enabled })
    }

    pub(super) fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Drop for KeyReleaseReporting {
    fn drop(&mut self) {
        if self.enabled {
            // Nothing useful to do if the terminal is already gone.
            _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
    }
}
