use std::time::Duration;

use anyhow::Context as _;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop, keyboard::KeyReleaseReporting};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
    key_release: bool,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Whether the terminal reports key releases as separate events.
    pub fn reports_key_release(&self) -> bool {
        self.key_release
    }

    /// Runs the application.
    ///
    /// 1. Sets up the terminal and calls `app.init()`
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `Event::Tick`: calls `app.update()`
    ///    - `Event::Render`: calls `app.draw()`
    ///    - `Event::Crossterm`: calls `app.handle_event()`
    /// 3. Restores the terminal, also when the loop fails
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            let reporting =
                KeyReleaseReporting::enable().context("Failed to configure keyboard input")?;
            self.key_release = reporting.is_enabled();
            app.init(&mut self);

            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        app.update(&mut self);
                    }
                    TuiEvent::Render => {
                        terminal
                            .draw(|f| app.draw(f))
                            .context("Failed to draw the screen")?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        })
    }
}
