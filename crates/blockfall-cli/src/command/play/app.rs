use blockfall_engine::{Command, GameSession, SessionState};
use crossterm::event::{Event, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    command::play::input::{self, Action},
    tui::{App, Tui},
    ui::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

/// How long a soft drop lasts after the last press when the terminal can't
/// report the release.
const SOFT_DROP_HOLD_MILLIS: u64 = 500;

const PLAYING_KEYS: &[KeyBinding<'static>] = &[
    (&["←", "→"], "Move"),
    (&["↑"], "Rotate"),
    (&["↓"], "Soft Drop"),
    (&["Space"], "Hard Drop"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding<'static>] = &[(&["P"], "Resume"), (&["Q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding<'static>] = &[(&["Q"], "Quit")];

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    show_ghost: bool,
    key_release: bool,
    soft_drop_hold_ticks: u64,
    soft_drop_ticks_left: u64,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, show_ghost: bool) -> Self {
        let soft_drop_hold_ticks = (session.config().fps * SOFT_DROP_HOLD_MILLIS / 1000).max(1);
        Self {
            session,
            show_ghost,
            key_release: false,
            soft_drop_hold_ticks,
            soft_drop_ticks_left: 0,
            is_exiting: false,
        }
    }

    pub fn into_session(self) -> GameSession {
        self.session
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        match input::map_key(event) {
            Some(Action::Command(command)) => {
                if command == Command::SoftDropOn {
                    self.soft_drop_ticks_left = self.soft_drop_hold_ticks;
                }
                self.session.apply(command);
            }
            Some(Action::TogglePause) => self.session.toggle_pause(),
            Some(Action::Quit) => self.is_exiting = true,
            None => {}
        }
    }

    fn tick(&mut self) {
        // Without release events, a soft drop ends once the key stops repeating.
        if !self.key_release && self.session.is_soft_dropping() {
            self.soft_drop_ticks_left = self.soft_drop_ticks_left.saturating_sub(1);
            if self.soft_drop_ticks_left == 0 {
                self.session.apply(Command::SoftDropOff);
            }
        }
        self.session.increment_frame();
    }
}

impl App for PlayApp {
    #[expect(clippy::cast_precision_loss)]
    fn init(&mut self, tui: &mut Tui) {
        self.key_release = tui.reports_key_release();
        tui.set_tick_rate(self.session.config().fps as f64);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Some(event) = event.as_key_event() {
            self.handle_key(&event);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session, self.show_ghost);
        let bindings = match self.session.state() {
            SessionState::Playing => PLAYING_KEYS,
            SessionState::Paused => PAUSED_KEYS,
            SessionState::GameOver => GAME_OVER_KEYS,
        };
        let help = KeyBindingDisplay::new(bindings);

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, _tui: &mut Tui) {
        self.tick();
    }
}
