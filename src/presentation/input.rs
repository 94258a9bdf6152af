use crate::application::{App, AppMode, Effect};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    /// Ctrl+Q leaves the kiosk; plain letters are reserved for the keypad.
    pub fn is_quit(key: KeyCode, modifiers: KeyModifiers) -> bool {
        modifiers.contains(KeyModifiers::CONTROL) && matches!(key, KeyCode::Char('q') | KeyCode::Char('c'))
    }

    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Vec<Effect> {
        if app.alert.is_some() {
            Self::handle_alert(app, key);
            return Vec::new();
        }
        if app.show_help {
            Self::handle_help(app, key);
            return Vec::new();
        }
        if key == KeyCode::F(1) {
            app.toggle_help();
            return Vec::new();
        }
        if modifiers.contains(KeyModifiers::CONTROL) {
            return Vec::new();
        }

        match app.mode {
            AppMode::Identify => Self::handle_identify_mode(app, key),
            AppMode::Voting => Self::handle_voting_mode(app, key),
            AppMode::Confirmation => Vec::new(),
        }
    }

    fn handle_alert(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_alert();
        }
    }

    fn handle_help(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::F(1)) {
            app.toggle_help();
        }
    }

    fn handle_identify_mode(app: &mut App, key: KeyCode) -> Vec<Effect> {
        match key {
            KeyCode::Char(c) => app.push_cpf_char(c),
            KeyCode::Backspace => app.pop_cpf_char(),
            KeyCode::Esc => app.set_cpf_input(""),
            KeyCode::Enter => app.start_voting(),
            _ => Vec::new(),
        }
    }

    fn handle_voting_mode(app: &mut App, key: KeyCode) -> Vec<Effect> {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => app.press(c),
            KeyCode::Char('b') | KeyCode::Char('B') => app.blank_vote(),
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Backspace => app.correct(),
            KeyCode::Enter => app.confirm_vote(),
            _ => Vec::new(),
        }
    }
}
