//! Key handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tui::app::Screen;

/// Action to take after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Type a character into the focused setup field.
    Input(char),
    /// Delete the last character of the focused setup field.
    Backspace,
    /// Switch between the goal and duration fields.
    NextField,
    /// Nudge the duration by the given minutes.
    StepDuration(i32),
    /// Commit the goal, or confirm the start of a committed goal.
    Submit,
    /// Run/pause toggle.
    ToggleRunning,
    /// Break toggle.
    ToggleBreak,
    /// Give up on the session.
    Forfeit,
    /// Nudge the focus rating.
    AdjustRating(i8),
}

/// Maps a key press to an action for the given screen.
///
/// Letters are text on the setup screen, so only Esc and Ctrl+C quit there.
pub fn map_key(screen: Screen, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match screen {
        Screen::Setup => map_setup_key(key),
        Screen::Timer => map_timer_key(key),
    }
}

fn map_setup_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::NextField),
        KeyCode::Up => Some(Action::StepDuration(1)),
        KeyCode::Down => Some(Action::StepDuration(-1)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::Input(c))
        }
        _ => None,
    }
}

fn map_timer_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::ToggleRunning),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(Action::ToggleBreak),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(Action::Forfeit),
        KeyCode::Left | KeyCode::Char('-') => Some(Action::AdjustRating(-1)),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::AdjustRating(1)),
        _ => None,
    }
}
