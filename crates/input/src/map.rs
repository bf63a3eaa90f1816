//! Key mapping from terminal events to raw key identifiers.

use crate::types::{KeyId, RawEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// How a terminal reports key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeReporting {
    /// Press, repeat and release events are reported
    PressRelease,
    /// Only presses (and repeats) arrive; hold duration is unknowable
    PressOnly,
}

impl EdgeReporting {
    /// Release timeout the classifier should run with. Real key-up edges make
    /// it unnecessary, and a long OS repeat delay would cut holds short.
    pub fn release_timeout(self, configured: Option<u64>) -> Option<u64> {
        match self {
            EdgeReporting::PressRelease => None,
            EdgeReporting::PressOnly => configured,
        }
    }
}

/// Map a terminal key to a raw key identifier.
pub fn key_id(key: KeyEvent) -> Option<KeyId> {
    if should_quit(key) {
        return Some(KeyId::Escape);
    }
    match key.code {
        KeyCode::Esc => Some(KeyId::Escape),
        KeyCode::Up => Some(KeyId::Up),
        KeyCode::Down => Some(KeyId::Down),
        KeyCode::Left => Some(KeyId::Left),
        KeyCode::Right => Some(KeyId::Right),
        KeyCode::Char(' ') => Some(KeyId::ToggleCell),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(KeyId::ToggleContinuous),
        KeyCode::Enter => Some(KeyId::Confirm),
        KeyCode::Backspace => Some(KeyId::Reset),
        _ => None,
    }
}

/// Map a terminal key event to a timestamped raw event.
pub fn raw_event(key: KeyEvent, at_ms: u64, reporting: EdgeReporting) -> Option<RawEvent> {
    let id = key_id(key)?;
    match (reporting, key.kind) {
        (EdgeReporting::PressRelease, KeyEventKind::Press | KeyEventKind::Repeat) => {
            Some(RawEvent::down(id, at_ms))
        }
        (EdgeReporting::PressRelease, KeyEventKind::Release) => Some(RawEvent::up(id, at_ms)),
        (EdgeReporting::PressOnly, KeyEventKind::Press | KeyEventKind::Repeat) => {
            Some(RawEvent::tap(id, at_ms))
        }
        (EdgeReporting::PressOnly, KeyEventKind::Release) => None,
    }
}

/// Check if key should quit the appliance.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
