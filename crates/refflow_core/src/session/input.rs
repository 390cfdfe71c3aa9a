//! Keyboard shortcuts.

use super::Session;
use crate::media::TimeSource;
use crate::store::ToggleOutcome;

/// A key press as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Char(char),
    Other,
}

impl Key {
    /// Map a key name from a front end (`"Escape"`, `"g"`, ...).
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("escape") || name.eq_ignore_ascii_case("esc") {
            return Key::Escape;
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c),
            _ => Key::Other,
        }
    }
}

/// Where keyboard focus was when the key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Document,
    /// A text field; shortcuts must not fire while typing.
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    /// Escape discarded the in-flight recording.
    Cancelled,
    Recording(ToggleOutcome),
    Ignored,
}

impl<T: TimeSource> Session<T> {
    /// Dispatch a key press.
    ///
    /// Escape cancels a recording regardless of focus. Other keys are
    /// ignored while a text input has focus or tagging mode is off; a
    /// shortcut (case-insensitive, first matching tag wins) toggles
    /// recording of its tag.
    pub fn handle_key(&mut self, key: Key, focus: FocusTarget) -> KeyOutcome {
        if key == Key::Escape && self.cancel_recording() {
            return KeyOutcome::Cancelled;
        }

        if focus == FocusTarget::TextInput || !self.is_tagging() {
            return KeyOutcome::Ignored;
        }

        let Key::Char(c) = key else {
            return KeyOutcome::Ignored;
        };

        let Some(tag_id) = self.store().catalog().find_by_shortcut(c).map(|t| t.id) else {
            return KeyOutcome::Ignored;
        };

        match self.toggle_recording(tag_id) {
            Ok(outcome) => KeyOutcome::Recording(outcome),
            Err(_) => KeyOutcome::Ignored,
        }
    }
}
