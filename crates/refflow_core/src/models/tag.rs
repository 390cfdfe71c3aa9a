//! Tag definitions.

use serde::{Deserialize, Serialize};

use super::ids::TagId;
use crate::store::{StoreError, StoreResult};

/// A user-defined category of event (e.g. "Goal").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// `#rrggbb` color used for buttons and timeline markers.
    pub color: String,
    /// Lowercase single-character shortcut. Not required to be unique.
    pub shortcut: Option<char>,
    /// Number of events in the store referencing this tag.
    pub usage_count: u32,
}

impl Tag {
    /// Whether `key` (any case) triggers this tag.
    pub fn matches_shortcut(&self, key: char) -> bool {
        self.shortcut
            .map(|s| key.to_lowercase().eq(s.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Raw user input for creating or editing a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDraft {
    pub name: String,
    pub color: String,
    pub shortcut: String,
}

impl TagDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>, shortcut: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            shortcut: shortcut.into(),
        }
    }

    /// Validate and normalize into (name, color, shortcut).
    ///
    /// The name is trimmed and must not be empty, the color must be
    /// `#rrggbb`, and only the first character of the shortcut is kept,
    /// lowercased.
    pub fn normalize(&self) -> StoreResult<(String, String, Option<char>)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid_input("Tag name cannot be empty"));
        }

        let color = self.color.trim();
        if !is_hex_color(color) {
            return Err(StoreError::invalid_input(format!(
                "Invalid tag color '{}', expected #rrggbb",
                color
            )));
        }

        let shortcut = self
            .shortcut
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_lowercase().next());

        Ok((name.to_string(), color.to_lowercase(), shortcut))
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
