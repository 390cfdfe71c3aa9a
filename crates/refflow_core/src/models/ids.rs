//! Strongly typed identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Tag`](super::Tag).
    TagId,
    "tag-"
);
define_id!(
    /// Identifier of a [`TagEvent`](super::TagEvent). Allocated in creation order.
    EventId,
    "event-"
);
define_id!(
    /// Identifier of a [`Playlist`](super::Playlist).
    PlaylistId,
    "playlist-"
);

/// Monotonic id source shared by every kind of entity in a session.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn next_tag(&mut self) -> TagId {
        TagId(self.bump())
    }

    pub fn next_event(&mut self) -> EventId {
        EventId(self.bump())
    }

    pub fn next_playlist(&mut self) -> PlaylistId {
        PlaylistId(self.bump())
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut ids = IdSequence::new();
        let tag = ids.next_tag();
        let event = ids.next_event();
        let playlist = ids.next_playlist();

        assert_eq!((tag.0, event.0, playlist.0), (1, 2, 3));
        assert!(ids.next_event() > event);
    }

    #[test]
    fn display_has_kind_prefix() {
        assert_eq!(EventId(7).to_string(), "event-7");
        assert_eq!(serde_json::to_string(&TagId(3)).unwrap(), "3");
    }
}
