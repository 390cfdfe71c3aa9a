//! Named, ordered collections of event references.

use serde::{Deserialize, Serialize};

use super::ids::{EventId, PlaylistId};

/// A named, ordered subset of event references.
///
/// Holds ids only; the events themselves live in the event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub event_ids: Vec<EventId>,
    pub is_active: bool,
}

impl Playlist {
    pub fn new(id: PlaylistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            event_ids: Vec::new(),
            is_active: false,
        }
    }

    pub fn contains(&self, event_id: EventId) -> bool {
        self.event_ids.contains(&event_id)
    }

    pub fn len(&self) -> usize {
        self.event_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_ids.is_empty()
    }
}
