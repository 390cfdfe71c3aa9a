//! Event store and timeline navigation.

use crate::models::{chronological, EventId, TagEvent, TagId};

/// Owns every recorded event, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<TagEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TagEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&TagEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub(crate) fn push(&mut self, event: TagEvent) {
        self.events.push(event);
    }

    pub(crate) fn remove(&mut self, id: EventId) -> Option<TagEvent> {
        let index = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(index))
    }

    /// Remove every event of `tag_id`, returning the removed ids.
    pub(crate) fn remove_by_tag(&mut self, tag_id: TagId) -> Vec<EventId> {
        let removed: Vec<EventId> = self
            .events
            .iter()
            .filter(|e| e.tag_id == tag_id)
            .map(|e| e.id)
            .collect();
        self.events.retain(|e| e.tag_id != tag_id);
        removed
    }

    /// Lazy view of the events matching `filter` (all events when `None`).
    pub fn filter_by_tag(&self, filter: Option<TagId>) -> impl Iterator<Item = &TagEvent> + '_ {
        self.events
            .iter()
            .filter(move |e| filter.map_or(true, |tag_id| e.tag_id == tag_id))
    }

    pub fn count_for_tag(&self, tag_id: TagId) -> usize {
        self.filter_by_tag(Some(tag_id)).count()
    }

    /// The earliest filtered event starting strictly after `current_time`.
    pub fn next_event(&self, current_time: f64, filter: Option<TagId>) -> Option<&TagEvent> {
        self.filter_by_tag(filter)
            .filter(|e| e.start_time > current_time)
            .min_by(|a, b| chronological(a, b))
    }

    /// The latest filtered event starting strictly before `current_time`.
    pub fn prev_event(&self, current_time: f64, filter: Option<TagId>) -> Option<&TagEvent> {
        self.filter_by_tag(filter)
            .filter(|e| e.start_time < current_time)
            .max_by(|a, b| chronological(a, b))
    }

    /// Resolve ids to events, dropping unknown ids, sorted chronologically.
    pub fn resolve_chronological(&self, ids: &[EventId]) -> Vec<&TagEvent> {
        let mut resolved: Vec<&TagEvent> = ids.iter().filter_map(|id| self.get(*id)).collect();
        resolved.sort_by(|a, b| chronological(a, b));
        resolved
    }
}
