//! Annotation store: tag catalog, event store, playlists and the recorder.
//!
//! [`AnnotationStore`] is the only mutation surface for annotation data.
//! Cross-cutting rules live here:
//!
//! - a finished recording becomes an event and bumps its tag's usage count
//! - deleting an event decrements the count and drops it from every playlist
//! - deleting a tag drops its events (and their playlist entries), and
//!   cancels an in-flight recording of that tag
//!
//! so `usage_count` always equals the number of events referencing the tag
//! and playlists never reference missing events.

mod catalog;
mod errors;
mod events;
mod playlists;
mod recording;

pub use catalog::TagCatalog;
pub use errors::{StoreError, StoreResult};
pub use events::EventStore;
pub use playlists::PlaylistManager;
pub use recording::{FinishedRecording, RecordingMachine, RecordingState, ToggleOutcome};

use crate::models::{
    ActiveRecording, EventId, IdSequence, Playlist, PlaylistId, Tag, TagDraft, TagEvent, TagId,
};

/// Built-in tags of a fresh session: (name, color, shortcut).
pub const DEFAULT_TAGS: [(&str, &str, char); 6] = [
    ("Attack", "#ef4444", 'a'),
    ("Pass", "#f97316", 'p'),
    ("Goal", "#10b981", 'g'),
    ("Foul", "#3b82f6", 'f'),
    ("Defense", "#8b5cf6", 'd'),
    ("Corner", "#ec4899", 'c'),
];

/// Built-in playlists of a fresh session. The first one starts active.
pub const DEFAULT_PLAYLISTS: [&str; 2] = ["Attacking Plays", "Defensive Actions"];

/// Aggregate owning all annotation state of a session.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    ids: IdSequence,
    catalog: TagCatalog,
    events: EventStore,
    playlists: PlaylistManager,
    recorder: RecordingMachine,
}

impl AnnotationStore {
    /// An empty store with no tags or playlists.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with [`DEFAULT_TAGS`] and [`DEFAULT_PLAYLISTS`].
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        for (name, color, shortcut) in DEFAULT_TAGS {
            let id = store.ids.next_tag();
            store.catalog.insert(Tag {
                id,
                name: name.to_string(),
                color: color.to_string(),
                shortcut: Some(shortcut),
                usage_count: 0,
            });
        }
        for (index, name) in DEFAULT_PLAYLISTS.iter().enumerate() {
            let mut playlist = Playlist::new(store.ids.next_playlist(), *name);
            playlist.is_active = index == 0;
            store.playlists.insert(playlist);
        }
        store
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn playlists(&self) -> &PlaylistManager {
        &self.playlists
    }

    pub fn recorder(&self) -> &RecordingMachine {
        &self.recorder
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.catalog.get(id)
    }

    pub fn event(&self, id: EventId) -> Option<&TagEvent> {
        self.events.get(id)
    }

    pub fn playlist(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.get(id)
    }

    // ---- tags ----

    pub fn add_tag(&mut self, draft: &TagDraft) -> StoreResult<&Tag> {
        let (name, color, shortcut) = draft.normalize()?;
        let id = self.ids.next_tag();
        tracing::info!(%id, name = %name, "Tag added");
        self.catalog.insert(Tag {
            id,
            name,
            color,
            shortcut,
            usage_count: 0,
        });
        self.catalog.get(id).ok_or(StoreError::TagNotFound(id))
    }

    /// Replace a tag's name, color and shortcut. The usage count is kept.
    pub fn update_tag(&mut self, id: TagId, draft: &TagDraft) -> StoreResult<&Tag> {
        let (name, color, shortcut) = draft.normalize()?;
        let tag = self.catalog.get_mut(id).ok_or(StoreError::TagNotFound(id))?;
        tag.name = name;
        tag.color = color;
        tag.shortcut = shortcut;
        tracing::info!(%id, "Tag updated");
        Ok(&*tag)
    }

    /// Delete a tag and every event referencing it.
    ///
    /// Returns the removed events' ids.
    pub fn delete_tag(&mut self, id: TagId) -> StoreResult<Vec<EventId>> {
        let tag = self.catalog.remove(id).ok_or(StoreError::TagNotFound(id))?;

        if self.recorder.active().map(|a| a.tag_id) == Some(id) {
            self.recorder.cancel();
        }

        let removed = self.events.remove_by_tag(id);
        for event_id in &removed {
            self.playlists.purge_event(*event_id);
        }

        tracing::info!(%id, name = %tag.name, events = removed.len(), "Tag deleted");
        Ok(removed)
    }

    // ---- recording ----

    /// Start recording `tag_id` at `now`.
    ///
    /// Returns `Ok(None)` when a recording is already in flight.
    pub fn start_recording(&mut self, tag_id: TagId, now: f64) -> StoreResult<Option<ActiveRecording>> {
        if !self.catalog.contains(tag_id) {
            return Err(StoreError::TagNotFound(tag_id));
        }
        Ok(self.recorder.start(tag_id, now))
    }

    /// Stop the in-flight recording at `now`, turning it into an event.
    pub fn stop_recording(&mut self, now: f64) -> Option<&TagEvent> {
        let finished = self.recorder.stop(now)?;
        Some(self.finalize(finished))
    }

    pub fn cancel_recording(&mut self) -> Option<ActiveRecording> {
        self.recorder.cancel()
    }

    /// Toggle recording of `tag_id`, finalizing the event on stop.
    pub fn toggle_recording(&mut self, tag_id: TagId, now: f64) -> StoreResult<ToggleOutcome> {
        if !self.catalog.contains(tag_id) {
            return Err(StoreError::TagNotFound(tag_id));
        }
        let outcome = self.recorder.toggle(tag_id, now);
        if let ToggleOutcome::Stopped(finished) = outcome {
            self.finalize(finished);
        }
        Ok(outcome)
    }

    fn finalize(&mut self, finished: FinishedRecording) -> &TagEvent {
        let id = self.ids.next_event();
        let event = TagEvent {
            id,
            tag_id: finished.tag_id,
            start_time: finished.start_time,
            end_time: finished.end_time,
        };
        if event.is_inverted() {
            tracing::warn!(%id, start = event.start_time, end = event.end_time, "Recorded an inverted interval");
        }
        tracing::info!(%id, tag_id = %event.tag_id, start = event.start_time, end = event.end_time, "Event recorded");

        self.catalog.increment_usage(finished.tag_id);
        self.events.push(event);
        &self.events.events()[self.events.len() - 1]
    }

    // ---- events ----

    /// Delete an event, decrementing its tag's count and removing it from playlists.
    pub fn delete_event(&mut self, id: EventId) -> StoreResult<TagEvent> {
        let event = self.events.remove(id).ok_or(StoreError::EventNotFound(id))?;
        self.catalog.decrement_usage(event.tag_id);
        let purged = self.playlists.purge_event(id);
        tracing::info!(%id, playlist_refs = purged, "Event deleted");
        Ok(event)
    }

    // ---- playlists ----

    pub fn create_playlist(&mut self, name: &str) -> StoreResult<&Playlist> {
        let id = self.ids.next_playlist();
        let playlist = self.playlists.create(id, name)?;
        tracing::info!(%id, name = %playlist.name, "Playlist created");
        Ok(playlist)
    }

    pub fn set_active_playlist(&mut self, id: PlaylistId) -> StoreResult<()> {
        self.playlists.set_active(id)?;
        tracing::debug!(%id, "Active playlist changed");
        Ok(())
    }

    pub fn active_playlist(&self) -> Option<&Playlist> {
        self.playlists.active()
    }

    /// Append an event to a playlist. Both must exist; duplicates are not checked.
    pub fn add_event_to_playlist(&mut self, id: PlaylistId, event_id: EventId) -> StoreResult<()> {
        if self.events.get(event_id).is_none() {
            return Err(StoreError::EventNotFound(event_id));
        }
        self.playlists.add_event(id, event_id)
    }

    pub fn remove_event_from_playlist(&mut self, id: PlaylistId, event_id: EventId) -> StoreResult<bool> {
        self.playlists.remove_event(id, event_id)
    }

    pub fn reorder_playlist(&mut self, id: PlaylistId, from: usize, to: usize) -> StoreResult<()> {
        self.playlists.reorder(id, from, to)
    }

    pub fn delete_playlist(&mut self, id: PlaylistId) -> StoreResult<Playlist> {
        let playlist = self.playlists.delete(id)?;
        tracing::info!(%id, name = %playlist.name, "Playlist deleted");
        Ok(playlist)
    }

    /// A playlist's events in chronological order, unknown ids dropped.
    pub fn playlist_events(&self, id: PlaylistId) -> StoreResult<Vec<&TagEvent>> {
        let playlist = self.playlists.get(id).ok_or(StoreError::PlaylistNotFound(id))?;
        Ok(self.events.resolve_chronological(&playlist.event_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_match(store: &AnnotationStore) -> bool {
        store
            .catalog()
            .tags()
            .iter()
            .all(|t| t.usage_count as usize == store.events().count_for_tag(t.id))
    }

    fn record(store: &mut AnnotationStore, tag: TagId, start: f64, end: f64) -> EventId {
        store.start_recording(tag, start).unwrap();
        store.stop_recording(end).unwrap().id
    }

    #[test]
    fn defaults_are_seeded() {
        let store = AnnotationStore::with_defaults();
        assert_eq!(store.catalog().len(), 6);
        assert_eq!(store.catalog().find_by_shortcut('g').unwrap().name, "Goal");
        assert_eq!(store.playlists().playlists().len(), 2);
        assert_eq!(store.active_playlist().unwrap().name, "Attacking Plays");
        let active = store.playlists().playlists().iter().filter(|p| p.is_active).count();
        assert_eq!(active, 1);
    }

    #[test]
    fn seeded_ids_continue_sequence() {
        let mut store = AnnotationStore::with_defaults();
        let seeded: Vec<PlaylistId> = store.playlists().playlists().iter().map(|p| p.id).collect();
        let created = store.create_playlist("Saves").unwrap().id;
        assert!(!seeded.contains(&created));
    }

    #[test]
    fn stop_creates_event_and_counts() {
        let mut store = AnnotationStore::with_defaults();
        let goal = store.catalog().find_by_shortcut('g').unwrap().id;

        let id = record(&mut store, goal, 12.0, 18.0);

        let event = store.event(id).unwrap();
        assert_eq!((event.start_time, event.end_time), (12.0, 18.0));
        assert_eq!(store.tag(goal).unwrap().usage_count, 1);
        assert!(!store.recorder().is_recording());
    }

    #[test]
    fn start_with_unknown_tag_is_rejected() {
        let mut store = AnnotationStore::new();
        assert_eq!(
            store.start_recording(TagId(77), 0.0),
            Err(StoreError::TagNotFound(TagId(77)))
        );
        assert!(!store.recorder().is_recording());
    }

    #[test]
    fn delete_event_cascades_into_playlists() {
        let mut store = AnnotationStore::with_defaults();
        let goal = store.catalog().find_by_shortcut('g').unwrap().id;
        let playlist = store.active_playlist().unwrap().id;
        let id = record(&mut store, goal, 1.0, 2.0);
        store.add_event_to_playlist(playlist, id).unwrap();

        store.delete_event(id).unwrap();

        assert_eq!(store.tag(goal).unwrap().usage_count, 0);
        assert!(store.playlist(playlist).unwrap().is_empty());
        assert_eq!(store.delete_event(id), Err(StoreError::EventNotFound(id)));
    }

    #[test]
    fn delete_tag_removes_its_events_everywhere() {
        let mut store = AnnotationStore::with_defaults();
        let goal = store.catalog().find_by_shortcut('g').unwrap().id;
        let foul = store.catalog().find_by_shortcut('f').unwrap().id;
        let playlist = store.active_playlist().unwrap().id;

        let g = record(&mut store, goal, 1.0, 2.0);
        let f = record(&mut store, foul, 3.0, 4.0);
        store.add_event_to_playlist(playlist, g).unwrap();
        store.add_event_to_playlist(playlist, f).unwrap();

        let removed = store.delete_tag(goal).unwrap();

        assert_eq!(removed, vec![g]);
        assert_eq!(store.events().len(), 1);
        assert_eq!(store.playlist(playlist).unwrap().event_ids, vec![f]);
        assert!(counts_match(&store));
    }

    #[test]
    fn delete_tag_cancels_its_recording() {
        let mut store = AnnotationStore::with_defaults();
        let goal = store.catalog().find_by_shortcut('g').unwrap().id;
        store.start_recording(goal, 5.0).unwrap();

        store.delete_tag(goal).unwrap();

        assert!(!store.recorder().is_recording());
        assert!(store.stop_recording(9.0).is_none());
        assert!(store.events().is_empty());
    }

    #[test]
    fn update_tag_keeps_usage_count() {
        let mut store = AnnotationStore::with_defaults();
        let goal = store.catalog().find_by_shortcut('g').unwrap().id;
        record(&mut store, goal, 1.0, 2.0);

        let updated = store
            .update_tag(goal, &TagDraft::new("Golazo", "#00FF00", "z"))
            .unwrap();
        assert_eq!(updated.name, "Golazo");
        assert_eq!(updated.shortcut, Some('z'));
        assert_eq!(updated.usage_count, 1);
    }

    #[test]
    fn add_event_to_playlist_requires_known_event() {
        let mut store = AnnotationStore::with_defaults();
        let playlist = store.active_playlist().unwrap().id;
        assert_eq!(
            store.add_event_to_playlist(playlist, EventId(500)),
            Err(StoreError::EventNotFound(EventId(500)))
        );
    }

    #[test]
    fn playlist_events_are_chronological() {
        let mut store = AnnotationStore::with_defaults();
        let goal = store.catalog().find_by_shortcut('g').unwrap().id;
        let playlist = store.active_playlist().unwrap().id;
        let late = record(&mut store, goal, 10.0, 15.0);
        let early = record(&mut store, goal, 2.0, 5.0);
        store.add_event_to_playlist(playlist, late).unwrap();
        store.add_event_to_playlist(playlist, early).unwrap();

        let ordered: Vec<EventId> = store
            .playlist_events(playlist)
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ordered, vec![early, late]);
    }
}
