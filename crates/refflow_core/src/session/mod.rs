//! Session controller: the single owner of annotation and playback state.
//!
//! A front end forwards user intents (key presses, clicks, transport
//! commands) into a [`Session`] and renders its read-only projection.
//! Every discrete action queues a [`Notice`]; rejected actions leave the
//! state untouched.

mod export;
mod input;
mod notice;
mod snapshot;

pub use export::ExportJob;
pub use input::{FocusTarget, Key, KeyOutcome};
pub use notice::{Notice, NoticeLevel};
pub use snapshot::SessionSnapshot;

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::export::{ExportGate, ExportStatus};
use crate::media::{ManualClock, MediaError, MediaResult, TimeSource, VideoSource};
use crate::models::{ActiveRecording, EventId, PlaybackState, PlaylistId, TagDraft, TagId};
use crate::store::{AnnotationStore, StoreError, StoreResult, ToggleOutcome};
use crate::timeline::{time_at_fraction, TimelineLayout};

/// What a tag button click did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagClick {
    /// Tagging mode: recording toggled.
    Recording(ToggleOutcome),
    /// Browsing mode: the timeline filter is now this.
    Filter(Option<TagId>),
}

/// One annotation session over one video.
pub struct Session<T: TimeSource = ManualClock> {
    store: AnnotationStore,
    playback: PlaybackState,
    clock: T,
    settings: Settings,
    tagging_mode: bool,
    video: Option<VideoSource>,
    notices: VecDeque<Notice>,
    export_gate: ExportGate,
    export_status: Arc<watch::Sender<ExportStatus>>,
    export_cancel: CancellationToken,
}

impl Session<ManualClock> {
    /// Session with default tags and playlists over a manual clock.
    pub fn headless(settings: Settings) -> Self {
        Self::new(settings, ManualClock::new())
    }
}

impl<T: TimeSource> Session<T> {
    /// Session seeded with the default tags and playlists.
    pub fn new(settings: Settings, clock: T) -> Self {
        Self::with_store(settings, clock, AnnotationStore::with_defaults())
    }

    /// Session with no tags and no playlists.
    pub fn empty(settings: Settings, clock: T) -> Self {
        Self::with_store(settings, clock, AnnotationStore::new())
    }

    fn with_store(settings: Settings, clock: T, store: AnnotationStore) -> Self {
        let (status, _) = watch::channel(ExportStatus::Idle);
        let mut session = Self {
            store,
            playback: PlaybackState::new(),
            clock,
            settings,
            tagging_mode: false,
            video: None,
            notices: VecDeque::new(),
            export_gate: ExportGate::new(),
            export_status: Arc::new(status),
            export_cancel: CancellationToken::new(),
        };
        session.sync_clock();
        session
    }

    // ---- read-only projection ----

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Direct access to the time source, e.g. to advance a [`ManualClock`].
    ///
    /// Call [`sync_clock`](Self::sync_clock) afterwards, or forward the
    /// change through the `on_*` notifications.
    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }

    pub fn is_tagging(&self) -> bool {
        self.tagging_mode
    }

    pub fn video(&self) -> Option<&VideoSource> {
        self.video.as_ref()
    }

    pub fn active_recording(&self) -> Option<&ActiveRecording> {
        self.store.recorder().active()
    }

    pub fn timeline_layout(&self) -> TimelineLayout {
        TimelineLayout::compute(&self.store, &self.playback)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    // ---- notices ----

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn notify(&mut self, notice: Notice) {
        tracing::debug!(level = ?notice.level, message = %notice.message, "Notice");
        self.notices.push_back(notice);
    }

    fn reject(&mut self, err: &StoreError) {
        tracing::warn!(error = %err, "Rejected");
        self.notify(Notice::error(err.to_string()));
    }

    // ---- time source ----

    /// Pull position, duration, play state and rate from the time source.
    ///
    /// `PlaybackState` is what every operation reads. It changes only here,
    /// through the `on_*` notifications, and through the session's own
    /// seeks. An unknown clock duration keeps the last notified one.
    pub fn sync_clock(&mut self) {
        self.playback.current_time = self.clock.current_time();
        if let Some(duration) = self.clock.duration() {
            self.playback.duration = duration;
        }
        self.playback.is_playing = self.clock.is_playing();
        self.playback.rate = self.clock.rate();
    }

    /// Time-update notification from the media element.
    pub fn on_time_update(&mut self, time: f64) {
        if time.is_finite() {
            self.playback.current_time = time.max(0.0);
        }
    }

    /// Metadata notification: the duration is now known.
    pub fn on_duration_change(&mut self, duration: f64) {
        if duration.is_finite() && duration >= 0.0 {
            self.playback.duration = duration;
        }
    }

    pub fn on_play_state(&mut self, playing: bool) {
        self.playback.is_playing = playing;
    }

    fn now(&self) -> f64 {
        self.playback.current_time
    }

    // ---- video ----

    /// Load a video file, resetting the transport until metadata arrives.
    pub fn load_video(&mut self, path: impl AsRef<Path>) -> MediaResult<()> {
        match VideoSource::open(path.as_ref()) {
            Ok(source) => {
                tracing::info!(path = %source.path().display(), "Video loaded");
                self.video = Some(source);
                self.clock.pause();
                self.clock.seek(0.0);
                self.playback.current_time = 0.0;
                self.playback.duration = 0.0;
                self.playback.is_playing = false;
                self.notify(Notice::success("Video loaded successfully"));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Video rejected");
                let message = match &err {
                    MediaError::NotAVideo { .. } => "Please select a valid video file".to_string(),
                    MediaError::NotFound { .. } => err.to_string(),
                };
                self.notify(Notice::error(message));
                Err(err)
            }
        }
    }

    // ---- transport ----

    /// Seek to `time`, clamped into `[0, duration]`. Returns the actual position.
    pub fn jump_to_time(&mut self, time: f64) -> f64 {
        let clamped = self.playback.clamp_time(time);
        self.clock.seek(clamped);
        self.playback.current_time = clamped;
        clamped
    }

    /// Seek relative to the current position.
    pub fn skip(&mut self, seconds: f64) -> f64 {
        let target = self.now() + seconds;
        self.jump_to_time(target)
    }

    pub fn skip_forward(&mut self) -> f64 {
        self.skip(self.settings.playback.skip_seconds)
    }

    pub fn skip_back(&mut self) -> f64 {
        self.skip(-self.settings.playback.skip_seconds)
    }

    /// Returns whether playback is now running.
    pub fn toggle_play_pause(&mut self) -> bool {
        if self.clock.is_playing() {
            self.clock.pause();
        } else {
            self.clock.play();
        }
        self.playback.is_playing = self.clock.is_playing();
        self.playback.is_playing
    }

    /// Change the playback rate. Non-positive rates are rejected.
    pub fn set_rate(&mut self, rate: f64) -> StoreResult<()> {
        if !rate.is_finite() || rate <= 0.0 {
            let err = StoreError::invalid_input(format!("Invalid playback rate: {}", rate));
            self.reject(&err);
            return Err(err);
        }
        self.clock.set_rate(rate);
        self.playback.rate = self.clock.rate();
        Ok(())
    }

    // ---- timeline ----

    pub fn zoom_in(&mut self) -> f64 {
        let zoom = self.playback.timeline_zoom() + self.settings.playback.zoom_step;
        self.playback.set_timeline_zoom(zoom)
    }

    pub fn zoom_out(&mut self) -> f64 {
        let zoom = self.playback.timeline_zoom() - self.settings.playback.zoom_step;
        self.playback.set_timeline_zoom(zoom)
    }

    pub fn set_timeline_zoom(&mut self, zoom: f64) -> f64 {
        self.playback.set_timeline_zoom(zoom)
    }

    pub fn set_timeline_scroll(&mut self, scroll: f64) {
        if scroll.is_finite() {
            self.playback.timeline_scroll = scroll.max(0.0);
        }
    }

    /// Seek to the position under a click at `fraction` of the track.
    pub fn seek_fraction(&mut self, fraction: f64) -> Option<f64> {
        let time = time_at_fraction(fraction, self.playback.duration)?;
        Some(self.jump_to_time(time))
    }

    // ---- navigation ----

    /// Jump to the next (filtered) event start after the playhead.
    pub fn jump_to_next_event(&mut self) -> Option<f64> {
        let now = self.now();
        let target = self
            .store
            .events()
            .next_event(now, self.playback.selected_tag_filter)?
            .start_time;
        Some(self.jump_to_time(target))
    }

    /// Jump to the previous (filtered) event start before the playhead.
    pub fn jump_to_prev_event(&mut self) -> Option<f64> {
        let now = self.now();
        let target = self
            .store
            .events()
            .prev_event(now, self.playback.selected_tag_filter)?
            .start_time;
        Some(self.jump_to_time(target))
    }

    pub fn jump_to_event(&mut self, id: EventId) -> StoreResult<f64> {
        let start = self.store.event(id).ok_or(StoreError::EventNotFound(id))?.start_time;
        Ok(self.jump_to_time(start))
    }

    // ---- tagging mode and filter ----

    pub fn toggle_tagging_mode(&mut self) -> bool {
        self.set_tagging_mode(!self.tagging_mode);
        self.tagging_mode
    }

    pub fn set_tagging_mode(&mut self, on: bool) {
        self.tagging_mode = on;
        tracing::debug!(tagging = on, "Tagging mode changed");
    }

    pub fn set_tag_filter(&mut self, filter: Option<TagId>) {
        self.playback.selected_tag_filter = filter;
    }

    /// Click on a tag button: toggles recording while tagging, else the filter.
    pub fn click_tag(&mut self, tag_id: TagId) -> StoreResult<TagClick> {
        if !self.store.catalog().contains(tag_id) {
            let err = StoreError::TagNotFound(tag_id);
            self.reject(&err);
            return Err(err);
        }

        if self.tagging_mode {
            return self.toggle_recording(tag_id).map(TagClick::Recording);
        }

        let filter = if self.playback.selected_tag_filter == Some(tag_id) {
            None
        } else {
            Some(tag_id)
        };
        self.set_tag_filter(filter);
        Ok(TagClick::Filter(filter))
    }

    // ---- tags ----

    pub fn add_tag(&mut self, draft: &TagDraft) -> StoreResult<TagId> {
        match self.store.add_tag(draft) {
            Ok(tag) => {
                let id = tag.id;
                self.notify(Notice::success("Tag added"));
                Ok(id)
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    pub fn update_tag(&mut self, id: TagId, draft: &TagDraft) -> StoreResult<()> {
        match self.store.update_tag(id, draft) {
            Ok(_) => {
                self.notify(Notice::success("Tag updated"));
                Ok(())
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    /// Delete a tag with all its events; clears the filter if it pointed at it.
    pub fn delete_tag(&mut self, id: TagId) -> StoreResult<Vec<EventId>> {
        match self.store.delete_tag(id) {
            Ok(removed) => {
                if self.playback.selected_tag_filter == Some(id) {
                    self.playback.selected_tag_filter = None;
                }
                self.notify(Notice::success("Tag deleted"));
                Ok(removed)
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    // ---- recording ----

    /// Start recording `tag_id` at the playhead. A second start is a no-op.
    pub fn start_recording(&mut self, tag_id: TagId) -> StoreResult<Option<ActiveRecording>> {
        let now = self.now();
        self.store.start_recording(tag_id, now).map_err(|err| {
            tracing::warn!(error = %err, "Recording not started");
            err
        })
    }

    /// Finish the in-flight recording at the playhead.
    pub fn stop_recording(&mut self) -> Option<EventId> {
        let now = self.now();
        self.store.stop_recording(now).map(|event| event.id)
    }

    /// Discard the in-flight recording. Returns whether one was discarded.
    pub fn cancel_recording(&mut self) -> bool {
        self.store.cancel_recording().is_some()
    }

    pub fn toggle_recording(&mut self, tag_id: TagId) -> StoreResult<ToggleOutcome> {
        let now = self.now();
        match self.store.toggle_recording(tag_id, now) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    // ---- events ----

    pub fn delete_event(&mut self, id: EventId) -> StoreResult<()> {
        match self.store.delete_event(id) {
            Ok(_) => {
                self.notify(Notice::success("Event deleted"));
                Ok(())
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    // ---- playlists ----

    pub fn create_playlist(&mut self, name: &str) -> StoreResult<PlaylistId> {
        match self.store.create_playlist(name) {
            Ok(playlist) => {
                let id = playlist.id;
                self.notify(Notice::success("Playlist created"));
                Ok(id)
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    pub fn set_active_playlist(&mut self, id: PlaylistId) -> StoreResult<()> {
        match self.store.set_active_playlist(id) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    /// Append an event to the active playlist unless it is already there.
    ///
    /// Returns whether the event was added.
    pub fn add_to_active_playlist(&mut self, event_id: EventId) -> StoreResult<bool> {
        let active = self
            .store
            .active_playlist()
            .map(|p| (p.id, p.contains(event_id)));
        let Some((playlist_id, present)) = active else {
            self.notify(Notice::error("Please select a playlist first"));
            return Err(StoreError::invalid_input("No active playlist"));
        };

        if present {
            self.notify(Notice::info("Event already in playlist"));
            return Ok(false);
        }

        match self.store.add_event_to_playlist(playlist_id, event_id) {
            Ok(()) => {
                self.notify(Notice::success("Event added to playlist"));
                Ok(true)
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    /// Returns whether the event was in the playlist.
    pub fn remove_event_from_playlist(&mut self, id: PlaylistId, event_id: EventId) -> StoreResult<bool> {
        match self.store.remove_event_from_playlist(id, event_id) {
            Ok(removed) => {
                if removed {
                    self.notify(Notice::success("Event removed from playlist"));
                }
                Ok(removed)
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    pub fn reorder_playlist(&mut self, id: PlaylistId, from: usize, to: usize) -> StoreResult<()> {
        match self.store.reorder_playlist(id, from, to) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    pub fn delete_playlist(&mut self, id: PlaylistId) -> StoreResult<()> {
        match self.store.delete_playlist(id) {
            Ok(_) => {
                self.notify(Notice::success("Playlist deleted"));
                Ok(())
            }
            Err(err) => {
                self.reject(&err);
                Err(err)
            }
        }
    }

    /// Jump to the chronologically first event of the active playlist.
    pub fn play_all(&mut self) -> Option<f64> {
        let first = self
            .store
            .active_playlist()
            .map(|p| self.store.events().resolve_chronological(&p.event_ids))
            .and_then(|events| events.first().map(|e| e.start_time));

        match first {
            Some(start) => {
                let position = self.jump_to_time(start);
                self.notify(Notice::success("Playing playlist"));
                Some(position)
            }
            None => {
                self.notify(Notice::error("No events in playlist"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Settings::default(), ManualClock::with_duration(120.0))
    }

    fn tag(session: &Session, key: char) -> TagId {
        session.store().catalog().find_by_shortcut(key).unwrap().id
    }

    fn record(session: &mut Session, key: char, start: f64, end: f64) -> EventId {
        let id = tag(session, key);
        session.jump_to_time(start);
        session.start_recording(id).unwrap();
        session.jump_to_time(end);
        session.stop_recording().unwrap()
    }

    #[test]
    fn recording_uses_playhead() {
        let mut s = session();
        let event = record(&mut s, 'g', 12.0, 18.5);
        let event = s.store().event(event).unwrap();
        assert_eq!((event.start_time, event.end_time), (12.0, 18.5));
    }

    #[test]
    fn jump_clamps_into_duration() {
        let mut s = session();
        assert_eq!(s.jump_to_time(-4.0), 0.0);
        assert_eq!(s.jump_to_time(500.0), 120.0);
        assert_eq!(s.clock().current_time(), 120.0);
    }

    #[test]
    fn skip_uses_configured_step() {
        let mut s = session();
        s.jump_to_time(10.0);
        assert_eq!(s.skip_forward(), 15.0);
        assert_eq!(s.skip_back(), 10.0);
        assert_eq!(s.skip(-30.0), 0.0);
    }

    #[test]
    fn next_and_prev_respect_filter() {
        let mut s = session();
        record(&mut s, 'g', 10.0, 12.0);
        record(&mut s, 'f', 20.0, 22.0);
        record(&mut s, 'g', 30.0, 32.0);

        s.jump_to_time(0.0);
        assert_eq!(s.jump_to_next_event(), Some(10.0));
        assert_eq!(s.jump_to_next_event(), Some(20.0));

        s.set_tag_filter(Some(tag(&s, 'g')));
        assert_eq!(s.jump_to_next_event(), Some(30.0));
        assert_eq!(s.jump_to_next_event(), None);
        assert_eq!(s.jump_to_prev_event(), Some(10.0));
    }

    #[test]
    fn click_tag_depends_on_mode() {
        let mut s = session();
        let goal = tag(&s, 'g');

        assert_eq!(s.click_tag(goal).unwrap(), TagClick::Filter(Some(goal)));
        assert_eq!(s.click_tag(goal).unwrap(), TagClick::Filter(None));

        s.toggle_tagging_mode();
        assert!(matches!(
            s.click_tag(goal).unwrap(),
            TagClick::Recording(ToggleOutcome::Started(_))
        ));
        assert!(matches!(
            s.click_tag(goal).unwrap(),
            TagClick::Recording(ToggleOutcome::Stopped(_))
        ));
        assert_eq!(s.store().events().len(), 1);
    }

    #[test]
    fn add_to_active_playlist_checks_presence() {
        let mut s = session();
        let event = record(&mut s, 'a', 1.0, 3.0);

        assert_eq!(s.add_to_active_playlist(event), Ok(true));
        assert_eq!(s.add_to_active_playlist(event), Ok(false));

        let messages: Vec<String> = s.drain_notices().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["Event added to playlist", "Event already in playlist"]);
    }

    #[test]
    fn add_without_active_playlist_is_rejected() {
        let mut s = session();
        let event = record(&mut s, 'a', 1.0, 3.0);
        let active = s.store().active_playlist().unwrap().id;
        s.delete_playlist(active).unwrap();
        s.drain_notices();

        assert!(s.add_to_active_playlist(event).is_err());
        assert_eq!(s.drain_notices(), vec![Notice::error("Please select a playlist first")]);
    }

    #[test]
    fn play_all_seeks_to_first_chronological_event() {
        let mut s = session();
        let late = record(&mut s, 'a', 40.0, 45.0);
        let early = record(&mut s, 'a', 5.0, 8.0);
        s.add_to_active_playlist(late).unwrap();
        s.add_to_active_playlist(early).unwrap();
        s.drain_notices();

        assert_eq!(s.play_all(), Some(5.0));
        assert_eq!(s.drain_notices(), vec![Notice::success("Playing playlist")]);
    }

    #[test]
    fn play_all_on_empty_playlist() {
        let mut s = session();
        assert_eq!(s.play_all(), None);
        assert_eq!(s.drain_notices(), vec![Notice::error("No events in playlist")]);
    }

    #[test]
    fn blank_playlist_name_is_rejected_with_notice() {
        let mut s = session();
        let before = s.store().playlists().playlists().len();
        assert!(s.create_playlist("   ").is_err());
        assert_eq!(s.store().playlists().playlists().len(), before);
        assert_eq!(s.drain_notices()[0].level, NoticeLevel::Error);
    }

    #[test]
    fn zoom_steps_and_clamps() {
        let mut s = session();
        assert!((s.zoom_in() - 1.2).abs() < 1e-9);
        for _ in 0..40 {
            s.zoom_in();
        }
        assert_eq!(s.playback().timeline_zoom(), 5.0);
        for _ in 0..40 {
            s.zoom_out();
        }
        assert_eq!(s.playback().timeline_zoom(), 0.5);
    }

    #[test]
    fn seek_fraction_maps_track_position() {
        let mut s = session();
        assert_eq!(s.seek_fraction(0.5), Some(60.0));
    }

    #[test]
    fn deleting_filtered_tag_clears_filter() {
        let mut s = session();
        let goal = tag(&s, 'g');
        s.set_tag_filter(Some(goal));
        s.delete_tag(goal).unwrap();
        assert_eq!(s.playback().selected_tag_filter, None);
    }

    #[test]
    fn load_video_rejects_non_video() {
        let mut s = session();
        assert!(s.load_video("notes.txt").is_err());
        assert_eq!(
            s.drain_notices(),
            vec![Notice::error("Please select a valid video file")]
        );
        assert!(s.video().is_none());
    }

    #[test]
    fn duration_notification_bounds_seeks() {
        let mut s = Session::headless(Settings::default());
        s.on_duration_change(60.0);
        assert_eq!(s.jump_to_time(30.0), 30.0);
        assert_eq!(s.jump_to_time(90.0), 60.0);
        assert_eq!(s.seek_fraction(0.5), Some(30.0));
        s.skip_forward();
        assert_eq!(s.playback().current_time, 35.0);
    }

    #[test]
    fn time_notification_sets_recording_start() {
        let mut s = Session::headless(Settings::default());
        let goal = tag(&s, 'g');
        s.on_duration_change(60.0);
        s.on_time_update(12.0);
        let started = s.start_recording(goal).unwrap().unwrap();
        assert_eq!(started.start_time, 12.0);

        s.on_time_update(20.0);
        let event = s.stop_recording().unwrap();
        let event = s.store().event(event).unwrap();
        assert_eq!((event.start_time, event.end_time), (12.0, 20.0));
    }

    #[test]
    fn sync_keeps_notified_duration_when_clock_has_none() {
        let mut s = Session::headless(Settings::default());
        s.on_duration_change(45.0);
        s.sync_clock();
        assert_eq!(s.playback().duration, 45.0);
    }

    #[test]
    fn load_video_resets_duration_until_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.mp4");
        std::fs::write(&path, b"").unwrap();

        let mut s = session();
        s.jump_to_time(50.0);
        s.load_video(&path).unwrap();
        assert_eq!(s.playback().duration, 0.0);
        assert_eq!(s.jump_to_time(10.0), 0.0);

        s.on_duration_change(80.0);
        assert_eq!(s.jump_to_time(10.0), 10.0);
    }

    #[test]
    fn unknown_playlist_is_reported() {
        let mut s = session();
        let missing = PlaylistId(99);

        assert_eq!(s.set_active_playlist(missing), Err(StoreError::PlaylistNotFound(missing)));
        assert_eq!(
            s.remove_event_from_playlist(missing, EventId(1)),
            Err(StoreError::PlaylistNotFound(missing))
        );
        let notices = s.drain_notices();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));
        assert_eq!(notices[0].message, StoreError::PlaylistNotFound(missing).to_string());
    }

    #[test]
    fn removing_playlist_member_is_confirmed() {
        let mut s = session();
        let event = record(&mut s, 'a', 1.0, 3.0);
        let active = s.store().active_playlist().unwrap().id;
        s.add_to_active_playlist(event).unwrap();
        s.drain_notices();

        assert_eq!(s.remove_event_from_playlist(active, event), Ok(true));
        assert_eq!(s.remove_event_from_playlist(active, event), Ok(false));
        assert_eq!(s.drain_notices(), vec![Notice::success("Event removed from playlist")]);
    }

    #[test]
    fn transport_mirrors_clock() {
        let mut s = session();
        assert!(s.toggle_play_pause());
        s.clock_mut().advance(3.0);
        s.sync_clock();
        assert_eq!(s.playback().current_time, 3.0);
        assert!(s.set_rate(0.0).is_err());
        s.set_rate(2.0).unwrap();
        assert_eq!(s.playback().rate, 2.0);
        assert!(!s.toggle_play_pause());
    }
}
