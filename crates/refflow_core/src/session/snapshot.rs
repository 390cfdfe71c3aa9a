//! Serializable view of a session for front ends.

use serde::Serialize;

use super::Session;
use crate::export::ExportStatus;
use crate::media::TimeSource;
use crate::models::{PlaybackState, Playlist, Tag, TagEvent};
use crate::store::RecordingState;

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub video: Option<String>,
    pub tagging_mode: bool,
    pub recording: RecordingState,
    pub playback: PlaybackState,
    pub tags: Vec<Tag>,
    pub events: Vec<TagEvent>,
    pub playlists: Vec<Playlist>,
    pub export: ExportStatus,
}

impl SessionSnapshot {
    pub fn capture<T: TimeSource>(session: &Session<T>) -> Self {
        let store = session.store();
        Self {
            video: session.video().map(|v| v.path().display().to_string()),
            tagging_mode: session.is_tagging(),
            recording: store.recorder().state(),
            playback: session.playback().clone(),
            tags: store.catalog().tags().to_vec(),
            events: store.events().events().to_vec(),
            playlists: store.playlists().playlists().to_vec(),
            export: session.current_export_status(),
        }
    }
}
