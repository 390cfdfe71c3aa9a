//! Data model: tags, tagged events, playlists and playback state.

mod event;
mod ids;
mod playback;
mod playlist;
mod tag;

pub use event::{chronological, ActiveRecording, TagEvent};
pub use ids::{EventId, IdSequence, PlaylistId, TagId};
pub use playback::{PlaybackState, MAX_TIMELINE_ZOOM, MIN_TIMELINE_ZOOM};
pub use playlist::Playlist;
pub use tag::{Tag, TagDraft};
