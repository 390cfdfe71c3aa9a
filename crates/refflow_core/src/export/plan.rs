//! Export plan: the clips of one playlist in export order.

use crate::models::{EventId, PlaylistId};
use crate::store::AnnotationStore;

use super::command::{concat_manifest, EncodeOptions, TranscodeCommand};
use super::errors::{ExportError, ExportResult};

pub const MANIFEST_NAME: &str = "concat.txt";

/// One interval to cut out of the source video.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSpec {
    /// Position in the export sequence; names the intermediate file.
    pub index: usize,
    pub event_id: EventId,
    pub start_time: f64,
    pub duration: f64,
}

/// Snapshot of everything an export needs from the store.
///
/// Clips are sorted chronologically by start time (ties by event id),
/// whatever the order in the playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    pub playlist_id: PlaylistId,
    pub playlist_name: String,
    pub clips: Vec<ClipSpec>,
    /// Extension of the intermediate and output files.
    pub container: String,
    /// Events dropped because their interval was empty or inverted.
    pub skipped: Vec<EventId>,
}

impl ExportPlan {
    /// Resolve a playlist into an export plan.
    ///
    /// Rejects a missing playlist and a playlist with nothing to cut.
    pub fn build(store: &AnnotationStore, playlist_id: PlaylistId, container: &str) -> ExportResult<Self> {
        let playlist = store
            .playlist(playlist_id)
            .ok_or_else(|| ExportError::invalid_input("Playlist not found"))?;

        if playlist.is_empty() {
            return Err(ExportError::invalid_input("Playlist is empty"));
        }

        let events = store.events().resolve_chronological(&playlist.event_ids);
        if events.is_empty() {
            return Err(ExportError::invalid_input("Playlist is empty"));
        }

        let mut clips = Vec::with_capacity(events.len());
        let mut skipped = Vec::new();
        for event in events {
            let duration = event.duration();
            if duration > 0.0 {
                clips.push(ClipSpec {
                    index: clips.len(),
                    event_id: event.id,
                    start_time: event.start_time,
                    duration,
                });
            } else {
                skipped.push(event.id);
            }
        }

        if clips.is_empty() {
            return Err(ExportError::invalid_input("Playlist has no clips with a positive duration"));
        }

        let container = match container.trim().trim_start_matches('.') {
            "" => "mp4".to_string(),
            ext => ext.to_lowercase(),
        };

        Ok(Self {
            playlist_id,
            playlist_name: playlist.name.clone(),
            clips,
            container,
            skipped,
        })
    }

    pub fn clip_file_name(&self, index: usize) -> String {
        format!("clip{}.{}", index, self.container)
    }

    pub fn output_file_name(&self) -> String {
        format!("output.{}", self.container)
    }

    /// Suggested download name: `<playlist-name>.<container>`.
    pub fn artifact_name(&self) -> String {
        format!("{}.{}", self.playlist_name, self.container)
    }

    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration).sum()
    }

    /// Extraction commands, in export order.
    pub fn extract_commands(&self, input: &str, encode: &EncodeOptions) -> Vec<TranscodeCommand> {
        self.clips
            .iter()
            .map(|clip| TranscodeCommand::ExtractClip {
                input: input.to_string(),
                start: clip.start_time,
                duration: clip.duration,
                output: self.clip_file_name(clip.index),
                encode: encode.clone(),
            })
            .collect()
    }

    pub fn manifest(&self) -> String {
        let files: Vec<String> = self.clips.iter().map(|c| self.clip_file_name(c.index)).collect();
        concat_manifest(&files)
    }

    pub fn concat_command(&self) -> TranscodeCommand {
        TranscodeCommand::Concat {
            manifest: MANIFEST_NAME.to_string(),
            output: self.output_file_name(),
            total_duration: self.total_duration(),
        }
    }
}
