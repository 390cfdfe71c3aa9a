//! Recording state machine.
//!
//! ```text
//!            start(tag, t)
//!   Idle ─────────────────────▶ Recording(tag, t)
//!     ▲                              │
//!     └──── stop(now) / cancel() ────┘
//! ```
//!
//! `stop` yields the finished interval; persisting it is up to the caller.

use serde::{Deserialize, Serialize};

use crate::models::{ActiveRecording, TagId};

/// Current state of the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording(ActiveRecording),
}

/// A stopped recording, ready to become an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishedRecording {
    pub tag_id: TagId,
    pub start_time: f64,
    pub end_time: f64,
}

/// Result of a shortcut press or tag button click while tagging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToggleOutcome {
    Started(ActiveRecording),
    Stopped(FinishedRecording),
    /// Another tag is being recorded; nothing changed.
    Ignored,
}

/// Tracks at most one in-flight recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingMachine {
    state: RecordingState,
}

impl RecordingMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn active(&self) -> Option<&ActiveRecording> {
        match &self.state {
            RecordingState::Recording(active) => Some(active),
            RecordingState::Idle => None,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording(_))
    }

    /// Begin recording `tag_id` at `now`. No-op (returns `None`) if already recording.
    pub fn start(&mut self, tag_id: TagId, now: f64) -> Option<ActiveRecording> {
        if self.is_recording() {
            tracing::debug!(%tag_id, "Start ignored, a recording is already in flight");
            return None;
        }

        let active = ActiveRecording {
            tag_id,
            start_time: now,
        };
        self.state = RecordingState::Recording(active);
        tracing::debug!(%tag_id, start = now, "Recording started");
        Some(active)
    }

    /// Finish the recording at `now`. No-op (returns `None`) if idle.
    ///
    /// No minimum duration: zero-length and inverted spans are returned as-is.
    pub fn stop(&mut self, now: f64) -> Option<FinishedRecording> {
        let RecordingState::Recording(active) = self.state else {
            return None;
        };

        self.state = RecordingState::Idle;
        tracing::debug!(tag_id = %active.tag_id, start = active.start_time, end = now, "Recording stopped");
        Some(FinishedRecording {
            tag_id: active.tag_id,
            start_time: active.start_time,
            end_time: now,
        })
    }

    /// Discard the in-flight recording. Returns what was discarded.
    pub fn cancel(&mut self) -> Option<ActiveRecording> {
        let RecordingState::Recording(active) = self.state else {
            return None;
        };

        self.state = RecordingState::Idle;
        tracing::debug!(tag_id = %active.tag_id, "Recording cancelled");
        Some(active)
    }

    /// Shortcut semantics: stop when recording the same tag, start when
    /// idle, ignore when recording a different tag.
    pub fn toggle(&mut self, tag_id: TagId, now: f64) -> ToggleOutcome {
        match self.state {
            RecordingState::Recording(active) if active.tag_id == tag_id => self
                .stop(now)
                .map(ToggleOutcome::Stopped)
                .unwrap_or(ToggleOutcome::Ignored),
            RecordingState::Recording(_) => ToggleOutcome::Ignored,
            RecordingState::Idle => self
                .start(tag_id, now)
                .map(ToggleOutcome::Started)
                .unwrap_or(ToggleOutcome::Ignored),
        }
    }
}
