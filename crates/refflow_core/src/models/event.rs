//! Tagged time intervals.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::ids::{EventId, TagId};

/// One recorded occurrence of a tag over a time interval of the source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEvent {
    pub id: EventId,
    pub tag_id: TagId,
    /// Seconds from the start of the video.
    pub start_time: f64,
    /// Seconds from the start of the video. Normally `>= start_time`, but a
    /// recording stopped after seeking backwards keeps its inverted span.
    pub end_time: f64,
}

impl TagEvent {
    /// Signed length of the interval.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn is_inverted(&self) -> bool {
        self.end_time < self.start_time
    }
}

/// Orders events by start time, ties broken by id (creation order).
pub fn chronological(a: &TagEvent, b: &TagEvent) -> Ordering {
    a.start_time
        .total_cmp(&b.start_time)
        .then_with(|| a.id.cmp(&b.id))
}

/// The in-flight recording between a start and a stop/cancel signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveRecording {
    pub tag_id: TagId,
    pub start_time: f64,
}
