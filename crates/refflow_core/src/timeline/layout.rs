//! Marker and tick layout in percent of the timeline width.

use serde::Serialize;

use super::format::format_time;
use crate::models::{EventId, PlaybackState, TagId};
use crate::store::AnnotationStore;

/// Spacing of the time labels along the track.
pub const TICK_INTERVAL_SECONDS: f64 = 10.0;

/// Color of the live recording bar when its tag is unknown.
pub const RECORDING_FALLBACK_COLOR: &str = "#666666";

/// One finalized event drawn on the track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventMarker {
    pub event_id: EventId,
    pub tag_id: TagId,
    pub color: String,
    /// Hover label, e.g. `Goal: 00:12 - 00:18`.
    pub label: String,
    pub left_percent: f64,
    pub width_percent: f64,
    /// Seek target when the marker is clicked.
    pub start_time: f64,
}

/// The in-flight recording, growing with the playhead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingMarker {
    pub tag_id: TagId,
    pub color: String,
    pub left_percent: f64,
    pub width_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub time: f64,
    pub left_percent: f64,
    pub label: String,
}

/// Everything a timeline widget needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub markers: Vec<EventMarker>,
    pub recording: Option<RecordingMarker>,
    pub ticks: Vec<Tick>,
    pub playhead_percent: f64,
    /// `current / duration` label.
    pub time_label: String,
    /// Name of the filtered tag, if a filter is set.
    pub filter_label: Option<String>,
}

impl TimelineLayout {
    /// Lay out the store's events against the playback state.
    ///
    /// Only events matching the tag filter are drawn; events whose tag no
    /// longer exists are skipped. Nothing is positioned until the duration
    /// is known.
    pub fn compute(store: &AnnotationStore, playback: &PlaybackState) -> Self {
        let duration = playback.duration;
        let time_label = format!(
            "{} / {}",
            format_time(playback.current_time),
            format_time(duration)
        );
        let filter_label = playback.selected_tag_filter.map(|id| {
            store
                .tag(id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "Unknown".to_string())
        });

        if duration <= 0.0 || !duration.is_finite() {
            return Self {
                markers: Vec::new(),
                recording: None,
                ticks: Vec::new(),
                playhead_percent: 0.0,
                time_label,
                filter_label,
            };
        }

        let percent = |t: f64| t / duration * 100.0;

        let markers = store
            .events()
            .filter_by_tag(playback.selected_tag_filter)
            .filter_map(|event| {
                let tag = store.tag(event.tag_id)?;
                Some(EventMarker {
                    event_id: event.id,
                    tag_id: tag.id,
                    color: tag.color.clone(),
                    label: format!(
                        "{}: {} - {}",
                        tag.name,
                        format_time(event.start_time),
                        format_time(event.end_time)
                    ),
                    left_percent: percent(event.start_time),
                    width_percent: percent(event.duration()),
                    start_time: event.start_time,
                })
            })
            .collect();

        let recording = store.recorder().active().map(|active| RecordingMarker {
            tag_id: active.tag_id,
            color: store
                .tag(active.tag_id)
                .map(|t| t.color.clone())
                .unwrap_or_else(|| RECORDING_FALLBACK_COLOR.to_string()),
            left_percent: percent(active.start_time),
            width_percent: percent(playback.current_time - active.start_time),
        });

        let tick_count = (duration / TICK_INTERVAL_SECONDS).ceil() as usize;
        let ticks = (0..tick_count)
            .map(|i| {
                let time = i as f64 * TICK_INTERVAL_SECONDS;
                Tick {
                    time,
                    left_percent: percent(time),
                    label: format_time(time),
                }
            })
            .collect();

        Self {
            markers,
            recording,
            ticks,
            playhead_percent: playback.progress_fraction() * 100.0,
            time_label,
            filter_label,
        }
    }
}

/// Media time under a click at `fraction` of the track width.
///
/// Returns `None` while the duration is unknown.
pub fn time_at_fraction(fraction: f64, duration: f64) -> Option<f64> {
    if duration <= 0.0 || !duration.is_finite() || fraction.is_nan() {
        return None;
    }
    Some(fraction.clamp(0.0, 1.0) * duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playback(duration: f64, current: f64) -> PlaybackState {
        let mut state = PlaybackState::new();
        state.duration = duration;
        state.current_time = current;
        state
    }

    fn store_with_goal(start: f64, end: f64) -> (AnnotationStore, TagId) {
        let mut store = AnnotationStore::with_defaults();
        let goal = store.catalog().find_by_shortcut('g').unwrap().id;
        store.start_recording(goal, start).unwrap();
        store.stop_recording(end);
        (store, goal)
    }

    #[test]
    fn markers_are_in_percent_of_duration() {
        let (store, goal) = store_with_goal(20.0, 30.0);
        let layout = TimelineLayout::compute(&store, &playback(100.0, 50.0));

        assert_eq!(layout.markers.len(), 1);
        let marker = &layout.markers[0];
        assert_eq!(marker.tag_id, goal);
        assert_eq!(marker.left_percent, 20.0);
        assert_eq!(marker.width_percent, 10.0);
        assert_eq!(marker.color, "#10b981");
        assert_eq!(marker.label, "Goal: 00:20 - 00:30");
        assert_eq!(layout.playhead_percent, 50.0);
        assert_eq!(layout.time_label, "00:50 / 01:40");
    }

    #[test]
    fn filter_hides_other_tags() {
        let (mut store, goal) = store_with_goal(1.0, 2.0);
        let foul = store.catalog().find_by_shortcut('f').unwrap().id;
        store.start_recording(foul, 3.0).unwrap();
        store.stop_recording(4.0);

        let mut state = playback(10.0, 0.0);
        state.selected_tag_filter = Some(foul);
        let layout = TimelineLayout::compute(&store, &state);

        assert_eq!(layout.markers.len(), 1);
        assert_eq!(layout.markers[0].tag_id, foul);
        assert_ne!(layout.markers[0].tag_id, goal);
        assert_eq!(layout.filter_label.as_deref(), Some("Foul"));
    }

    #[test]
    fn recording_marker_follows_playhead() {
        let mut store = AnnotationStore::with_defaults();
        let pass = store.catalog().find_by_shortcut('p').unwrap().id;
        store.start_recording(pass, 10.0).unwrap();

        let layout = TimelineLayout::compute(&store, &playback(200.0, 30.0));
        let recording = layout.recording.unwrap();
        assert_eq!(recording.left_percent, 5.0);
        assert_eq!(recording.width_percent, 10.0);
        assert_eq!(recording.color, "#f97316");
    }

    #[test]
    fn ticks_every_ten_seconds() {
        let store = AnnotationStore::new();
        let layout = TimelineLayout::compute(&store, &playback(35.0, 0.0));
        let labels: Vec<&str> = layout.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["00:00", "00:10", "00:20", "00:30"]);
    }

    #[test]
    fn nothing_positioned_without_duration() {
        let (store, _) = store_with_goal(1.0, 2.0);
        let layout = TimelineLayout::compute(&store, &playback(0.0, 0.0));
        assert!(layout.markers.is_empty());
        assert!(layout.ticks.is_empty());
    }

    #[test]
    fn fraction_maps_to_time() {
        assert_eq!(time_at_fraction(0.25, 80.0), Some(20.0));
        assert_eq!(time_at_fraction(1.5, 80.0), Some(80.0));
        assert_eq!(time_at_fraction(0.5, 0.0), None);
    }
}
