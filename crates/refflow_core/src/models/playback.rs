//! Playback state mirrored from the time source.

use serde::Serialize;

use super::ids::TagId;

pub const MIN_TIMELINE_ZOOM: f64 = 0.5;
pub const MAX_TIMELINE_ZOOM: f64 = 5.0;

/// Transport position, rate, timeline filter and zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    /// Current playhead position in seconds.
    pub current_time: f64,
    /// Media duration in seconds; 0 until metadata has loaded.
    pub duration: f64,
    pub is_playing: bool,
    /// Playback speed multiplier: 1.0 = normal.
    pub rate: f64,
    /// Only events of this tag are shown and navigated when set.
    pub selected_tag_filter: Option<TagId>,
    timeline_zoom: f64,
    /// Horizontal scroll offset of the timeline, in pixels.
    pub timeline_scroll: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackState {
    pub fn new() -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            is_playing: false,
            rate: 1.0,
            selected_tag_filter: None,
            timeline_zoom: 1.0,
            timeline_scroll: 0.0,
        }
    }

    pub fn timeline_zoom(&self) -> f64 {
        self.timeline_zoom
    }

    /// Set the timeline zoom, clamped to `[MIN_TIMELINE_ZOOM, MAX_TIMELINE_ZOOM]`.
    pub fn set_timeline_zoom(&mut self, zoom: f64) -> f64 {
        let zoom = if zoom.is_nan() { 1.0 } else { zoom };
        self.timeline_zoom = zoom.clamp(MIN_TIMELINE_ZOOM, MAX_TIMELINE_ZOOM);
        self.timeline_zoom
    }

    /// Clamp a seek target into `[0, duration]`.
    pub fn clamp_time(&self, time: f64) -> f64 {
        if time.is_nan() {
            return 0.0;
        }
        time.min(self.duration).max(0.0)
    }

    /// Fraction of the video already played, for progress bars.
    pub fn progress_fraction(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
