//! Timeline projection of the session: markers, ticks and playhead.

mod format;
mod layout;

pub use format::format_time;
pub use layout::{
    time_at_fraction, EventMarker, RecordingMarker, Tick, TimelineLayout, RECORDING_FALLBACK_COLOR,
    TICK_INTERVAL_SECONDS,
};
