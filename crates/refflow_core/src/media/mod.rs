//! Media collaborators: the playback time source and the loaded video.
//!
//! The core never decodes video. A front end wraps its player in a
//! [`TimeSource`] and hands the session a [`VideoSource`] describing the
//! file the player shows; [`ManualClock`] is the headless time source used
//! by the bundled front end and the tests.

mod clock;
mod source;

pub use clock::ManualClock;
pub use source::{is_video_path, MediaError, MediaResult, VideoSource, VIDEO_EXTENSIONS};

/// Playback clock of the media element.
///
/// `duration` is `None` until metadata has loaded. Implementations do not
/// need to clamp seeks; the session clamps before calling [`seek`](Self::seek).
pub trait TimeSource {
    fn current_time(&self) -> f64;
    fn duration(&self) -> Option<f64>;
    fn seek(&mut self, time: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    fn rate(&self) -> f64;
    fn set_rate(&mut self, rate: f64);
}
