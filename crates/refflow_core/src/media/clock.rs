//! Headless time source driven by explicit `advance` calls.

use super::TimeSource;

/// A [`TimeSource`] whose position only moves when told to.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualClock {
    position: f64,
    duration: Option<f64>,
    playing: bool,
    rate: f64,
}

impl ManualClock {
    /// A stopped clock at 0 with unknown duration.
    pub fn new() -> Self {
        Self {
            position: 0.0,
            duration: None,
            playing: false,
            rate: 1.0,
        }
    }

    /// A clock with known duration, as if metadata had loaded.
    pub fn with_duration(duration: f64) -> Self {
        let mut clock = Self::new();
        clock.set_duration(Some(duration));
        clock
    }

    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|d| d.is_finite() && *d >= 0.0);
    }

    /// Move forward by `seconds` of wall time, scaled by the rate.
    ///
    /// Does nothing while paused. Stops at the end of the media.
    pub fn advance(&mut self, seconds: f64) -> f64 {
        if !self.playing || !seconds.is_finite() {
            return self.position;
        }
        let mut next = self.position + seconds * self.rate;
        if let Some(duration) = self.duration {
            if next >= duration {
                next = duration;
                self.playing = false;
            }
        }
        self.position = next.max(0.0);
        self.position
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualClock {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn seek(&mut self, time: f64) {
        if time.is_finite() {
            self.position = time;
        }
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn set_rate(&mut self, rate: f64) {
        if rate.is_finite() && rate > 0.0 {
            self.rate = rate;
        }
    }
}
