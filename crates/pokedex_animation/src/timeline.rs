//! Shared screen timelines
//!
//! One [`Timeline`] drives a whole entrance sequence (a list load, or the
//! detail screen appearing). Items read its progress and map it through their
//! own stagger window.

/// Playback state of a timeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Completed,
}

/// A one-shot progress driver from 0 to 1 over a fixed duration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    duration_secs: f32,
    elapsed: f32,
    state: PlaybackState,
}

impl Timeline {
    /// A timeline lasting `duration_secs`; a zero duration completes on the
    /// first advance
    pub fn new(duration_secs: f32) -> Self {
        let duration_secs = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };
        Self {
            duration_secs,
            elapsed: 0.0,
            state: PlaybackState::Stopped,
        }
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration_secs
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Start from the beginning
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.state = PlaybackState::Playing;
    }

    /// Pause where it is
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Stopped;
        }
    }

    /// Continue a stopped timeline
    pub fn resume(&mut self) {
        if self.state == PlaybackState::Stopped {
            self.state = PlaybackState::Playing;
        }
    }

    /// Jump to the end (used when entrances are skipped)
    pub fn finish(&mut self) {
        self.elapsed = self.duration_secs;
        self.state = PlaybackState::Completed;
    }

    /// Progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration_secs <= 0.0 {
            return if self.state == PlaybackState::Completed {
                1.0
            } else {
                0.0
            };
        }
        (self.elapsed / self.duration_secs).clamp(0.0, 1.0)
    }

    /// Advance by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if self.state != PlaybackState::Playing || !dt.is_finite() || dt < 0.0 {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration_secs {
            self.elapsed = self.duration_secs;
            self.state = PlaybackState::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_runs_to_completion() {
        let mut timeline = Timeline::new(1.0);
        assert_eq!(timeline.progress(), 0.0);

        timeline.advance(0.5);
        assert_eq!(timeline.progress(), 0.0, "stopped timelines do not move");

        timeline.start();
        timeline.advance(0.25);
        assert!((timeline.progress() - 0.25).abs() < 1e-6);

        timeline.advance(2.0);
        assert_eq!(timeline.progress(), 1.0);
        assert_eq!(timeline.state(), PlaybackState::Completed);
    }

    #[test]
    fn test_timeline_stop_and_resume() {
        let mut timeline = Timeline::new(1.0);
        timeline.start();
        timeline.advance(0.2);
        timeline.stop();
        timeline.advance(0.5);
        assert!((timeline.progress() - 0.2).abs() < 1e-6);
        timeline.resume();
        timeline.advance(0.3);
        assert!((timeline.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_completes() {
        let mut timeline = Timeline::new(0.0);
        timeline.start();
        timeline.advance(0.0);
        assert_eq!(timeline.progress(), 1.0);
    }
}
