use crate::error::{FramescrubError, FramescrubResult};

/// Host policy for starting playback programmatically.
///
/// Browsers may reject autoplay until a user gesture has occurred; the gate
/// models that decision point without tying the clock to any platform.
pub trait PlaybackGate {
    fn allow_autoplay(&self) -> bool;
}

/// Gate that always permits playback (offline rendering, tests).
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysAllow;

impl PlaybackGate for AlwaysAllow {
    fn allow_autoplay(&self) -> bool {
        true
    }
}

/// Wall-clock driver for the video-backed animator variant.
///
/// A rejected play attempt is a recoverable condition, not an error: the
/// clock simply stays paused and a later attempt (after a user gesture) may
/// succeed. Time never leaves `[0, duration]`.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    time: f64,
    duration: f64,
    paused: bool,
}

impl PlaybackClock {
    pub fn new(duration: f64) -> FramescrubResult<Self> {
        if !(duration > 0.0) {
            return Err(FramescrubError::validation(
                "PlaybackClock duration must be > 0",
            ));
        }
        Ok(Self {
            time: 0.0,
            duration,
            paused: true,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Attempt to start playback. Returns whether the clock is now playing.
    pub fn try_play(&mut self, gate: &dyn PlaybackGate) -> bool {
        if gate.allow_autoplay() {
            self.paused = false;
        }
        !self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Advance by `dt` seconds when playing; pauses on reaching the end.
    pub fn advance(&mut self, dt: f64) {
        if self.paused || dt <= 0.0 {
            return;
        }
        self.time = (self.time + dt).min(self.duration);
        if self.time >= self.duration {
            self.paused = true;
        }
    }

    pub fn seek(&mut self, time: f64) {
        self.time = time.clamp(0.0, self.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blocked;

    impl PlaybackGate for Blocked {
        fn allow_autoplay(&self) -> bool {
            false
        }
    }

    #[test]
    fn rejected_autoplay_stays_paused_without_error() {
        let mut clock = PlaybackClock::new(58.0).unwrap();
        assert!(!clock.try_play(&Blocked));
        assert!(clock.is_paused());
        clock.advance(5.0);
        assert_eq!(clock.time(), 0.0);

        // A later attempt under a permissive gate succeeds.
        assert!(clock.try_play(&AlwaysAllow));
        clock.advance(5.0);
        assert_eq!(clock.time(), 5.0);
    }

    #[test]
    fn advance_clamps_and_pauses_at_end() {
        let mut clock = PlaybackClock::new(10.0).unwrap();
        clock.try_play(&AlwaysAllow);
        clock.advance(25.0);
        assert_eq!(clock.time(), 10.0);
        assert!(clock.is_paused());
    }

    #[test]
    fn seek_clamps_into_duration() {
        let mut clock = PlaybackClock::new(10.0).unwrap();
        clock.seek(-5.0);
        assert_eq!(clock.time(), 0.0);
        clock.seek(99.0);
        assert_eq!(clock.time(), 10.0);
        clock.seek(3.5);
        assert_eq!(clock.time(), 3.5);
    }
}
