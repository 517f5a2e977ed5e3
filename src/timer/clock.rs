use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::detection::Frame;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ClockMode {
    /// Frame timestamps drive the timeline; right for recorded footage.
    #[default]
    Video,
    /// Monotonic wall time since the run started; right for live feeds.
    Wall,
}

/// Source of the `now` fed into the work session. Every run starts at zero.
#[derive(Debug, Clone)]
pub enum RunClock {
    Video { last_frame_at: Duration },
    Wall { anchor: Instant },
}

impl RunClock {
    pub fn start(mode: ClockMode) -> Self {
        match mode {
            ClockMode::Video => RunClock::Video {
                last_frame_at: Duration::ZERO,
            },
            ClockMode::Wall => RunClock::Wall {
                anchor: Instant::now(),
            },
        }
    }

    pub fn mode(&self) -> ClockMode {
        match self {
            RunClock::Video { .. } => ClockMode::Video,
            RunClock::Wall { .. } => ClockMode::Wall,
        }
    }

    /// Timestamp for a frame that is about to be processed.
    pub fn frame_time(&mut self, frame: &Frame) -> Duration {
        match self {
            RunClock::Video { last_frame_at } => {
                *last_frame_at = frame.timestamp;
                frame.timestamp
            }
            RunClock::Wall { anchor } => anchor.elapsed(),
        }
    }

    /// Timestamp for queries and finalization between frames.
    pub fn now(&self) -> Duration {
        match self {
            RunClock::Video { last_frame_at } => *last_frame_at,
            RunClock::Wall { anchor } => anchor.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_clock_follows_frame_timestamps() {
        let mut clock = RunClock::start(ClockMode::Video);
        assert_eq!(clock.now(), Duration::ZERO);

        let frame = Frame::blank(3, Duration::from_millis(120), 4, 4);
        assert_eq!(clock.frame_time(&frame), Duration::from_millis(120));
        assert_eq!(clock.now(), Duration::from_millis(120));
        assert_eq!(clock.mode(), ClockMode::Video);
    }

    #[test]
    fn wall_clock_is_monotonic() {
        let mut clock = RunClock::start(ClockMode::Wall);
        let frame = Frame::blank(0, Duration::from_secs(999), 2, 2);
        let first = clock.frame_time(&frame);
        let second = clock.now();
        assert!(second >= first);
        assert!(first < Duration::from_secs(999));
    }
}
