use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::timer::ZoneStatus;

/// A closed, contiguous span spent in a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub kind: ZoneStatus,
    pub started_at: Duration,
    pub ended_at: Duration,
}

impl Interval {
    pub fn duration(&self) -> Duration {
        self.ended_at.saturating_sub(self.started_at)
    }
}

/// Seconds-based view of an [`Interval`] for reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntervalRecord {
    pub kind: ZoneStatus,
    pub started_secs: f64,
    pub ended_secs: f64,
    pub duration_secs: f64,
}

impl From<&Interval> for IntervalRecord {
    fn from(interval: &Interval) -> Self {
        Self {
            kind: interval.kind,
            started_secs: interval.started_at.as_secs_f64(),
            ended_secs: interval.ended_at.as_secs_f64(),
            duration_secs: interval.duration().as_secs_f64(),
        }
    }
}
