use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::IntervalRecord;
use crate::timer::{SessionTotals, ZoneStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// What the renderer and log lines show at any moment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    pub state: ZoneStatus,
    pub work_seconds: f64,
    pub pause_seconds: f64,
}

impl From<SessionTotals> for MonitorSnapshot {
    fn from(totals: SessionTotals) -> Self {
        Self {
            state: totals.status,
            work_seconds: totals.work.as_secs_f64(),
            pause_seconds: totals.pause.as_secs_f64(),
        }
    }
}

impl MonitorSnapshot {
    /// Share of elapsed time spent working, 0 when nothing has elapsed.
    pub fn work_ratio(&self) -> f64 {
        let total = self.work_seconds + self.pause_seconds;
        if total > 0.0 {
            self.work_seconds / total
        } else {
            0.0
        }
    }
}

/// Final account of a monitoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub frames_processed: u64,
    pub frames_in_zone: u64,
    pub work_seconds: f64,
    pub pause_seconds: f64,
    pub total_seconds: f64,
    pub intervals: Vec<IntervalRecord>,
}
