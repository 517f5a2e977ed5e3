use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    detection::{Frame, Hand, HandDetector},
    models::{Interval, IntervalRecord, MonitorSnapshot, RunOutcome, RunSummary},
    timer::{ClockMode, RunClock, WorkSession},
    zones::ZoneSet,
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Everything learned from one frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub index: u64,
    pub timestamp: Duration,
    pub hands: Vec<Hand>,
    pub hand_in_zone: bool,
    pub snapshot: MonitorSnapshot,
    /// Interval closed by this frame's transition, if any.
    pub closed: Option<Interval>,
}

/// True when any keypoint of any hand falls in the zone set.
pub fn hands_in_zone(hands: &[Hand], zones: &ZoneSet) -> bool {
    hands
        .iter()
        .flat_map(|hand| hand.landmarks.iter())
        .any(|point| zones.contains(*point))
}

/// Per-frame composition of detector, zones, clock and work session.
pub struct MonitorController<D> {
    run_id: String,
    started_at: DateTime<Utc>,
    zones: ZoneSet,
    detector: D,
    clock: RunClock,
    session: WorkSession,
    frames_processed: u64,
    frames_in_zone: u64,
}

impl<D: HandDetector> MonitorController<D> {
    pub fn new(zones: ZoneSet, detector: D, clock_mode: ClockMode) -> Self {
        let clock = RunClock::start(clock_mode);
        let session = WorkSession::new(clock.now());
        let run_id = Uuid::new_v4().to_string();

        log_info!(
            "Run {} started with {} zone(s), {:?} clock",
            run_id,
            zones.len(),
            clock_mode
        );

        Self {
            run_id,
            started_at: Utc::now(),
            zones,
            detector,
            clock,
            session,
            frames_processed: 0,
            frames_in_zone: 0,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    pub fn session(&self) -> &WorkSession {
        &self.session
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameReport> {
        if self.session.is_finalized() {
            bail!("run {} already finished; frame {} rejected", self.run_id, frame.index);
        }

        let hands = self
            .detector
            .detect(frame)
            .with_context(|| format!("hand detection failed on frame {}", frame.index))?;
        let hand_in_zone = hands_in_zone(&hands, &self.zones);

        let now = self.clock.frame_time(frame);
        let closed = self.session.step(hand_in_zone, now);

        self.frames_processed += 1;
        if hand_in_zone {
            self.frames_in_zone += 1;
        }

        if let Some(interval) = &closed {
            log_info!(
                "frame {}: {} -> {} after {:.1}s",
                frame.index,
                interval.kind.as_str(),
                self.session.status().as_str(),
                interval.duration().as_secs_f64()
            );
        }
        log_debug!(
            "frame {}: {} hand(s), in zone: {}",
            frame.index,
            hands.len(),
            hand_in_zone
        );

        Ok(FrameReport {
            index: frame.index,
            timestamp: now,
            hands,
            hand_in_zone,
            snapshot: self.session.totals(now).into(),
            closed,
        })
    }

    /// Live display values at the clock's current time.
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.session.totals(self.clock.now()).into()
    }

    /// Closes the open interval and returns the run's final account. Only the
    /// first call finalizes; later calls report the same totals.
    pub fn finish(&mut self, outcome: RunOutcome) -> RunSummary {
        let now = self.clock.now();
        self.session.finalize(now);

        let work = self.session.accumulated_work();
        let pause = self.session.accumulated_pause();

        let summary = RunSummary {
            id: self.run_id.clone(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            outcome,
            frames_processed: self.frames_processed,
            frames_in_zone: self.frames_in_zone,
            work_seconds: work.as_secs_f64(),
            pause_seconds: pause.as_secs_f64(),
            total_seconds: (work + pause).as_secs_f64(),
            intervals: self
                .session
                .timeline()
                .iter()
                .map(IntervalRecord::from)
                .collect(),
        };

        log_info!(
            "Run {} finished ({:?}): {} frame(s), work {:.1}s, pause {:.1}s",
            summary.id,
            summary.outcome,
            summary.frames_processed,
            summary.work_seconds,
            summary.pause_seconds
        );
        summary
    }
}
