use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::Interval;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneStatus {
    Working,
    Paused,
}

impl Default for ZoneStatus {
    fn default() -> Self {
        ZoneStatus::Paused
    }
}

impl ZoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneStatus::Working => "WORKING",
            ZoneStatus::Paused => "PAUSED",
        }
    }
}

/// Live or final totals at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTotals {
    pub status: ZoneStatus,
    pub work: Duration,
    pub pause: Duration,
}

impl SessionTotals {
    pub fn total(&self) -> Duration {
        self.work + self.pause
    }
}

/// Work/pause accounting for one monitoring run.
///
/// Exactly one of `work_started_at` / `pause_started_at` is set until the
/// session is finalized, after which both are `None` and the accumulators are
/// frozen. Accumulators only ever hold closed intervals; the open one is added
/// on the fly by the display queries.
#[derive(Debug, Clone)]
pub struct WorkSession {
    status: ZoneStatus,
    run_started_at: Duration,
    work_started_at: Option<Duration>,
    pause_started_at: Option<Duration>,
    accumulated_work: Duration,
    accumulated_pause: Duration,
    /// Latest `now` observed; earlier timestamps are pinned to it so no
    /// interval can come out negative.
    latest: Duration,
    finalized_at: Option<Duration>,
    timeline: Vec<Interval>,
}

impl WorkSession {
    /// Starts paused, with the pause interval opening at `started_at`.
    pub fn new(started_at: Duration) -> Self {
        Self {
            status: ZoneStatus::Paused,
            run_started_at: started_at,
            work_started_at: None,
            pause_started_at: Some(started_at),
            accumulated_work: Duration::ZERO,
            accumulated_pause: Duration::ZERO,
            latest: started_at,
            finalized_at: None,
            timeline: Vec::new(),
        }
    }

    pub fn status(&self) -> ZoneStatus {
        self.status
    }

    pub fn run_started_at(&self) -> Duration {
        self.run_started_at
    }

    pub fn work_started_at(&self) -> Option<Duration> {
        self.work_started_at
    }

    pub fn pause_started_at(&self) -> Option<Duration> {
        self.pause_started_at
    }

    pub fn accumulated_work(&self) -> Duration {
        self.accumulated_work
    }

    pub fn accumulated_pause(&self) -> Duration {
        self.accumulated_pause
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized_at.is_some()
    }

    pub fn finalized_at(&self) -> Option<Duration> {
        self.finalized_at
    }

    /// Closed, non-empty intervals in chronological order.
    pub fn timeline(&self) -> &[Interval] {
        &self.timeline
    }

    /// Advances the state machine by one frame. Returns the interval closed by
    /// a transition, if one happened.
    pub fn step(&mut self, hand_in_zone: bool, now: Duration) -> Option<Interval> {
        if self.is_finalized() {
            log_warn!("ignoring step at {:?}: session already finalized", now);
            return None;
        }

        let now = self.observe(now);
        let desired = if hand_in_zone {
            ZoneStatus::Working
        } else {
            ZoneStatus::Paused
        };

        if desired == self.status {
            return None;
        }

        let closed = self.close_open_interval(now);
        match desired {
            ZoneStatus::Working => self.work_started_at = Some(now),
            ZoneStatus::Paused => self.pause_started_at = Some(now),
        }
        self.status = desired;

        log_debug!("zone status -> {} at {:?}", desired.as_str(), now);
        closed
    }

    /// Closes whichever interval is open and freezes the totals. Calling it
    /// again is a no-op.
    pub fn finalize(&mut self, now: Duration) -> Option<Interval> {
        if self.is_finalized() {
            return None;
        }

        let now = self.observe(now);
        let closed = self.close_open_interval(now);
        self.finalized_at = Some(now);
        closed
    }

    pub fn current_display_work(&self, now: Duration) -> Duration {
        self.accumulated_work + self.live_term(ZoneStatus::Working, now)
    }

    pub fn current_display_pause(&self, now: Duration) -> Duration {
        self.accumulated_pause + self.live_term(ZoneStatus::Paused, now)
    }

    pub fn totals(&self, now: Duration) -> SessionTotals {
        SessionTotals {
            status: self.status,
            work: self.current_display_work(now),
            pause: self.current_display_pause(now),
        }
    }

    fn live_term(&self, kind: ZoneStatus, now: Duration) -> Duration {
        if self.is_finalized() || self.status != kind {
            return Duration::ZERO;
        }
        let opened = match kind {
            ZoneStatus::Working => self.work_started_at,
            ZoneStatus::Paused => self.pause_started_at,
        };
        opened
            .map(|start| now.max(self.latest).saturating_sub(start))
            .unwrap_or(Duration::ZERO)
    }

    fn observe(&mut self, now: Duration) -> Duration {
        if now < self.latest {
            log_warn!(
                "clock went backwards ({:?} < {:?}); holding at the latest timestamp",
                now,
                self.latest
            );
        }
        self.latest = self.latest.max(now);
        self.latest
    }

    fn close_open_interval(&mut self, now: Duration) -> Option<Interval> {
        let (kind, started_at) = match self.status {
            ZoneStatus::Working => (ZoneStatus::Working, self.work_started_at.take()?),
            ZoneStatus::Paused => (ZoneStatus::Paused, self.pause_started_at.take()?),
        };

        let elapsed = now.saturating_sub(started_at);
        match kind {
            ZoneStatus::Working => self.accumulated_work += elapsed,
            ZoneStatus::Paused => self.accumulated_pause += elapsed,
        }

        if elapsed.is_zero() {
            return None;
        }

        let interval = Interval {
            kind,
            started_at,
            ended_at: now,
        };
        self.timeline.push(interval);
        Some(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn secs(value: u64) -> Duration {
        Duration::from_secs(value)
    }

    #[test]
    fn starts_paused_with_pause_open_at_run_start() {
        let session = WorkSession::new(secs(3));
        assert_eq!(session.status(), ZoneStatus::Paused);
        assert_eq!(session.pause_started_at(), Some(secs(3)));
        assert_eq!(session.work_started_at(), None);
        assert_eq!(session.current_display_pause(secs(10)), secs(7));
        assert_eq!(session.current_display_work(secs(10)), Duration::ZERO);
    }

    #[test]
    fn documented_scenario_totals() {
        let mut session = WorkSession::new(secs(0));
        session.step(false, secs(0));
        session.step(true, secs(5));
        session.step(true, secs(8));
        session.step(false, secs(12));
        session.finalize(secs(20));

        assert_eq!(session.accumulated_pause(), secs(13));
        assert_eq!(session.accumulated_work(), secs(7));
        assert_eq!(session.accumulated_pause() + session.accumulated_work(), secs(20));

        let kinds: Vec<_> = session.timeline().iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![ZoneStatus::Paused, ZoneStatus::Working, ZoneStatus::Paused]
        );
    }

    #[test]
    fn transitions_report_the_closed_interval() {
        let mut session = WorkSession::new(secs(0));
        assert_eq!(session.step(false, secs(1)), None);

        let closed = session.step(true, secs(4)).unwrap();
        assert_eq!(closed.kind, ZoneStatus::Paused);
        assert_eq!(closed.duration(), secs(4));

        assert_eq!(session.step(true, secs(6)), None);
        let closed = session.step(false, secs(9)).unwrap();
        assert_eq!(closed.kind, ZoneStatus::Working);
        assert_eq!((closed.started_at, closed.ended_at), (secs(4), secs(9)));
    }

    #[test]
    fn active_interval_invariant_holds() {
        let mut session = WorkSession::new(secs(0));
        for (flag, t) in [(true, 1), (true, 2), (false, 3), (true, 3), (false, 9)] {
            session.step(flag, secs(t));
            assert!(session.work_started_at().is_some() ^ session.pause_started_at().is_some());
            match session.status() {
                ZoneStatus::Working => assert!(session.work_started_at().is_some()),
                ZoneStatus::Paused => assert!(session.pause_started_at().is_some()),
            }
        }
        session.finalize(secs(10));
        assert!(session.work_started_at().is_none());
        assert!(session.pause_started_at().is_none());
    }

    #[test]
    fn display_values_split_live_time() {
        let mut session = WorkSession::new(secs(0));
        session.step(true, secs(2));

        assert_eq!(session.current_display_work(secs(5)), secs(3));
        assert_eq!(session.current_display_pause(secs(5)), secs(2));
        // Only closed intervals are in the accumulators.
        assert_eq!(session.accumulated_work(), Duration::ZERO);

        let mut previous = Duration::ZERO;
        for t in 2..12 {
            let totals = session.totals(secs(t));
            assert_eq!(totals.total(), secs(t));
            assert!(totals.total() >= previous);
            previous = totals.total();
        }
    }

    #[test]
    fn never_in_zone_is_all_pause() {
        let mut session = WorkSession::new(secs(0));
        for t in 0..50 {
            session.step(false, secs(t));
        }
        session.finalize(secs(60));
        assert_eq!(session.status(), ZoneStatus::Paused);
        assert_eq!(session.accumulated_work(), Duration::ZERO);
        assert_eq!(session.accumulated_pause(), secs(60));
    }

    #[test]
    fn always_in_zone_keeps_only_the_initial_pause() {
        let mut session = WorkSession::new(secs(0));
        for t in 4..30 {
            session.step(true, secs(t));
        }
        session.finalize(secs(30));
        assert_eq!(session.accumulated_pause(), secs(4));
        assert_eq!(session.accumulated_work(), secs(26));

        let mut immediate = WorkSession::new(secs(0));
        immediate.step(true, secs(0));
        immediate.finalize(secs(8));
        assert_eq!(immediate.accumulated_pause(), Duration::ZERO);
        assert_eq!(immediate.accumulated_work(), secs(8));
        assert_eq!(immediate.timeline().len(), 1);
    }

    #[test]
    fn finalize_is_idempotent_and_freezes_the_session() {
        let mut session = WorkSession::new(secs(0));
        session.step(true, secs(2));
        assert!(session.finalize(secs(5)).is_some());
        let (work, pause) = (session.accumulated_work(), session.accumulated_pause());

        assert!(session.finalize(secs(50)).is_none());
        assert_eq!(session.step(false, secs(60)), None);
        assert_eq!(session.accumulated_work(), work);
        assert_eq!(session.accumulated_pause(), pause);
        assert_eq!(session.current_display_work(secs(99)), work);
        assert_eq!(session.current_display_pause(secs(99)), pause);
        assert_eq!(session.finalized_at(), Some(secs(5)));
    }

    #[test]
    fn clock_regression_never_shrinks_totals() {
        let mut session = WorkSession::new(secs(10));
        session.step(true, secs(15));
        session.step(false, secs(12));
        assert_eq!(session.accumulated_work(), Duration::ZERO);
        assert_eq!(session.accumulated_pause(), secs(5));

        // Pause reopened at the high-water mark, not at the regressed reading.
        assert_eq!(session.pause_started_at(), Some(secs(15)));
        assert_eq!(session.current_display_pause(secs(11)), secs(5));

        session.finalize(secs(20));
        assert_eq!(session.accumulated_pause() + session.accumulated_work(), secs(10));
    }

    #[test]
    fn zero_length_intervals_add_nothing() {
        let mut session = WorkSession::new(secs(7));
        session.step(true, secs(7));
        session.step(false, secs(7));
        session.step(true, secs(7));
        session.finalize(secs(7));
        assert_eq!(session.accumulated_work(), Duration::ZERO);
        assert_eq!(session.accumulated_pause(), Duration::ZERO);
        assert!(session.timeline().is_empty());
    }

    #[test]
    fn random_runs_conserve_total_duration() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let start = Duration::from_millis(rng.gen_range(0..10_000));
            let mut session = WorkSession::new(start);
            let mut now = start;
            for _ in 0..rng.gen_range(0..80) {
                now += Duration::from_millis(rng.gen_range(0..500));
                session.step(rng.gen_bool(0.5), now);
            }
            let end = now + Duration::from_millis(rng.gen_range(0..500));
            session.finalize(end);

            assert_eq!(
                session.accumulated_work() + session.accumulated_pause(),
                end - start
            );
            let timeline_total: Duration = session.timeline().iter().map(|i| i.duration()).sum();
            assert_eq!(timeline_total, end - start);
        }
    }
}
