pub mod interval;
pub mod summary;

pub use interval::{Interval, IntervalRecord};
pub use summary::{MonitorSnapshot, RunOutcome, RunSummary};
