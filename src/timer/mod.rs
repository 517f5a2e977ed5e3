pub mod clock;
pub mod state;

pub use clock::{ClockMode, RunClock};
pub use state::{SessionTotals, WorkSession, ZoneStatus};
