pub mod controller;
pub mod runner;

pub use controller::{hands_in_zone, FrameReport, MonitorController};
pub use runner::run_frames;
