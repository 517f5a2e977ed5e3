pub mod detector;
pub mod replay;
pub mod types;

pub use detector::HandDetector;
pub use replay::ReplayDetector;
pub use types::{BoundingBox, Frame, Hand};
