use anyhow::Result;

use super::types::{Frame, Hand};

/// Anything that can find hands in a frame.
///
/// Implementations may keep tracking state between calls, hence `&mut self`.
pub trait HandDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>>;
}

impl<D: HandDetector + ?Sized> HandDetector for Box<D> {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>> {
        (**self).detect(frame)
    }
}
