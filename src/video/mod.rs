pub mod sequence;

use anyhow::Result;

use crate::detection::Frame;

pub use sequence::{BlankFrames, ImageSequence};

/// A stream of frames consumed in arrival order. `Ok(None)` means the stream
/// is exhausted.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        (**self).next_frame()
    }
}
