use anyhow::{bail, Context, Result};
use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use super::FrameSource;
use crate::detection::Frame;

const ENABLE_LOGS: bool = true;

use crate::log_info;

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

fn frame_timestamp(index: u64, fps: f64) -> Duration {
    Duration::from_nanos((index as f64 * 1e9 / fps).round() as u64)
}

fn check_fps(fps: f64) -> Result<()> {
    if !fps.is_finite() || fps <= 0.0 {
        bail!("fps must be a positive number, got {fps}");
    }
    Ok(())
}

/// Frames stored as numbered images in one directory, read in file-name order.
pub struct ImageSequence {
    pending: VecDeque<PathBuf>,
    fps: f64,
    next_index: u64,
}

impl ImageSequence {
    pub fn open(dir: &Path, fps: f64) -> Result<Self> {
        check_fps(fps)?;

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to list frames in {}", dir.display()))?
        {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if path.is_file() && is_image {
                paths.push(path);
            }
        }
        paths.sort();

        log_info!("Found {} frame image(s) in {}", paths.len(), dir.display());
        Ok(Self {
            pending: paths.into(),
            fps,
            next_index: 0,
        })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };

        let image = image::open(&path)
            .with_context(|| format!("Failed to decode frame {}", path.display()))?
            .to_rgb8();
        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(Frame::new(index, frame_timestamp(index, self.fps), image)))
    }
}

/// A fixed number of black frames, for replaying landmarks without footage.
pub struct BlankFrames {
    width: u32,
    height: u32,
    fps: f64,
    count: u64,
    next_index: u64,
}

impl BlankFrames {
    pub fn new(width: u32, height: u32, fps: f64, count: u64) -> Result<Self> {
        check_fps(fps)?;
        Ok(Self {
            width,
            height,
            fps,
            count,
            next_index: 0,
        })
    }
}

impl FrameSource for BlankFrames {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.next_index >= self.count {
            return Ok(None);
        }
        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(Frame::blank(
            index,
            frame_timestamp(index, self.fps),
            self.width,
            self.height,
        )))
    }
}
