use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::zones::Point;

/// One decoded video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: u64,
    /// Presentation time relative to the start of the stream.
    pub timestamp: Duration,
    pub image: RgbImage,
}

impl Frame {
    pub fn new(index: u64, timestamp: Duration, image: RgbImage) -> Self {
        Self {
            index,
            timestamp,
            image,
        }
    }

    pub fn blank(index: u64, timestamp: Duration, width: u32, height: u32) -> Self {
        Self::new(index, timestamp, RgbImage::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Axis-aligned box in pixel coordinates, inclusive on both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.x_max.abs_diff(self.x_min).saturating_add(1)
    }

    pub fn height(&self) -> u32 {
        self.y_max.abs_diff(self.y_min).saturating_add(1)
    }
}

/// A detected hand: its keypoints and their bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    pub landmarks: Vec<Point>,
    pub bbox: BoundingBox,
}

impl Hand {
    /// Returns `None` when there are no landmarks to bound.
    pub fn from_landmarks(landmarks: Vec<Point>) -> Option<Self> {
        let first = *landmarks.first()?;
        let mut bbox = BoundingBox {
            x_min: first.x,
            y_min: first.y,
            x_max: first.x,
            y_max: first.y,
        };
        for point in &landmarks[1..] {
            bbox.x_min = bbox.x_min.min(point.x);
            bbox.y_min = bbox.y_min.min(point.y);
            bbox.x_max = bbox.x_max.max(point.x);
            bbox.y_max = bbox.y_max.max(point.y);
        }
        Some(Self { landmarks, bbox })
    }

    /// Converts `[0, 1]` landmark coordinates into pixels, truncating toward
    /// zero the way pose-estimation services report them.
    pub fn from_normalized(normalized: &[[f32; 2]], width: u32, height: u32) -> Option<Self> {
        let landmarks = normalized
            .iter()
            .map(|[x, y]| Point::new((x * width as f32) as i32, (y * height as f32) as i32))
            .collect();
        Self::from_landmarks(landmarks)
    }
}
