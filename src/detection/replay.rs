use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

use super::{
    detector::HandDetector,
    types::{Frame, Hand},
};
use crate::zones::Point;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Debug, Deserialize)]
struct LandmarkRecord {
    frame: u64,
    #[serde(default)]
    normalized: bool,
    #[serde(default)]
    hands: Vec<Vec<[f32; 2]>>,
}

/// Plays back hand landmarks recorded by an external pose service.
///
/// The recording is JSON lines, one object per frame:
/// `{"frame": 12, "normalized": false, "hands": [[[x, y], ...], ...]}`.
/// Frames with no line produce no hands.
pub struct ReplayDetector {
    records: HashMap<u64, LandmarkRecord>,
}

impl ReplayDetector {
    pub fn open(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read landmarks from {}", path.display()))?;
        let detector = Self::parse(&contents)
            .with_context(|| format!("Invalid landmark recording {}", path.display()))?;
        log_info!(
            "Loaded landmark recording with {} frame(s) from {}",
            detector.records.len(),
            path.display()
        );
        Ok(detector)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut records = HashMap::new();
        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: LandmarkRecord = serde_json::from_str(line)
                .with_context(|| format!("line {}: malformed landmark record", line_no + 1))?;
            if records.contains_key(&record.frame) {
                log_warn!("line {}: frame {} recorded twice, keeping the later one", line_no + 1, record.frame);
            }
            records.insert(record.frame, record);
        }
        Ok(Self { records })
    }

    pub fn frame_count(&self) -> usize {
        self.records.len()
    }

    /// One past the highest recorded frame index.
    pub fn span(&self) -> u64 {
        self.records.keys().max().map(|last| last + 1).unwrap_or(0)
    }
}

impl HandDetector for ReplayDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>> {
        let Some(record) = self.records.get(&frame.index) else {
            return Ok(Vec::new());
        };

        let hands = record
            .hands
            .iter()
            .filter_map(|landmarks| {
                if record.normalized {
                    Hand::from_normalized(landmarks, frame.width(), frame.height())
                } else {
                    Hand::from_landmarks(
                        landmarks
                            .iter()
                            .map(|[x, y]| Point::new(*x as i32, *y as i32))
                            .collect(),
                    )
                }
            })
            .collect();
        Ok(hands)
    }
}
