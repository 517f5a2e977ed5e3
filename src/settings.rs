use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{timer::ClockMode, zones::BoundaryRule};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.json";

/// Tunables for a monitoring run. Every field has a default, so a partial
/// settings file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorSettings {
    pub zones_path: PathBuf,
    pub clock: ClockMode,
    pub boundary: BoundaryRule,
    /// Frame rate assumed for image sequences and blank replays.
    pub fps: f64,
    /// Size of blank frames when replaying landmarks without footage.
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            zones_path: PathBuf::from("config/restricted_zones.json"),
            clock: ClockMode::Video,
            boundary: BoundaryRule::Inclusive,
            fps: 30.0,
            frame_width: 1280,
            frame_height: 720,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: MonitorSettings,
}

impl SettingsStore {
    /// Missing file means defaults. A file that is present but not valid
    /// settings JSON also falls back to defaults, with a warning.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(data) => {
                    log_info!("Loaded settings from {}", path.display());
                    data
                }
                Err(err) => {
                    log_warn!("Ignoring unreadable settings {}: {err}", path.display());
                    MonitorSettings::default()
                }
            }
        } else {
            MonitorSettings::default()
        };

        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.data
    }

    pub fn into_settings(self) -> MonitorSettings {
        self.data
    }
}
