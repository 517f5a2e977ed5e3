use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use super::geometry::Zone;

const ENABLE_LOGS: bool = true;

use crate::log_info;

pub const MIN_ZONE_POINTS: usize = 3;

/// Zone configuration file: a JSON array of `{"points": [[x, y], ...]}`.
///
/// A missing or blank file means no zone has been authored yet.
pub struct ZoneStore {
    path: PathBuf,
    zones: Vec<Zone>,
}

impl ZoneStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let zones = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read zones from {}", path.display()))?;
            parse_zones(&contents)
                .with_context(|| format!("Invalid zone configuration in {}", path.display()))?
        } else {
            Vec::new()
        };

        log_info!("Loaded {} zone(s) from {}", zones.len(), path.display());
        Ok(Self { path, zones })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn into_zones(self) -> Vec<Zone> {
        self.zones
    }

    pub fn add_zone(&mut self, zone: Zone) -> Result<()> {
        validate_zone(self.zones.len(), &zone)?;
        let mut zones = self.zones.clone();
        zones.push(zone);
        self.write_zones(&zones)?;
        self.zones = zones;
        log_info!("Zone saved, {} zone(s) total", self.zones.len());
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.write_zones(&[])?;
        self.zones.clear();
        Ok(())
    }

    /// Memory is only updated by callers once the file write succeeded.
    fn write_zones(&self, zones: &[Zone]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(zones)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write zones to {}", self.path.display()))
    }
}

pub fn parse_zones(contents: &str) -> Result<Vec<Zone>> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let zones: Vec<Zone> = serde_json::from_str(trimmed)?;
    for (index, zone) in zones.iter().enumerate() {
        validate_zone(index, zone)?;
    }
    Ok(zones)
}

fn validate_zone(index: usize, zone: &Zone) -> Result<()> {
    if zone.points.len() < MIN_ZONE_POINTS {
        bail!(
            "zone {index} has {} point(s); at least {MIN_ZONE_POINTS} are required",
            zone.points.len()
        );
    }
    Ok(())
}
