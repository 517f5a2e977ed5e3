use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::{
    settings::{MonitorSettings, DEFAULT_SETTINGS_PATH},
    timer::ClockMode,
    zones::{BoundaryRule, Point},
};

/// Tracks how long an operator's hands spend inside the conveyor work zone.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file; missing keys fall back to defaults
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    pub settings: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a landmark recording against the work zones
    Monitor(MonitorArgs),
    /// Inspect or edit the zone configuration
    Zones {
        /// Zone file, overriding the settings
        #[arg(long)]
        zones: Option<PathBuf>,

        #[command(subcommand)]
        action: ZoneAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ZoneAction {
    /// Print the configured zones
    List,
    /// Append a polygon; give at least three points
    Add {
        #[arg(short, long = "point", value_parser = parse_point, required = true)]
        points: Vec<Point>,
    },
    /// Remove every zone
    Clear,
}

#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    /// JSON-lines hand landmark recording
    #[arg(short, long)]
    pub landmarks: PathBuf,

    /// Directory of frame images; blank frames are used when omitted
    #[arg(short, long)]
    pub frames: Option<PathBuf>,

    /// Number of blank frames to replay (defaults to the recording's span)
    #[arg(long)]
    pub frame_count: Option<u64>,

    /// Zone file, overriding the settings
    #[arg(long)]
    pub zones: Option<PathBuf>,

    #[arg(long)]
    pub fps: Option<f64>,

    #[arg(long, value_enum)]
    pub clock: Option<ClockArg>,

    /// Count points exactly on a zone edge as outside
    #[arg(long)]
    pub exclusive_boundary: bool,

    /// Write annotated frames here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the run summary JSON here
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockArg {
    Video,
    Wall,
}

impl From<ClockArg> for ClockMode {
    fn from(arg: ClockArg) -> Self {
        match arg {
            ClockArg::Video => ClockMode::Video,
            ClockArg::Wall => ClockMode::Wall,
        }
    }
}

impl MonitorArgs {
    /// Command-line flags win over the settings file.
    pub fn apply(&self, mut settings: MonitorSettings) -> MonitorSettings {
        if let Some(zones) = &self.zones {
            settings.zones_path = zones.clone();
        }
        if let Some(fps) = self.fps {
            settings.fps = fps;
        }
        if let Some(clock) = self.clock {
            settings.clock = clock.into();
        }
        if self.exclusive_boundary {
            settings.boundary = BoundaryRule::Exclusive;
        }
        settings
    }
}

pub fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{raw}'"))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|err| format!("bad x in '{raw}': {err}"))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|err| format!("bad y in '{raw}': {err}"))?;
    Ok(Point::new(x, y))
}
