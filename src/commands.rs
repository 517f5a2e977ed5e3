use anyhow::{bail, Context, Result};
use std::{fs, path::Path};
use tokio_util::sync::CancellationToken;

use crate::{
    cli::{MonitorArgs, ZoneAction},
    detection::ReplayDetector,
    models::RunSummary,
    monitor::{run_frames, MonitorController},
    render::FrameRenderer,
    settings::MonitorSettings,
    video::{BlankFrames, FrameSource, ImageSequence},
    zones::{Zone, ZoneSet, ZoneStore},
};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub async fn monitor(args: MonitorArgs, settings: MonitorSettings) -> Result<RunSummary> {
    let settings = args.apply(settings);

    let store = ZoneStore::open(&settings.zones_path)?;
    if store.is_empty() {
        bail!(
            "no zones configured in {}; author one with `zonewatch zones add --point X,Y ...` first",
            store.path().display()
        );
    }
    let zones = ZoneSet::new(store.into_zones(), settings.boundary);

    let detector = ReplayDetector::open(&args.landmarks)?;
    let mut source: Box<dyn FrameSource> = match &args.frames {
        Some(dir) => Box::new(ImageSequence::open(dir, settings.fps)?),
        None => {
            let count = args.frame_count.unwrap_or_else(|| detector.span());
            log_info!(
                "No footage given; replaying {} blank {}x{} frame(s)",
                count,
                settings.frame_width,
                settings.frame_height
            );
            Box::new(BlankFrames::new(
                settings.frame_width,
                settings.frame_height,
                settings.fps,
                count,
            )?)
        }
    };
    let mut renderer = args
        .output
        .as_deref()
        .map(FrameRenderer::new)
        .transpose()?;

    let cancel_token = CancellationToken::new();
    let worker_token = cancel_token.clone();
    let clock_mode = settings.clock;

    // Frames are processed one at a time on a single blocking worker.
    let mut worker = tokio::task::spawn_blocking(move || {
        let mut controller = MonitorController::new(zones, detector, clock_mode);
        run_frames(&mut controller, &mut source, renderer.as_mut(), &worker_token)
    });

    let summary = tokio::select! {
        joined = &mut worker => joined.context("monitor worker failed to join")??,
        _ = tokio::signal::ctrl_c() => {
            log_warn!("Interrupt received; finishing after the current frame");
            cancel_token.cancel();
            worker.await.context("monitor worker failed to join")??
        }
    };

    if let Some(path) = &args.report {
        write_report(path, &summary)?;
    }
    Ok(summary)
}

pub fn write_report(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let serialized = serde_json::to_string_pretty(summary)?;
    fs::write(path, serialized)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    log_info!("Run report written to {}", path.display());
    Ok(())
}

/// Returns the lines to print for the action.
pub fn zones(store_path: &Path, action: ZoneAction) -> Result<Vec<String>> {
    let mut store = ZoneStore::open(store_path)?;

    match action {
        ZoneAction::List => {
            if store.is_empty() {
                return Ok(vec![format!("no zones in {}", store.path().display())]);
            }
            Ok(store
                .zones()
                .iter()
                .enumerate()
                .map(|(index, zone)| format!("zone {index}: {}", describe(zone)))
                .collect())
        }
        ZoneAction::Add { points } => {
            store.add_zone(Zone::new(points))?;
            Ok(vec![format!(
                "zone saved to {} ({} total)",
                store.path().display(),
                store.zones().len()
            )])
        }
        ZoneAction::Clear => {
            store.clear()?;
            Ok(vec![format!("cleared {}", store.path().display())])
        }
    }
}

fn describe(zone: &Zone) -> String {
    zone.points
        .iter()
        .map(|p| format!("({}, {})", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::Point;
    use std::path::PathBuf;

    fn monitor_args(landmarks: PathBuf, zones: PathBuf) -> MonitorArgs {
        MonitorArgs {
            landmarks,
            frames: None,
            frame_count: None,
            zones: Some(zones),
            fps: Some(10.0),
            clock: None,
            exclusive_boundary: false,
            output: None,
            report: None,
        }
    }

    #[test]
    fn zone_actions_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zones.json");

        let lines = zones(&path, ZoneAction::List).unwrap();
        assert!(lines[0].starts_with("no zones"));

        let points = vec![Point::new(0, 0), Point::new(9, 0), Point::new(9, 9)];
        zones(&path, ZoneAction::Add { points }).unwrap();
        let lines = zones(&path, ZoneAction::List).unwrap();
        assert_eq!(lines, vec!["zone 0: (0, 0) (9, 0) (9, 9)".to_string()]);

        assert!(zones(
            &path,
            ZoneAction::Add {
                points: vec![Point::new(1, 1)]
            }
        )
        .is_err());

        zones(&path, ZoneAction::Clear).unwrap();
        assert!(zones(&path, ZoneAction::List).unwrap()[0].starts_with("no zones"));
    }

    #[tokio::test]
    async fn monitor_refuses_to_run_without_zones() {
        let dir = tempfile::tempdir().unwrap();
        let landmarks = dir.path().join("hands.jsonl");
        fs::write(&landmarks, "").unwrap();

        let err = monitor(
            monitor_args(landmarks, dir.path().join("zones.json")),
            MonitorSettings::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("no zones configured"));
    }

    #[tokio::test]
    async fn monitor_writes_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let zones_path = dir.path().join("zones.json");
        fs::write(&zones_path, r#"[{"points": [[0, 0], [100, 0], [100, 100], [0, 100]]}]"#)
            .unwrap();
        let landmarks = dir.path().join("hands.jsonl");
        fs::write(
            &landmarks,
            "{\"frame\": 2, \"hands\": [[[50, 50]]]}\n{\"frame\": 3, \"hands\": [[[50, 50]]]}\n{\"frame\": 9, \"hands\": []}\n",
        )
        .unwrap();

        let mut args = monitor_args(landmarks, zones_path);
        let report_path = dir.path().join("out").join("report.json");
        args.report = Some(report_path.clone());

        let summary = monitor(args, MonitorSettings::default()).await.unwrap();
        assert_eq!(summary.frames_processed, 10);
        assert!((summary.work_seconds - 0.2).abs() < 1e-9);
        assert!((summary.total_seconds - 0.9).abs() < 1e-9);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(written["framesProcessed"], 10);
        assert_eq!(written["outcome"], "completed");
        assert_eq!(written["intervals"][1]["kind"], "WORKING");
    }
}
