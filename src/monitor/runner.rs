use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use super::controller::MonitorController;
use crate::{
    detection::HandDetector,
    models::{RunOutcome, RunSummary},
    render::FrameRenderer,
    video::FrameSource,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

const PROGRESS_EVERY_FRAMES: u64 = 30;

/// Pulls frames until the source runs dry or `cancel_token` fires, then
/// finalizes the run exactly once.
///
/// Source, detector and renderer failures end the run with an error; the
/// totals accumulated so far are logged before returning.
pub fn run_frames<D, S>(
    controller: &mut MonitorController<D>,
    source: &mut S,
    mut renderer: Option<&mut FrameRenderer>,
    cancel_token: &CancellationToken,
) -> Result<RunSummary>
where
    D: HandDetector,
    S: FrameSource + ?Sized,
{
    let outcome = loop {
        if cancel_token.is_cancelled() {
            log_info!("cancellation requested; stopping before the next frame");
            break RunOutcome::Cancelled;
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break RunOutcome::Completed,
            Err(err) => {
                log_partial(controller);
                return Err(err).context("frame source failed");
            }
        };

        let report = match controller.process_frame(&frame) {
            Ok(report) => report,
            Err(err) => {
                log_partial(controller);
                return Err(err);
            }
        };

        if let Some(renderer) = renderer.as_deref_mut() {
            if let Err(err) = renderer.render(frame.image, &report, controller.zones()) {
                log_partial(controller);
                return Err(err).with_context(|| format!("failed to render frame {}", report.index));
            }
        }

        if (report.index + 1) % PROGRESS_EVERY_FRAMES == 0 {
            log_info!(
                "frame {}: {} | work {:.1}s | pause {:.1}s",
                report.index,
                report.snapshot.state.as_str(),
                report.snapshot.work_seconds,
                report.snapshot.pause_seconds
            );
        }
    };

    Ok(controller.finish(outcome))
}

fn log_partial<D: HandDetector>(controller: &MonitorController<D>) {
    let snapshot = controller.snapshot();
    log_error!(
        "run {} aborted after {} frame(s): work {:.1}s, pause {:.1}s",
        controller.run_id(),
        controller.frames_processed(),
        snapshot.work_seconds,
        snapshot.pause_seconds
    );
}
