use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Sender, TrySendError};

use crate::camera::domain::capture_device::PreviewStream;
use crate::filtering::domain::filter_selector::FilterSelector;
use crate::pipeline::frame_processor::FrameProcessor;
use crate::pipeline::session_logger::{DropReason, SessionLogger, SharedSessionLogger};
use crate::shared::processed_frame::ProcessedFrame;

/// Counters reported by the preview thread when it exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviewStats {
    /// Frames filtered and handed to the display.
    pub processed: usize,
    /// Frames discarded because the display was busy or the device erred.
    pub dropped: usize,
    /// Frames the filter could not process.
    pub failed: usize,
}

/// Spawns the preview thread: `device stream -> filter -> display channel`.
///
/// Each frame is processed with whatever filter is current when its
/// processing starts. Results are offered to `output` without blocking; a
/// full channel drops the frame. Filter failures drop the frame silently.
/// The thread ends when the stream ends, `stop` is set, or the display side
/// hangs up.
pub fn spawn_preview_worker(
    stream: PreviewStream,
    processor: Arc<FrameProcessor>,
    selector: Arc<FilterSelector>,
    output: Sender<ProcessedFrame>,
    stop: Arc<AtomicBool>,
    logger: SharedSessionLogger,
) -> std::io::Result<JoinHandle<PreviewStats>> {
    std::thread::Builder::new()
        .name("filtercam-preview".into())
        .spawn(move || run_preview_loop(stream, &processor, &selector, &output, &stop, &logger))
}

fn run_preview_loop(
    stream: PreviewStream,
    processor: &FrameProcessor,
    selector: &FilterSelector,
    output: &Sender<ProcessedFrame>,
    stop: &AtomicBool,
    logger: &SharedSessionLogger,
) -> PreviewStats {
    let mut stats = PreviewStats::default();

    for item in stream {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let frame = match item {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Preview stream error: {e}");
                stats.dropped += 1;
                record(logger, |l| l.frame_dropped(DropReason::DeviceError));
                continue;
            }
        };

        let filter = selector.current();
        let started = Instant::now();
        let processed = match processor.process(&frame, filter) {
            Ok(processed) => processed,
            Err(e) => {
                log::debug!("Dropping preview frame {} ({filter}): {e}", frame.index());
                stats.failed += 1;
                record(logger, |l| l.frame_dropped(DropReason::FilterFailed));
                continue;
            }
        };
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        match output.try_send(processed) {
            Ok(()) => {
                stats.processed += 1;
                record(logger, |l| l.frame_processed(filter, duration_ms));
            }
            Err(TrySendError::Full(_)) => {
                stats.dropped += 1;
                record(logger, |l| l.frame_dropped(DropReason::DisplayBusy));
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("Preview display disconnected, stopping preview");
                break;
            }
        }
    }

    stats
}

/// Forwards one event to the shared logger; a poisoned logger is ignored.
pub(crate) fn record(logger: &SharedSessionLogger, event: impl FnOnce(&mut dyn SessionLogger)) {
    if let Ok(mut guard) = logger.lock() {
        event(&mut *guard);
    }
}
