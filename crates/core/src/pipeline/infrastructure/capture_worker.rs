use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::camera::domain::capture_device::PhotoOutput;
use crate::filtering::domain::filter_selector::FilterSelector;
use crate::pipeline::frame_processor::FrameProcessor;
use crate::pipeline::infrastructure::preview_worker::record;
use crate::pipeline::session_logger::SharedSessionLogger;
use crate::shared::error::CameraError;
use crate::shared::processed_frame::ProcessedFrame;

pub type CaptureResult = Result<ProcessedFrame, CameraError>;

/// One pending capture. The worker answers on `reply` exactly once.
pub struct CaptureRequest {
    reply: Sender<CaptureResult>,
}

impl CaptureRequest {
    /// Creates a request together with the handle its caller waits on.
    pub fn channel() -> (Self, CaptureHandle) {
        let (reply, receiver) = crossbeam_channel::bounded(1);
        (Self { reply }, CaptureHandle { reply: receiver })
    }

    fn complete(self, result: CaptureResult) {
        // The caller may have given up on the handle already.
        let _ = self.reply.send(result);
    }
}

/// Completion side of a capture request.
///
/// Consuming the handle in `wait` means a result can be observed only once.
pub struct CaptureHandle {
    reply: Receiver<CaptureResult>,
}

impl CaptureHandle {
    /// A handle that is already complete, used when no worker is available.
    pub(crate) fn resolved(result: CaptureResult) -> Self {
        let (request, handle) = CaptureRequest::channel();
        request.complete(result);
        handle
    }

    /// Blocks until the capture finishes.
    ///
    /// A worker that exits without answering reports
    /// [`CameraError::CaptureSessionUnavailable`].
    pub fn wait(self) -> CaptureResult {
        self.reply
            .recv()
            .unwrap_or(Err(CameraError::CaptureSessionUnavailable))
    }

    pub fn wait_timeout(self, timeout: Duration) -> CaptureResult {
        match self.reply.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(CameraError::CaptureTimedOut {
                after_ms: timeout.as_millis() as u64,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(CameraError::CaptureSessionUnavailable),
        }
    }
}

/// Spawns the capture thread: `request -> photo output -> filter -> reply`.
///
/// Requests are served in order. The filter is read when the photo arrives,
/// so a filter change made while the shutter is open applies to that photo.
/// The thread ends once every request sender is dropped.
pub fn spawn_capture_worker(
    mut photo_output: Box<dyn PhotoOutput>,
    processor: Arc<FrameProcessor>,
    selector: Arc<FilterSelector>,
    requests: Receiver<CaptureRequest>,
    logger: SharedSessionLogger,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("filtercam-capture".into())
        .spawn(move || {
            for request in requests {
                let started = Instant::now();
                let result = capture_once(photo_output.as_mut(), &processor, &selector);
                let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

                let filter = match &result {
                    Ok(photo) => photo.filter(),
                    Err(e) => {
                        log::warn!("Capture failed: {e}");
                        selector.current()
                    }
                };
                let success = result.is_ok();
                record(&logger, |l| l.capture_finished(filter, duration_ms, success));
                request.complete(result);
            }
            log::debug!("Capture worker finished");
        })
}

fn capture_once(
    photo_output: &mut dyn PhotoOutput,
    processor: &FrameProcessor,
    selector: &FilterSelector,
) -> CaptureResult {
    let photo = photo_output
        .capture_photo()?
        .ok_or(CameraError::UnknownCapture)?;
    let filter = selector.current();
    Ok(processor.process_capture(&photo, filter)?)
}
