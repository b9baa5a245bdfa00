use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::camera::domain::capture_device::CaptureDevice;
use crate::filtering::domain::filter_kind::FilterKind;
use crate::filtering::domain::filter_selector::FilterSelector;
use crate::pipeline::frame_processor::FrameProcessor;
use crate::pipeline::infrastructure::capture_worker::{
    spawn_capture_worker, CaptureHandle, CaptureRequest,
};
use crate::pipeline::infrastructure::preview_worker::{record, spawn_preview_worker, PreviewStats};
use crate::pipeline::session_logger::SharedSessionLogger;
use crate::settings::Settings;
use crate::shared::error::CameraError;
use crate::shared::processed_frame::ProcessedFrame;

/// Coordinates a capture device, the filter selector and the two workers.
///
/// `start` opens the device and wires its preview and photo outputs exactly
/// once. Filter changes from the caller's thread take effect on the next
/// preview frame and on any capture that has not started processing yet.
pub struct CameraSession {
    selector: Arc<FilterSelector>,
    stop: Arc<AtomicBool>,
    requests: Option<Sender<CaptureRequest>>,
    preview: Option<JoinHandle<PreviewStats>>,
    capture: Option<JoinHandle<()>>,
    capture_timeout: Duration,
    logger: SharedSessionLogger,
    stats: PreviewStats,
}

impl CameraSession {
    /// Opens `device` and starts both workers with the `None` filter selected.
    ///
    /// Returns the session and the receiving end of the preview display
    /// channel.
    pub fn start(
        device: &mut dyn CaptureDevice,
        settings: &Settings,
        logger: SharedSessionLogger,
    ) -> Result<(Self, Receiver<ProcessedFrame>), CameraError> {
        Self::start_with_selector(device, settings, Arc::new(FilterSelector::new()), logger)
    }

    /// Like [`CameraSession::start`], sharing an existing selector.
    pub fn start_with_selector(
        device: &mut dyn CaptureDevice,
        settings: &Settings,
        selector: Arc<FilterSelector>,
        logger: SharedSessionLogger,
    ) -> Result<(Self, Receiver<ProcessedFrame>), CameraError> {
        device.open()?;
        let stream = device.preview_stream()?;
        let photo_output = device.photo_output()?;

        let processor = Arc::new(FrameProcessor::new(&settings.filters));
        let stop = Arc::new(AtomicBool::new(false));
        let (preview_tx, preview_rx) = crossbeam_channel::bounded(settings.preview_capacity.max(1));
        let (request_tx, request_rx) = crossbeam_channel::unbounded();

        let preview = spawn_preview_worker(
            stream,
            Arc::clone(&processor),
            Arc::clone(&selector),
            preview_tx,
            Arc::clone(&stop),
            Arc::clone(&logger),
        )
        .map_err(|e| CameraError::Device(format!("failed to start preview thread: {e}")))?;

        let capture = match spawn_capture_worker(
            photo_output,
            processor,
            Arc::clone(&selector),
            request_rx,
            Arc::clone(&logger),
        ) {
            Ok(handle) => handle,
            Err(e) => {
                stop.store(true, Ordering::Relaxed);
                let _ = preview.join();
                return Err(CameraError::Device(format!(
                    "failed to start capture thread: {e}"
                )));
            }
        };

        let started = format!(
            "Camera session started on {} (filter: {})",
            device.name(),
            selector.current()
        );
        record(&logger, |l| l.info(&started));

        let session = Self {
            selector,
            stop,
            requests: Some(request_tx),
            preview: Some(preview),
            capture: Some(capture),
            capture_timeout: Duration::from_millis(settings.capture_timeout_ms),
            logger,
            stats: PreviewStats::default(),
        };
        Ok((session, preview_rx))
    }

    pub fn selector(&self) -> &Arc<FilterSelector> {
        &self.selector
    }

    pub fn current_filter(&self) -> FilterKind {
        self.selector.current()
    }

    pub fn next_filter(&self) -> FilterKind {
        self.selector.advance()
    }

    pub fn previous_filter(&self) -> FilterKind {
        self.selector.retreat()
    }

    /// Requests one filtered photo.
    ///
    /// The result is delivered to the returned handle exactly once. A stopped
    /// session resolves it to [`CameraError::CaptureSessionUnavailable`]
    /// without touching the device.
    pub fn capture(&self) -> CaptureHandle {
        let Some(requests) = &self.requests else {
            return CaptureHandle::resolved(Err(CameraError::CaptureSessionUnavailable));
        };
        let (request, handle) = CaptureRequest::channel();
        if requests.send(request).is_err() {
            return CaptureHandle::resolved(Err(CameraError::CaptureSessionUnavailable));
        }
        handle
    }

    /// Configured upper bound for [`CaptureHandle::wait_timeout`].
    pub fn capture_timeout(&self) -> Duration {
        self.capture_timeout
    }

    pub fn is_running(&self) -> bool {
        self.requests.is_some()
    }

    /// Stops accepting work and joins both workers.
    ///
    /// Captures already requested are still answered before the capture
    /// thread exits. Calling `stop` again returns the same statistics.
    pub fn stop(&mut self) -> PreviewStats {
        if self.requests.take().is_none() {
            return self.stats;
        }
        self.stop.store(true, Ordering::Relaxed);

        if let Some(handle) = self.preview.take() {
            match handle.join() {
                Ok(stats) => self.stats = stats,
                Err(_) => log::error!("Preview thread panicked"),
            }
        }
        if let Some(handle) = self.capture.take() {
            if handle.join().is_err() {
                log::error!("Capture thread panicked");
            }
        }

        let stopped = format!(
            "Camera session stopped ({} shown, {} dropped, {} failed)",
            self.stats.processed, self.stats.dropped, self.stats.failed
        );
        if let Ok(mut logger) = self.logger.lock() {
            logger.info(&stopped);
            logger.summary();
        }
        self.stats
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}
