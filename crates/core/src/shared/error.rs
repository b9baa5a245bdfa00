use thiserror::Error;

/// A filter could not turn its input into a usable output frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("cannot filter a frame with empty extent ({width}x{height})")]
    EmptyExtent { width: u32, height: u32 },
    #[error("filter failed: {0}")]
    Failed(String),
}

/// Failures surfaced by the camera session to its callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("no camera available")]
    NoCameraAvailable,
    #[error("capture session is not running")]
    CaptureSessionUnavailable,
    #[error("filter application failed: {0}")]
    FilterApplication(#[from] FilterError),
    #[error("capture completed without image data or error")]
    UnknownCapture,
    #[error("capture did not complete within {after_ms}ms")]
    CaptureTimedOut { after_ms: u64 },
    #[error("capture device error: {0}")]
    Device(String),
}
