use crate::shared::error::CameraError;
use crate::shared::frame::Frame;

/// Continuous stream of preview frames, ending when the device stops.
pub type PreviewStream = Box<dyn Iterator<Item = Result<Frame, CameraError>> + Send>;

/// Still-photo side of a capture device.
pub trait PhotoOutput: Send {
    /// Blocks until the exposure completes.
    ///
    /// `Ok(None)` means the device finished without image data and without
    /// reporting an error.
    fn capture_photo(&mut self) -> Result<Option<Frame>, CameraError>;
}

/// A camera as seen by the session: it is opened once, then hands out its
/// preview stream and photo output, each exactly once.
///
/// Implementations handle device selection, formats and drivers; the
/// session only deals with [`Frame`] values.
pub trait CaptureDevice: Send {
    /// Human-readable device name for logs.
    fn name(&self) -> &str;

    /// Opens the device. Fails with [`CameraError::NoCameraAvailable`] when
    /// there is nothing to open.
    fn open(&mut self) -> Result<(), CameraError>;

    fn preview_stream(&mut self) -> Result<PreviewStream, CameraError>;

    fn photo_output(&mut self) -> Result<Box<dyn PhotoOutput>, CameraError>;
}
