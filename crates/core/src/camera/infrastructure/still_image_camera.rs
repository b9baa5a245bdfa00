use std::path::{Path, PathBuf};

use crate::camera::domain::capture_device::{CaptureDevice, PhotoOutput, PreviewStream};
use crate::shared::error::CameraError;
use crate::shared::frame::Frame;
use crate::shared::orientation::Orientation;

use super::image_decoder::decode_image;

/// Adapts a still image file to the [`CaptureDevice`] interface.
///
/// The decoded image is replayed as a fixed number of preview frames and
/// returned as the photo for every capture request, which lets the whole
/// session run without camera hardware.
pub struct StillImageCamera {
    path: PathBuf,
    name: String,
    preview_frames: usize,
    orientation: Option<Orientation>,
    frame: Option<Frame>,
}

impl StillImageCamera {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            name: format!("still image {}", path.display()),
            preview_frames: 0,
            orientation: None,
            frame: None,
        }
    }

    /// Number of preview frames the stream yields before ending.
    pub fn with_preview_frames(mut self, count: usize) -> Self {
        self.preview_frames = count;
        self
    }

    /// Overrides the orientation read from the file's metadata.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    fn opened_frame(&self) -> Result<Frame, CameraError> {
        self.frame
            .clone()
            .ok_or(CameraError::CaptureSessionUnavailable)
    }
}

impl CaptureDevice for StillImageCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> Result<(), CameraError> {
        if !self.path.is_file() {
            return Err(CameraError::NoCameraAvailable);
        }
        let mut frame = decode_image(&self.path)?;
        if let Some(orientation) = self.orientation {
            frame = frame.with_orientation(orientation);
        }
        log::info!(
            "Opened {} ({}x{}, orientation {})",
            self.name,
            frame.width(),
            frame.height(),
            frame.orientation()
        );
        self.frame = Some(frame);
        Ok(())
    }

    fn preview_stream(&mut self) -> Result<PreviewStream, CameraError> {
        let frame = self.opened_frame()?;
        let count = self.preview_frames;
        Ok(Box::new((0..count).map(move |i| {
            Ok::<_, CameraError>(frame.clone().with_index(i))
        })))
    }

    fn photo_output(&mut self) -> Result<Box<dyn PhotoOutput>, CameraError> {
        Ok(Box::new(StillPhotoOutput {
            frame: self.opened_frame()?,
            captured: 0,
        }))
    }
}

struct StillPhotoOutput {
    frame: Frame,
    captured: usize,
}

impl PhotoOutput for StillPhotoOutput {
    fn capture_photo(&mut self) -> Result<Option<Frame>, CameraError> {
        let frame = self.frame.clone().with_index(self.captured);
        self.captured += 1;
        Ok(Some(frame))
    }
}
