use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::shared::error::CameraError;
use crate::shared::frame::Frame;
use crate::shared::orientation::Orientation;

/// Decodes an image file into a [`Frame`] without applying its orientation.
///
/// The pixel buffer is kept exactly as stored; the EXIF orientation (if any)
/// becomes the frame's orientation tag, like a sensor buffer straight from a
/// camera. Images with alpha decode to RGBA, everything else to RGB.
pub fn decode_image(path: &Path) -> Result<Frame, CameraError> {
    let device_err = |e: image::ImageError| CameraError::Device(format!("{}: {e}", path.display()));

    let reader = ImageReader::open(path)
        .map_err(|e| CameraError::Device(format!("{}: {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| CameraError::Device(format!("{}: {e}", path.display())))?;
    let mut decoder = reader.into_decoder().map_err(device_err)?;

    let orientation = decoder
        .orientation()
        .ok()
        .and_then(|o| Orientation::from_exif(o.to_exif() as u16))
        .unwrap_or_default();

    let image = DynamicImage::from_decoder(decoder).map_err(device_err)?;
    Ok(frame_from_image(image).with_orientation(orientation))
}

pub fn frame_from_image(image: DynamicImage) -> Frame {
    let (width, height) = (image.width(), image.height());
    if image.color().has_alpha() {
        Frame::new(image.into_rgba8().into_raw(), width, height, 4, 0)
    } else {
        Frame::new(image.into_rgb8().into_raw(), width, height, 3, 0)
    }
}
