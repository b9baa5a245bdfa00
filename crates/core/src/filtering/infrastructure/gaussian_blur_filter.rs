use crate::filtering::domain::image_filter::{ensure_filterable, restore_alpha, ImageFilter};
use crate::shared::constants::{DEFAULT_BLUR_RADIUS, MAX_BLUR_RADIUS};
use crate::shared::error::FilterError;
use crate::shared::frame::Frame;

use super::gaussian::{self, BlurKernels};

/// Whole-frame separable Gaussian blur.
///
/// The radius is the Gaussian sigma in pixels. Edges are clamped so the
/// output keeps the input extent. Radii above [`MAX_BLUR_RADIUS`] are clamped to it.
pub struct GaussianBlurFilter {
    kernels: BlurKernels,
}

impl GaussianBlurFilter {
    pub fn new(radius: f32) -> Self {
        let radius = if radius > MAX_BLUR_RADIUS {
            MAX_BLUR_RADIUS
        } else {
            radius
        };
        Self {
            kernels: BlurKernels::for_radius(radius),
        }
    }
}

impl Default for GaussianBlurFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_RADIUS)
    }
}

impl ImageFilter for GaussianBlurFilter {
    fn apply(&self, frame: &Frame) -> Result<Frame, FilterError> {
        ensure_filterable(frame)?;

        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let channels = frame.channels() as usize;

        let mut data = frame.data().to_vec();
        let mut temp = Vec::new();
        gaussian::blur_in_place(&mut data, width, height, channels, &self.kernels, &mut temp);
        restore_alpha(&mut data, frame);

        Ok(Frame::new(data, frame.width(), frame.height(), frame.channels(), frame.index())
            .with_orientation(frame.orientation()))
    }
}
