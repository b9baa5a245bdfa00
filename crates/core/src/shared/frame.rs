use ndarray::{ArrayView3, Axis};

use super::orientation::Orientation;

/// A single camera frame: contiguous interleaved bytes in row-major order.
///
/// `orientation` describes how the stored buffer must be turned to be
/// presented upright; the pixel data itself is always kept as delivered by
/// the sensor until [`Frame::to_upright`] is called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
    orientation: Orientation,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
            orientation: Orientation::Up,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// True when the pixel extent has zero area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Returns a copy of this frame with its pixels rearranged so the buffer
    /// is upright, tagged [`Orientation::Up`].
    ///
    /// Quarter-turn orientations swap width and height.
    pub fn to_upright(&self) -> Frame {
        let mut view = self.as_ndarray();
        match self.orientation {
            Orientation::Up => {}
            Orientation::UpMirrored => view.invert_axis(Axis(1)),
            Orientation::Down => {
                view.invert_axis(Axis(0));
                view.invert_axis(Axis(1));
            }
            Orientation::DownMirrored => view.invert_axis(Axis(0)),
            Orientation::LeftMirrored => view.swap_axes(0, 1),
            Orientation::Right => {
                view.swap_axes(0, 1);
                view.invert_axis(Axis(1));
            }
            Orientation::RightMirrored => {
                view.swap_axes(0, 1);
                view.invert_axis(Axis(0));
                view.invert_axis(Axis(1));
            }
            Orientation::Left => {
                view.swap_axes(0, 1);
                view.invert_axis(Axis(0));
            }
        }

        let (width, height) = self.orientation.upright_extent(self.width, self.height);
        Frame {
            data: view.iter().copied().collect(),
            width,
            height,
            channels: self.channels,
            index: self.index,
            orientation: Orientation::Up,
        }
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
