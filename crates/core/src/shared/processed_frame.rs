use crate::filtering::domain::filter_kind::FilterKind;

use super::frame::Frame;

/// Output of the frame processor: a freshly allocated frame plus the filter
/// that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessedFrame {
    frame: Frame,
    filter: FilterKind,
}

impl ProcessedFrame {
    pub fn new(frame: Frame, filter: FilterKind) -> Self {
        Self { frame, filter }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }
}
