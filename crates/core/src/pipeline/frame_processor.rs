use crate::filtering::domain::filter_kind::FilterKind;
use crate::filtering::domain::image_filter::{ensure_filterable, ImageFilter};
use crate::filtering::infrastructure::filter_factory::create_filter;
use crate::settings::FilterSettings;
use crate::shared::error::FilterError;
use crate::shared::frame::Frame;
use crate::shared::processed_frame::ProcessedFrame;

/// Applies the selected filter to frames, identically for the preview stream
/// and for captured photos.
///
/// All filters are built once up front and are stateless, so a single
/// processor can be shared through an `Arc` by the preview and capture
/// threads.
pub struct FrameProcessor {
    filters: Vec<Option<Box<dyn ImageFilter>>>,
}

impl FrameProcessor {
    pub fn new(settings: &FilterSettings) -> Self {
        Self {
            filters: FilterKind::ALL
                .iter()
                .map(|&kind| create_filter(kind, settings))
                .collect(),
        }
    }

    /// Preview path: filters the buffer in its raw orientation.
    ///
    /// `FilterKind::None` returns an exact copy of the input.
    pub fn process(&self, frame: &Frame, filter: FilterKind) -> Result<ProcessedFrame, FilterError> {
        match self.filter_for(filter) {
            None => Ok(ProcessedFrame::new(frame.clone(), filter)),
            Some(f) => self.run(f, frame, filter),
        }
    }

    /// Capture path: reinterprets the buffer upright before filtering so
    /// spatial effects line up with what the user saw. The result is tagged
    /// upright.
    ///
    /// `FilterKind::None` passes the photo through with its orientation tag
    /// intact.
    pub fn process_capture(
        &self,
        frame: &Frame,
        filter: FilterKind,
    ) -> Result<ProcessedFrame, FilterError> {
        match self.filter_for(filter) {
            None => Ok(ProcessedFrame::new(frame.clone(), filter)),
            Some(f) => {
                ensure_filterable(frame)?;
                let upright = frame.to_upright();
                self.run(f, &upright, filter)
            }
        }
    }

    fn filter_for(&self, kind: FilterKind) -> Option<&dyn ImageFilter> {
        self.filters.get(kind.index()).and_then(|f| f.as_deref())
    }

    fn run(
        &self,
        filter: &dyn ImageFilter,
        frame: &Frame,
        kind: FilterKind,
    ) -> Result<ProcessedFrame, FilterError> {
        ensure_filterable(frame)?;
        let output = filter.apply(frame)?;
        check_output(frame, &output)?;
        Ok(ProcessedFrame::new(output, kind))
    }
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self::new(&FilterSettings::default())
    }
}

/// Rejects outputs whose extent collapsed or whose buffer does not match it.
fn check_output(input: &Frame, output: &Frame) -> Result<(), FilterError> {
    if output.is_empty() {
        return Err(FilterError::Failed(format!(
            "output extent collapsed to {}x{}",
            output.width(),
            output.height()
        )));
    }
    if (output.width(), output.height()) != (input.width(), input.height()) {
        return Err(FilterError::Failed(format!(
            "output extent {}x{} differs from input {}x{}",
            output.width(),
            output.height(),
            input.width(),
            input.height()
        )));
    }
    let expected =
        output.width() as usize * output.height() as usize * output.channels() as usize;
    if output.data().len() != expected {
        return Err(FilterError::Failed(format!(
            "output buffer holds {} bytes, expected {expected}",
            output.data().len()
        )));
    }
    Ok(())
}
