use crate::shared::error::FilterError;
use crate::shared::frame::Frame;

/// Domain interface for a deterministic whole-frame pixel transform.
///
/// Implementations never modify their input and always return a freshly
/// allocated frame with the same orientation tag. They hold no per-call
/// state, so one instance can serve the preview and capture threads at once.
pub trait ImageFilter: Send + Sync {
    fn apply(&self, frame: &Frame) -> Result<Frame, FilterError>;
}

/// Rejects frames a spatial filter cannot operate on: zero area, no
/// channels, or a buffer whose length does not match the extent.
pub fn ensure_filterable(frame: &Frame) -> Result<(), FilterError> {
    if frame.is_empty() {
        return Err(FilterError::EmptyExtent {
            width: frame.width(),
            height: frame.height(),
        });
    }
    if frame.channels() == 0 {
        return Err(FilterError::Failed("frame has no channels".into()));
    }
    let expected =
        frame.width() as usize * frame.height() as usize * frame.channels() as usize;
    if frame.data().len() != expected {
        return Err(FilterError::Failed(format!(
            "frame buffer holds {} bytes, expected {expected}",
            frame.data().len()
        )));
    }
    Ok(())
}

/// Copies the alpha channel of `input` over `output`, leaving colour untouched.
///
/// No-op for frames without a fourth channel.
pub fn restore_alpha(output: &mut [u8], input: &Frame) {
    if input.channels() != 4 {
        return;
    }
    for (dst, src) in output
        .chunks_exact_mut(4)
        .zip(input.data().chunks_exact(4))
    {
        dst[3] = src[3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_filterable_rejects_zero_area() {
        let frame = Frame::new(Vec::new(), 0, 3, 3, 0);
        assert_eq!(
            ensure_filterable(&frame),
            Err(FilterError::EmptyExtent {
                width: 0,
                height: 3
            })
        );
    }

    #[test]
    fn test_ensure_filterable_rejects_zero_channels() {
        let frame = Frame::new(Vec::new(), 4, 4, 0, 0);
        assert!(matches!(
            ensure_filterable(&frame),
            Err(FilterError::Failed(_))
        ));
    }

    #[test]
    fn test_ensure_filterable_accepts_consistent_frame() {
        assert_eq!(ensure_filterable(&Frame::new(vec![0; 8], 2, 1, 4, 0)), Ok(()));
    }

    #[test]
    fn test_restore_alpha_only_touches_fourth_channel() {
        let input = Frame::new(vec![1, 2, 3, 40, 5, 6, 7, 80], 2, 1, 4, 0);
        let mut output = vec![9, 9, 9, 9, 9, 9, 9, 9];
        restore_alpha(&mut output, &input);
        assert_eq!(output, vec![9, 9, 9, 40, 9, 9, 9, 80]);
    }

    #[test]
    fn test_restore_alpha_ignores_rgb() {
        let input = Frame::new(vec![1, 2, 3], 1, 1, 3, 0);
        let mut output = vec![9, 9, 9];
        restore_alpha(&mut output, &input);
        assert_eq!(output, vec![9, 9, 9]);
    }
}
