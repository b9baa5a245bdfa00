//! Comic-book stylization: flat posterized colour fields with dark outlines
//! traced along strong luma gradients (Sobel).

use crate::filtering::domain::image_filter::{ensure_filterable, ImageFilter};
use crate::shared::constants::{DEFAULT_COMIC_EDGE_THRESHOLD, DEFAULT_COMIC_LEVELS};
use crate::shared::error::FilterError;
use crate::shared::frame::Frame;

/// Ink value written on outline pixels.
const INK: u8 = 0;

pub struct ComicFilter {
    levels: u8,
    edge_threshold: u16,
}

impl ComicFilter {
    /// `levels` is clamped to at least 2 colour levels per channel.
    pub fn new(levels: u8, edge_threshold: u16) -> Self {
        Self {
            levels: levels.max(2),
            edge_threshold,
        }
    }
}

impl Default for ComicFilter {
    fn default() -> Self {
        Self::new(DEFAULT_COMIC_LEVELS, DEFAULT_COMIC_EDGE_THRESHOLD)
    }
}

impl ImageFilter for ComicFilter {
    fn apply(&self, frame: &Frame) -> Result<Frame, FilterError> {
        ensure_filterable(frame)?;

        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let channels = frame.channels() as usize;
        let colour_channels = colour_channels(channels);

        let luma = luma_plane(frame.data(), channels);
        let mut data = frame.data().to_vec();

        for y in 0..height {
            for x in 0..width {
                let base = (y * width + x) * channels;
                let edge = gradient_magnitude(&luma, width, height, x, y) > self.edge_threshold;
                for c in 0..colour_channels {
                    data[base + c] = if edge {
                        INK
                    } else {
                        posterize(data[base + c], self.levels)
                    };
                }
            }
        }

        Ok(Frame::new(data, frame.width(), frame.height(), frame.channels(), frame.index())
            .with_orientation(frame.orientation()))
    }
}

/// Channels carrying colour; a trailing alpha channel is left alone.
fn colour_channels(channels: usize) -> usize {
    match channels {
        2 | 4 => channels - 1,
        n => n,
    }
}

/// Rec. 601 luma per pixel. Single-channel frames use the value directly.
fn luma_plane(data: &[u8], channels: usize) -> Vec<u8> {
    data.chunks_exact(channels)
        .map(|px| {
            if channels < 3 {
                px[0]
            } else {
                let l = 299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32;
                ((l + 500) / 1000) as u8
            }
        })
        .collect()
}

/// Sobel `|gx| + |gy|` at `(x, y)` with clamp-to-edge sampling.
fn gradient_magnitude(luma: &[u8], width: usize, height: usize, x: usize, y: usize) -> u16 {
    let at = |dx: isize, dy: isize| -> i32 {
        let sx = (x as isize + dx).clamp(0, width as isize - 1) as usize;
        let sy = (y as isize + dy).clamp(0, height as isize - 1) as usize;
        luma[sy * width + sx] as i32
    };

    let gx = (at(1, -1) + 2 * at(1, 0) + at(1, 1)) - (at(-1, -1) + 2 * at(-1, 0) + at(-1, 1));
    let gy = (at(-1, 1) + 2 * at(0, 1) + at(1, 1)) - (at(-1, -1) + 2 * at(0, -1) + at(1, -1));

    (gx.abs() + gy.abs()).min(u16::MAX as i32) as u16
}

/// Snap a channel value to the nearest of `levels` evenly spaced levels.
fn posterize(value: u8, levels: u8) -> u8 {
    let steps = (levels - 1) as u32;
    let level = (value as u32 * steps + 127) / 255;
    (level * 255 / steps) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 2, 0)]
    #[case(127, 2, 0)]
    #[case(128, 2, 255)]
    #[case(255, 2, 255)]
    #[case(0, 4, 0)]
    #[case(80, 4, 85)]
    #[case(130, 4, 170)]
    #[case(255, 4, 255)]
    fn test_posterize(#[case] value: u8, #[case] levels: u8, #[case] expected: u8) {
        assert_eq!(posterize(value, levels), expected);
    }

    #[test]
    fn test_flat_frame_is_only_posterized() {
        let frame = Frame::new(vec![80; 6 * 6 * 3], 6, 6, 3, 0);
        let out = ComicFilter::new(4, 40).apply(&frame).unwrap();
        assert!(out.data().iter().all(|&v| v == 85));
    }

    #[test]
    fn test_outlines_vertical_edge() {
        // Left half black, right half white.
        let (w, h) = (8usize, 4usize);
        let mut data = vec![0u8; w * h * 3];
        for y in 0..h {
            for x in w / 2..w {
                let i = (y * w + x) * 3;
                data[i..i + 3].fill(255);
            }
        }
        let frame = Frame::new(data, w as u32, h as u32, 3, 0);
        let out = ComicFilter::new(4, 96).apply(&frame).unwrap();

        let px = |x: usize, y: usize| out.data()[(y * w + x) * 3];
        assert_eq!(px(w / 2, 1), INK);
        assert_eq!(px(w / 2 - 1, 1), INK);
        assert_eq!(px(w - 1, 1), 255);
        assert_eq!(px(0, 1), 0);
    }

    #[test]
    fn test_alpha_untouched() {
        let mut data = vec![200u8; 3 * 3 * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 17;
        }
        let frame = Frame::new(data, 3, 3, 4, 0);
        let out = ComicFilter::default().apply(&frame).unwrap();
        assert!(out.data().chunks_exact(4).all(|px| px[3] == 17));
    }

    #[test]
    fn test_luma_weights() {
        let luma = luma_plane(&[255, 0, 0, 0, 255, 0, 0, 0, 255], 3);
        assert_eq!(luma, vec![76, 150, 29]);
    }

    #[test]
    fn test_empty_frame_fails() {
        let frame = Frame::new(Vec::new(), 5, 0, 3, 0);
        assert!(matches!(
            ComicFilter::default().apply(&frame),
            Err(FilterError::EmptyExtent { .. })
        ));
    }

    #[test]
    fn test_zero_channel_frame_fails() {
        let frame = Frame::new(Vec::new(), 4, 4, 0, 0);
        assert!(matches!(
            ComicFilter::default().apply(&frame),
            Err(FilterError::Failed(_))
        ));
    }

    #[test]
    fn test_deterministic() {
        let data: Vec<u8> = (0..10 * 10 * 3).map(|i| (i * 91 % 256) as u8).collect();
        let frame = Frame::new(data, 10, 10, 3, 0);
        let filter = ComicFilter::default();
        assert_eq!(filter.apply(&frame).unwrap(), filter.apply(&frame).unwrap());
    }
}
