use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::processed_frame::ProcessedFrame;
use crate::storage::domain::photo_sink::{PhotoSink, SinkError};

/// Writes photos to image files using the `image` crate.
///
/// The format follows the file extension. Frames that are not upright are
/// rotated before encoding, since plain image files carry no orientation tag.
pub struct ImageFileSink {
    target: Target,
    written: usize,
}

enum Target {
    File(PathBuf),
    Directory { dir: PathBuf, prefix: String },
}

impl ImageFileSink {
    /// Every photo overwrites `path`.
    pub fn to_file(path: &Path) -> Self {
        Self {
            target: Target::File(path.to_path_buf()),
            written: 0,
        }
    }

    /// Photos are numbered `<prefix>_0000.png`, `<prefix>_0001.png`, ...
    pub fn to_directory(dir: &Path, prefix: &str) -> Self {
        Self {
            target: Target::Directory {
                dir: dir.to_path_buf(),
                prefix: prefix.to_string(),
            },
            written: 0,
        }
    }

    fn next_path(&self) -> PathBuf {
        match &self.target {
            Target::File(path) => path.clone(),
            Target::Directory { dir, prefix } => {
                dir.join(format!("{prefix}_{:04}.png", self.written))
            }
        }
    }
}

impl PhotoSink for ImageFileSink {
    fn store(&mut self, photo: &ProcessedFrame) -> Result<PathBuf, SinkError> {
        let path = self.next_path();
        write_frame(&path, photo.frame())?;
        self.written += 1;
        log::debug!("Stored {} photo at {}", photo.filter(), path.display());
        Ok(path)
    }
}

/// Encodes a frame to `path`, creating parent directories as needed.
pub fn write_frame(path: &Path, frame: &Frame) -> Result<(), SinkError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SinkError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let upright;
    let frame = if frame.orientation().is_upright() {
        frame
    } else {
        upright = frame.to_upright();
        &upright
    };

    let (w, h) = (frame.width(), frame.height());
    let data = frame.data().to_vec();
    let unsupported = || SinkError::UnsupportedChannels {
        channels: frame.channels(),
    };
    let image = match frame.channels() {
        3 => image::RgbImage::from_raw(w, h, data)
            .map(image::DynamicImage::ImageRgb8)
            .ok_or_else(unsupported)?,
        4 => image::RgbaImage::from_raw(w, h, data)
            .map(image::DynamicImage::ImageRgba8)
            .ok_or_else(unsupported)?,
        _ => return Err(unsupported()),
    };

    image.save(path).map_err(|source| SinkError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::domain::filter_kind::FilterKind;
    use crate::shared::orientation::Orientation;

    fn make_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb.repeat((width * height) as usize);
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_store_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");
        let mut sink = ImageFileSink::to_file(&path);

        let stored = sink
            .store(&ProcessedFrame::new(make_frame(10, 8, [1, 2, 3]), FilterKind::None))
            .unwrap();

        assert_eq!(stored, path);
        assert!(path.exists());
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_frame(&path, &make_frame(5, 5, [50, 100, 200])).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (5, 5));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_rotated_frame_written_upright() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotated.png");
        let frame = make_frame(6, 2, [9, 9, 9]).with_orientation(Orientation::Right);
        write_frame(&path, &frame).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (2, 6));
    }

    #[test]
    fn test_directory_sink_numbers_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ImageFileSink::to_directory(dir.path(), "preview");
        let photo = ProcessedFrame::new(make_frame(2, 2, [0, 0, 0]), FilterKind::Blur);

        let first = sink.store(&photo).unwrap();
        let second = sink.store(&photo).unwrap();

        assert_eq!(first, dir.path().join("preview_0000.png"));
        assert_eq!(second, dir.path().join("preview_0001.png"));
    }

    #[test]
    fn test_single_channel_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let frame = Frame::new(vec![0; 4], 2, 2, 1, 0);
        assert!(matches!(
            write_frame(&dir.path().join("gray.png"), &frame),
            Err(SinkError::UnsupportedChannels { channels: 1 })
        ));
    }

    #[test]
    fn test_invalid_path_returns_error() {
        let frame = make_frame(2, 2, [0, 0, 0]);
        assert!(write_frame(Path::new("/proc/nonexistent/dir/out.png"), &frame).is_err());
    }
}
