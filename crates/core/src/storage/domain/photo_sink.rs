use std::path::PathBuf;

use thiserror::Error;

use crate::shared::processed_frame::ProcessedFrame;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot store a {channels}-channel frame")]
    UnsupportedChannels { channels: u8 },
}

/// Final destination of successfully captured photos.
///
/// The session never calls this itself; the embedding application decides
/// whether and where a capture is kept.
pub trait PhotoSink: Send {
    /// Stores the photo and returns where it ended up.
    fn store(&mut self, photo: &ProcessedFrame) -> Result<PathBuf, SinkError>;
}
