pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Gaussian blur radius (sigma, in pixels) used when none is configured.
pub const DEFAULT_BLUR_RADIUS: f32 = 10.0;

/// Largest accepted blur radius. The full kernel spans `6 * radius` taps and
/// is built when the session starts.
pub const MAX_BLUR_RADIUS: f32 = 500.0;

/// Crystallize cell size in pixels.
pub const DEFAULT_CRYSTALLIZE_RADIUS: u32 = 20;

/// Colour levels per channel kept by the comic effect.
pub const DEFAULT_COMIC_LEVELS: u8 = 4;

/// Luma gradient magnitude above which the comic effect draws an outline.
pub const DEFAULT_COMIC_EDGE_THRESHOLD: u16 = 96;

/// Preview frames buffered towards the display before new ones are dropped.
pub const DEFAULT_PREVIEW_CAPACITY: usize = 4;

/// How long a capture waits for the device before giving up.
pub const DEFAULT_CAPTURE_TIMEOUT_MS: u64 = 10_000;
