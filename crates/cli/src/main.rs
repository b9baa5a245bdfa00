use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use filtercam_core::camera::infrastructure::still_image_camera::StillImageCamera;
use filtercam_core::filtering::domain::filter_kind::FilterKind;
use filtercam_core::filtering::domain::filter_selector::FilterSelector;
use filtercam_core::pipeline::camera_session::CameraSession;
use filtercam_core::pipeline::session_logger::LogSessionLogger;
use filtercam_core::settings::Settings;
use filtercam_core::shared::constants::{IMAGE_EXTENSIONS, MAX_BLUR_RADIUS};
use filtercam_core::shared::orientation::Orientation;
use filtercam_core::storage::domain::photo_sink::PhotoSink;
use filtercam_core::storage::infrastructure::image_file_sink::ImageFileSink;

/// Progress line interval, in preview frames.
const LOG_EVERY_FRAMES: usize = 30;

/// Apply camera filters to a still image as if it were a live camera.
#[derive(Parser, Debug)]
#[command(name = "filtercam")]
struct Cli {
    /// Input image acting as the camera.
    input: PathBuf,

    /// Where to write the captured, filtered photo.
    output: PathBuf,

    /// Filter selected when the session starts: none, blur, comic, crystallize.
    #[arg(long, default_value = "none")]
    filter: FilterKind,

    /// Advance the filter this many times before capturing.
    #[arg(long, default_value = "0")]
    advance: usize,

    /// EXIF orientation of the input (1-8), overriding its metadata.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=8))]
    orientation: Option<u16>,

    /// Gaussian blur radius in pixels.
    #[arg(long)]
    blur_radius: Option<f32>,

    /// Crystallize cell size in pixels.
    #[arg(long)]
    crystallize_radius: Option<u32>,

    /// Settings file (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save filtered preview frames to this directory.
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Number of preview frames to run before capturing.
    #[arg(long, default_value = "5")]
    preview_frames: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let settings = build_settings(&cli)?;
    log::info!("Settings: {settings:?}");

    let mut camera = StillImageCamera::new(&cli.input);
    if cli.preview_dir.is_some() {
        camera = camera.with_preview_frames(cli.preview_frames);
    }
    if let Some(orientation) = cli.orientation.and_then(Orientation::from_exif) {
        camera = camera.with_orientation(orientation);
    }

    let selector = Arc::new(FilterSelector::starting_at(cli.filter));
    let (mut session, preview) = CameraSession::start_with_selector(
        &mut camera,
        &settings,
        selector,
        LogSessionLogger::shared(LOG_EVERY_FRAMES),
    )?;
    for _ in 0..cli.advance {
        session.next_filter();
    }
    log::info!("Selected filter: {}", session.current_filter());

    if let Some(preview_dir) = &cli.preview_dir {
        let mut sink = ImageFileSink::to_directory(preview_dir, "preview");
        let mut saved = 0;
        for frame in preview.iter() {
            sink.store(&frame)?;
            saved += 1;
        }
        log::info!("Saved {saved} preview frames to {}", preview_dir.display());
    } else {
        drop(preview);
    }

    let photo = session.capture().wait_timeout(session.capture_timeout())?;
    let mut sink = ImageFileSink::to_file(&cli.output);
    let path = sink.store(&photo)?;
    session.stop();

    log::info!(
        "Captured {}x{} photo with {} filter to {}",
        photo.width(),
        photo.height(),
        photo.filter(),
        path.display()
    );
    Ok(())
}

fn build_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    if let Some(radius) = cli.blur_radius {
        settings.filters.blur_radius = radius;
    }
    if let Some(radius) = cli.crystallize_radius {
        settings.filters.crystallize_radius = radius;
    }
    // Every preview frame is saved, so none may be dropped for lack of room.
    if cli.preview_dir.is_some() {
        settings.preview_capacity = settings.preview_capacity.max(cli.preview_frames);
    }
    settings.validate()?;
    Ok(settings)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.input) {
        return Err(format!(
            "Input must be an image ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            cli.input.display()
        )
        .into());
    }
    if !is_image(&cli.output) {
        return Err(format!(
            "Output must have an image extension ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            cli.output.display()
        )
        .into());
    }
    if let Some(radius) = cli.blur_radius {
        if !(0.0..=MAX_BLUR_RADIUS).contains(&radius) {
            return Err(format!(
                "Blur radius must be between 0 and {MAX_BLUR_RADIUS}, got {radius}"
            )
            .into());
        }
    }
    if cli.crystallize_radius == Some(0) {
        return Err("Crystallize radius must be positive".into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
