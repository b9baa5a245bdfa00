use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_BLUR_RADIUS, DEFAULT_CAPTURE_TIMEOUT_MS, DEFAULT_COMIC_EDGE_THRESHOLD,
    DEFAULT_COMIC_LEVELS, DEFAULT_CRYSTALLIZE_RADIUS, DEFAULT_PREVIEW_CAPACITY,
    MAX_BLUR_RADIUS,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Tunable parameters of the individual filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Gaussian sigma in pixels.
    pub blur_radius: f32,
    pub comic_levels: u8,
    pub comic_edge_threshold: u16,
    /// Crystallize cell size in pixels.
    pub crystallize_radius: u32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            comic_levels: DEFAULT_COMIC_LEVELS,
            comic_edge_threshold: DEFAULT_COMIC_EDGE_THRESHOLD,
            crystallize_radius: DEFAULT_CRYSTALLIZE_RADIUS,
        }
    }
}

/// Session configuration, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub filters: FilterSettings,
    pub preview_capacity: usize,
    pub capture_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            filters: FilterSettings::default(),
            preview_capacity: DEFAULT_PREVIEW_CAPACITY,
            capture_timeout_ms: DEFAULT_CAPTURE_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Default location: `<config dir>/filtercam/settings.json`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("filtercam").join("settings.json"))
    }

    /// Loads settings from the default location, falling back to defaults
    /// when the file is missing or unreadable.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring settings file: {e}");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let f = &self.filters;
        if !(0.0..=MAX_BLUR_RADIUS).contains(&f.blur_radius) {
            return Err(SettingsError::Invalid(format!(
                "blur_radius must be between 0 and {MAX_BLUR_RADIUS}, got {}",
                f.blur_radius
            )));
        }
        if f.comic_levels < 2 {
            return Err(SettingsError::Invalid(format!(
                "comic_levels must be at least 2, got {}",
                f.comic_levels
            )));
        }
        if f.crystallize_radius == 0 {
            return Err(SettingsError::Invalid(
                "crystallize_radius must be positive".into(),
            ));
        }
        if self.preview_capacity == 0 {
            return Err(SettingsError::Invalid(
                "preview_capacity must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "filters": { "blur_radius": 4.5 } }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_relative_eq!(settings.filters.blur_radius, 4.5);
        assert_eq!(settings.filters.crystallize_radius, DEFAULT_CRYSTALLIZE_RADIUS);
        assert_eq!(settings.preview_capacity, DEFAULT_PREVIEW_CAPACITY);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = Settings::default();
        settings.filters.comic_levels = 6;
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Settings::load_from(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f32::NAN)]
    #[case(MAX_BLUR_RADIUS + 1.0)]
    #[case(1e9)]
    fn test_validate_rejects_out_of_range_blur_radius(#[case] radius: f32) {
        let mut settings = Settings::default();
        settings.filters.blur_radius = radius;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_oversized_blur_radius_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "filters": { "blur_radius": 1e9 } }"#).unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_crystallize_radius() {
        let mut settings = Settings::default();
        settings.filters.crystallize_radius = 0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_rejects_single_comic_level() {
        let mut settings = Settings::default();
        settings.filters.comic_levels = 1;
        assert!(settings.validate().is_err());
    }
}
