/// User configuration for the carousel
///
/// Stored as JSON and every field is optional. The file lives in the
/// user's config directory:
/// - Linux: ~/.config/photo-carousel/config.json
/// - macOS: ~/Library/Application Support/photo-carousel/config.json
/// - Windows: %APPDATA%\photo-carousel\config.json
///
/// `PHOTO_CAROUSEL_CONFIG` overrides the location.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CarouselError, Result};
use crate::state::transition::TransitionKind;

/// Environment variable pointing at an alternate config file
pub const CONFIG_ENV: &str = "PHOTO_CAROUSEL_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CarouselConfig {
    // ========== Sources ==========

    /// Manifest listing the points, relative to the working directory
    pub manifest: PathBuf,
    /// Directory the manifest's image names are resolved against
    pub images_dir: PathBuf,
    /// Extensions tried, in order, when probing an image name
    pub extensions: Vec<String>,

    // ========== Timing ==========

    /// How often the next strip rotates
    pub next_strip_interval_ms: u64,
    /// How long the stage stays hidden before new content is swapped in
    pub hide_delay_ms: u64,
    /// Delay after the swap before navigation is accepted again
    pub settle_delay_ms: u64,
    /// Length of the entrance animation
    pub enter_duration_ms: u64,
    /// Quiet period after the last resize event before re-rendering
    pub resize_debounce_ms: u64,
    /// Period of the idle pulse on the focal image
    pub pulse_period_ms: u64,

    // ========== Look & feel ==========

    pub transition: TransitionKind,
    /// Minimum horizontal travel (px) for a swipe
    pub swipe_threshold: f32,
    /// Fraction of the window width the stage may use
    pub max_width_fraction: f32,
    /// Fraction of the window height the stage may use
    pub max_height_fraction: f32,
    /// Upper bound for wheel zoom
    pub max_scale: f32,
    /// Peak extra scale of the idle pulse (0.02 = 2%)
    pub pulse_amplitude: f32,

    // ========== Rating spinner ==========

    /// Extra full turns of the digit column before landing
    pub animation_rounds: u32,
    /// Height of one digit cell (px)
    pub digit_height: f32,
    /// Spin duration before extra rounds are added
    pub spin_base_secs: f32,

    // ========== Sound ==========

    /// Sound played on every navigation, if any
    pub sound_effect: Option<PathBuf>,
    pub volume: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("images.json"),
            images_dir: PathBuf::from("images"),
            extensions: default_extensions(),
            next_strip_interval_ms: 3000,
            hide_delay_ms: 200,
            settle_delay_ms: 50,
            enter_duration_ms: 400,
            resize_debounce_ms: 100,
            pulse_period_ms: 1150,
            transition: TransitionKind::Slide,
            swipe_threshold: 30.0,
            max_width_fraction: 0.8,
            max_height_fraction: 0.65,
            max_scale: 5.0,
            pulse_amplitude: 0.02,
            animation_rounds: 0,
            digit_height: 70.0,
            spin_base_secs: 2.0,
            sound_effect: None,
            volume: 1.0,
        }
    }
}

fn default_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "webp"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl CarouselConfig {
    /// Where the config file is expected
    pub fn path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("photo-carousel");
        path.push("config.json");
        Some(path)
    }

    /// Load the user config, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("⚠️  Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from an explicit file. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path).map_err(|source| CarouselError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&json).map_err(|source| CarouselError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("⚙️  Loaded config from {}", path.display());
        Ok(config.validate())
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replace values that would break the carousel with their defaults
    pub fn validate(mut self) -> Self {
        let defaults = Self::default();

        if self.next_strip_interval_ms == 0 {
            tracing::warn!("⚠️  next_strip_interval_ms must be positive, using default");
            self.next_strip_interval_ms = defaults.next_strip_interval_ms;
        }
        if self.pulse_period_ms == 0 {
            tracing::warn!("⚠️  pulse_period_ms must be positive, using default");
            self.pulse_period_ms = defaults.pulse_period_ms;
        }
        if self.extensions.is_empty() {
            tracing::warn!("⚠️  extension list is empty, using default");
            self.extensions = defaults.extensions;
        }
        if !(self.max_width_fraction > 0.0 && self.max_width_fraction <= 1.0) {
            tracing::warn!(value = self.max_width_fraction, "⚠️  max_width_fraction out of range");
            self.max_width_fraction = defaults.max_width_fraction;
        }
        if !(self.max_height_fraction > 0.0 && self.max_height_fraction <= 1.0) {
            tracing::warn!(value = self.max_height_fraction, "⚠️  max_height_fraction out of range");
            self.max_height_fraction = defaults.max_height_fraction;
        }
        if !(self.max_scale >= 1.0) {
            tracing::warn!(value = self.max_scale, "⚠️  max_scale below 1, using default");
            self.max_scale = defaults.max_scale;
        }
        if !(self.digit_height > 0.0) {
            tracing::warn!(value = self.digit_height, "⚠️  digit_height must be positive");
            self.digit_height = defaults.digit_height;
        }
        self.volume = self.volume.clamp(0.0, 1.0);
        self.swipe_threshold = self.swipe_threshold.max(0.0);
        self.spin_base_secs = self.spin_base_secs.max(0.0);

        self
    }

    /// Same settings, pointed at another manifest.
    /// Images are looked up in an `images` folder beside it.
    pub fn with_manifest(&self, manifest: PathBuf) -> Self {
        let images_dir = manifest
            .parent()
            .map(|dir| dir.join("images"))
            .unwrap_or_else(|| PathBuf::from("images"));

        Self {
            manifest,
            images_dir,
            ..self.clone()
        }
    }

    pub fn next_strip_interval(&self) -> Duration {
        Duration::from_millis(self.next_strip_interval_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn enter_duration(&self) -> Duration {
        Duration::from_millis(self.enter_duration_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn pulse_period(&self) -> Duration {
        Duration::from_millis(self.pulse_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = CarouselConfig::from_json("{}").unwrap();
        assert_eq!(config, CarouselConfig::default());
        assert_eq!(config.next_strip_interval(), Duration::from_secs(3));
        assert_eq!(config.transition, TransitionKind::Slide);
    }

    #[test]
    fn test_partial_override() {
        let config =
            CarouselConfig::from_json(r#"{ "transition": "flip", "animation_rounds": 2 }"#).unwrap();
        assert_eq!(config.transition, TransitionKind::Flip);
        assert_eq!(config.animation_rounds, 2);
        assert_eq!(config.digit_height, 70.0);
    }

    #[test]
    fn test_validate_repairs_bad_values() {
        let config = CarouselConfig {
            next_strip_interval_ms: 0,
            extensions: Vec::new(),
            max_width_fraction: 1.5,
            max_scale: 0.5,
            volume: 3.0,
            ..CarouselConfig::default()
        }
        .validate();

        let defaults = CarouselConfig::default();
        assert_eq!(config.next_strip_interval_ms, defaults.next_strip_interval_ms);
        assert_eq!(config.extensions, defaults.extensions);
        assert_eq!(config.max_width_fraction, defaults.max_width_fraction);
        assert_eq!(config.max_scale, defaults.max_scale);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = CarouselConfig::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, CarouselConfig::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = CarouselConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, CarouselError::ConfigParse { .. }));
    }

    #[test]
    fn test_with_manifest_moves_images_dir() {
        let config = CarouselConfig::default()
            .with_manifest(PathBuf::from("/photos/trip/images.json"));
        assert_eq!(config.images_dir, PathBuf::from("/photos/trip/images"));
        assert_eq!(config.manifest, PathBuf::from("/photos/trip/images.json"));
    }
}
