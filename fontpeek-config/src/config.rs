//! Core `Config` struct, defaults and file loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{self, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::error::ConfigError;
use crate::types::LogLevel;

/// fontpeek configuration.
///
/// Every field has a serde default so a partial (or empty) YAML file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    // ========================================================================
    // Preview
    // ========================================================================
    /// Text rendered in every font; an empty value falls back to the default sample
    #[serde(default = "crate::defaults::sample_text")]
    pub sample_text: String,

    /// Preview size in points (clamped to 6..=96)
    #[serde(default = "crate::defaults::font_size")]
    pub font_size: u32,

    /// Number of fonts streamed before the preview worker pauses
    #[serde(default = "crate::defaults::chunk_size")]
    pub chunk_size: usize,

    /// Pause between chunks in milliseconds
    #[serde(default = "crate::defaults::chunk_pause_ms")]
    pub chunk_pause_ms: u64,

    /// Height of the blank spacer after each preview block, in points
    #[serde(default = "crate::defaults::spacer_height")]
    pub spacer_height: f32,

    /// Size of the bold family-name label, in points
    #[serde(default = "crate::defaults::name_label_size")]
    pub name_label_size: f32,

    /// Render previews through the HarfBuzz shaper (false = plain labels only)
    #[serde(default = "crate::defaults::bool_true")]
    pub text_shaping: bool,

    /// Number of rendered previews kept in memory
    #[serde(default = "crate::defaults::render_cache_size")]
    pub render_cache_size: usize,

    /// After loading a folder, show only that folder's families instead of
    /// re-reading the whole registry
    #[serde(default = "crate::defaults::bool_false")]
    pub replace_list_on_folder_load: bool,

    // ========================================================================
    // Window
    // ========================================================================
    #[serde(default = "crate::defaults::window_title")]
    pub window_title: String,

    /// Minimum (and initial) window width in points
    #[serde(default = "crate::defaults::window_width")]
    pub window_width: f32,

    /// Minimum (and initial) window height in points
    #[serde(default = "crate::defaults::window_height")]
    pub window_height: f32,

    /// Directory holding optional button icons (`folder.png`, `refresh.png`, ...)
    #[serde(default)]
    pub icons_dir: Option<PathBuf>,

    // ========================================================================
    // Logging
    // ========================================================================
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file location (default: `<temp dir>/fontpeek.log`)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_text: defaults::sample_text(),
            font_size: defaults::font_size(),
            chunk_size: defaults::chunk_size(),
            chunk_pause_ms: defaults::chunk_pause_ms(),
            spacer_height: defaults::spacer_height(),
            name_label_size: defaults::name_label_size(),
            text_shaping: defaults::bool_true(),
            render_cache_size: defaults::render_cache_size(),
            replace_list_on_folder_load: defaults::bool_false(),
            window_title: defaults::window_title(),
            window_width: defaults::window_width(),
            window_height: defaults::window_height(),
            icons_dir: None,
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sample text
    pub fn with_sample_text(mut self, text: impl Into<String>) -> Self {
        self.sample_text = text.into();
        self
    }

    /// Set the preview size, clamped into the supported range
    pub fn with_font_size(mut self, size: u32) -> Self {
        self.font_size = clamp_font_size(size);
        self
    }

    /// Clamp every bounded field into its valid range.
    pub fn sanitize(&mut self) {
        let size = clamp_font_size(self.font_size);
        if size != self.font_size {
            log::warn!(
                "font_size {} outside {}..={}, using {}",
                self.font_size,
                MIN_FONT_SIZE,
                MAX_FONT_SIZE,
                size
            );
            self.font_size = size;
        }
        if self.chunk_size == 0 {
            log::warn!("chunk_size must be at least 1, using 1");
            self.chunk_size = 1;
        }
        if !self.spacer_height.is_finite() || self.spacer_height < 0.0 {
            self.spacer_height = defaults::spacer_height();
        }
        if !self.name_label_size.is_finite() || self.name_label_size <= 0.0 {
            self.name_label_size = defaults::name_label_size();
        }
        self.render_cache_size = self.render_cache_size.max(1);
    }

    /// Sample text to render; the default sample when the configured one is empty.
    pub fn effective_sample_text(&self) -> String {
        if self.sample_text.is_empty() {
            defaults::sample_text()
        } else {
            self.sample_text.clone()
        }
    }

    /// Pause between preview chunks.
    pub fn chunk_pause(&self) -> Duration {
        Duration::from_millis(self.chunk_pause_ms)
    }

    /// Load configuration from the default path, or defaults if there is no file.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file; a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and sanitize configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map
        let mut config: Config = if contents.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml_ng::from_str(contents)?
        };
        config.sanitize();
        Ok(config)
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .map(|dir| dir.join("fontpeek"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .map(|home| home.join(".config").join("fontpeek"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Log file location: the configured one or `<temp dir>/fontpeek.log`.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(defaults::log_file_name()))
    }

    /// Icon directory: the configured one or `<config dir>/icons`.
    pub fn icons_path(&self) -> PathBuf {
        self.icons_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("icons"))
    }
}

/// Clamp a preview size into `MIN_FONT_SIZE..=MAX_FONT_SIZE`.
pub fn clamp_font_size(size: u32) -> u32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_font_size() {
        assert_eq!(clamp_font_size(0), 6);
        assert_eq!(clamp_font_size(24), 24);
        assert_eq!(clamp_font_size(500), 96);
    }

    #[test]
    fn test_empty_sample_falls_back() {
        let config = Config::new().with_sample_text("");
        assert_eq!(config.effective_sample_text(), "Hello مرحبا");
    }

    #[test]
    fn test_sanitize_repairs_bad_values() {
        let mut config = Config {
            font_size: 2,
            chunk_size: 0,
            spacer_height: -1.0,
            name_label_size: f32::NAN,
            render_cache_size: 0,
            ..Config::default()
        };
        config.sanitize();
        assert_eq!(config.font_size, 6);
        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.spacer_height, 20.0);
        assert_eq!(config.name_label_size, 12.0);
        assert_eq!(config.render_cache_size, 1);
    }
}
