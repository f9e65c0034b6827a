use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

const MIN_FPS: f64 = 0.001;
const MAX_FPS: f64 = 1000.0;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/mvu-canvas/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("mvu-canvas").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns `Config::default()`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    /// Loads, parses and validates the file at `path`, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Canvas dimensions are non-zero
    /// - The frame rate lies within `0.001..=1000` frames per second
    /// - The surface id is not empty
    /// - At least one mount retry is allowed
    pub fn validate(&self) -> Result<(), ConfigError> {
        let canvas = &self.canvas;

        if canvas.width == 0 || canvas.height == 0 {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Canvas size must be non-zero, got {}x{}",
                    canvas.width, canvas.height
                ),
            });
        }

        if !(MIN_FPS..=MAX_FPS).contains(&canvas.fps) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Frame rate must be between {} and {}, got {}",
                    MIN_FPS, MAX_FPS, canvas.fps
                ),
            });
        }

        if canvas.surface_id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Surface id must not be empty".to_string(),
            });
        }

        if canvas.max_mount_retries == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_mount_retries must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_fps_is_rejected() {
        let mut config = Config::default();
        config.canvas.fps = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn fps_bounds_are_inclusive() {
        let mut config = Config::default();
        config.canvas.fps = MIN_FPS;
        assert!(config.validate().is_ok());
        config.canvas.fps = MAX_FPS;
        assert!(config.validate().is_ok());
        config.canvas.fps = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_path_ends_with_app_dir() {
        let path = Config::config_path();
        assert!(path.ends_with("mvu-canvas/config.toml"));
    }
}
