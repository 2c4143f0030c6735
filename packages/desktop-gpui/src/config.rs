//! Application configuration
//!
//! Loads settings from a TOML file in the platform config directory.
//! Missing files and missing keys fall back to defaults so a fresh
//! install starts without any setup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the meal generation backend
    pub backend_url: String,
    /// Theme id, see the theme registry for valid values
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8080".to_string(),
            theme: "mahlzeit".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = default_path() else {
            tracing::warn!("no config directory available, using default config");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Self::default();
        }

        match Self::load_from_path(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Load the configuration from a specific file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Resolve the config file path. The MAHLZEIT_CONFIG_FILE environment
/// variable overrides the platform default.
fn default_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MAHLZEIT_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    directories::ProjectDirs::from("de", "mahlzeit", "mahlzeit")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend_url = \"http://10.0.0.5:9000\"").unwrap();

        let config = Config::load_from_path(file.path()).unwrap();

        assert_eq!(config.backend_url, "http://10.0.0.5:9000");
        assert_eq!(config.theme, "mahlzeit");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend_url = [not valid").unwrap();

        assert!(Config::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.backend_url, "http://127.0.0.1:8080");
        assert_eq!(config.theme, "mahlzeit");
    }
}
