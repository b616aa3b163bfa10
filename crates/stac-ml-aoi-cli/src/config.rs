//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - The `--config` flag or `ML_AOI_CONFIG`

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use stac_ml_aoi::{LoaderConfig, ValidationConfig};
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = ".ml-aoi.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Defaults of the validate command
    pub validation: ValidationConfig,

    /// Document loading settings
    pub loader: LoaderConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}

/// Configuration file formats, detected from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config: Config = match FileFormat::from_path(path) {
            FileFormat::Toml => toml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid TOML in {}: {}", path.display(), e)))?,
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// User configuration file (`<config dir>/ml-aoi/config.toml`)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ml-aoi").join("config.toml"))
    }

    /// Get default configuration file paths to check, most specific first
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(PROJECT_CONFIG_FILE),
            PathBuf::from(".ml-aoi.yaml"),
            PathBuf::from(".ml-aoi.json"),
        ];

        if let Some(user_path) = Self::user_config_path() {
            paths.push(user_path);
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(PROJECT_CONFIG_FILE));
        }

        paths
    }

    /// Serialize in the format implied by the file extension
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        Ok(match FileFormat::from_path(path) {
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stac_ml_aoi::ValidationMode;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.validation.mode, ValidationMode::Strict);
        assert!(config.loader.migrate_extensions);
        assert!(config.output.progress);
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_partial_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[validation]\nmode = \"partial\"\nmax_errors = 10\n\n[loader]\nmigrate_extensions = false\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.validation.mode, ValidationMode::Partial);
        assert_eq!(config.validation.max_errors, 10);
        assert!(!config.validation.fail_fast);
        assert!(!config.loader.migrate_extensions);
        assert!(config.output.color);
    }

    #[test]
    fn test_save_and_reload_in_each_format() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.validation.fail_fast = true;
        config.logging.level = Some("debug".to_string());

        for name in ["nested/config.toml", "config.yaml", "config.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), config, "{}", name);
        }
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::from_file(&missing), Err(Error::FileNotFound { .. })));

        let invalid = dir.path().join("invalid.toml");
        std::fs::write(&invalid, "validation = [").unwrap();
        assert!(matches!(Config::from_file(&invalid), Err(Error::Config(_))));
    }
}
