//! Application configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Scan backend settings
    pub backend: BackendConfig,

    /// TUI settings
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Event loop tick rate in milliseconds
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the scan backend
    pub base_url: String,

    /// Request timeout in seconds; scans run long, so this is generous
    pub request_timeout: u64,

    /// User agent string
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Color theme
    pub theme: String,

    /// Result body size limit for display (in bytes)
    pub max_display_size: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 100 }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: 300,
            user_agent: format!("Scandeck/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            max_display_size: 1024 * 1024, // 1MB
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            let config: Config = toml::from_str(&contents)
                .with_context(|| "Failed to parse configuration file")?;

            tracing::info!("Loaded configuration from {:?}", config_path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<&str>) -> Result<()> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;

        tracing::info!("Saved configuration to {:?}", config_path);
        Ok(())
    }

    /// Get default configuration file path
    fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("io", "scandeck", "scandeck")
            .context("Failed to determine config directory")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("io", "scandeck", "scandeck")
            .context("Failed to determine data directory")?;

        Ok(dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_backend() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert!(config.backend.request_timeout > 0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[backend]\nbase_url = \"http://scanner:9000\"\n").unwrap();
        assert_eq!(config.backend.base_url, "http://scanner:9000");
        assert_eq!(config.general.tick_rate_ms, GeneralConfig::default().tick_rate_ms);
        assert_eq!(config.tui.theme, "dark");
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let reparsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(reparsed.backend.base_url, config.backend.base_url);
        assert_eq!(reparsed.backend.request_timeout, config.backend.request_timeout);
    }
}
