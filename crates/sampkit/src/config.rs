use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::host::SimulationOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("config file not found")]
    NotFound,
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("IO error accessing config: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Also write logs to a file
    pub file: bool,
    /// Overrides the platform data directory for log files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
            directory: None,
        }
    }
}

/// Settings for the in-memory host used by `sampkit replay`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub max_players: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_eta_override_ms: Option<i32>,
    pub default_ping_ms: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let options = SimulationOptions::default();
        Self {
            max_players: options.max_players,
            move_eta_override_ms: options.move_eta_override_ms,
            default_ping_ms: options.default_ping_ms,
        }
    }
}

impl From<&SimulationConfig> for SimulationOptions {
    fn from(config: &SimulationConfig) -> Self {
        SimulationOptions {
            max_players: config.max_players,
            move_eta_override_ms: config.move_eta_override_ms,
            default_ping_ms: config.default_ping_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampkitConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl SampkitConfig {
    /// `config.toml` in the platform config directory, if there is one
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sampkit").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self, ConfigLoadError> {
        let path = Self::config_path().ok_or(ConfigLoadError::NotFound)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        if !path.exists() {
            return Err(ConfigLoadError::NotFound);
        }

        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        info!(target: "sampkit", "Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigLoadError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!(target: "sampkit", "Saved config to {}", path.display());
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigLoadError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = SampkitConfig::load_from(&dir.path().join("config.toml"));
        assert!(matches!(result, Err(ConfigLoadError::NotFound)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = SampkitConfig::default();
        config.logging.level = "sampkit=debug".to_string();
        config.simulation.move_eta_override_ms = Some(250);
        config.save_to(&path).unwrap();

        assert_eq!(SampkitConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[simulation]\nmax_players = 4\n").unwrap();

        let config = SampkitConfig::load_from(&path).unwrap();
        assert_eq!(config.simulation.max_players, 4);
        assert_eq!(config.simulation.default_ping_ms, 30);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[simulation\n").unwrap();
        assert!(matches!(
            SampkitConfig::load_from(&path),
            Err(ConfigLoadError::Parse(_))
        ));
    }
}
