//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculate::{IndexWeights, WeightsError};
use crate::models::TeamId;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid weights: {0}")]
    WeightsError(#[from] WeightsError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Index coefficients
    #[serde(default)]
    pub weights: IndexWeights,

    /// Team name to team id
    #[serde(default)]
    pub teams: BTreeMap<String, String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            weights: IndexWeights::default(),
            teams: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Unknown log level: {}",
                self.log_level
            )));
        }

        if let Some((name, _)) = self.teams.iter().find(|(_, id)| id.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "Team '{}' has an empty id",
                name
            )));
        }

        Ok(())
    }

    /// Map a team name to its configured id. Unconfigured values are taken
    /// as ids already.
    pub fn resolve_team(&self, name: &str) -> TeamId {
        match self.teams.get(name) {
            Some(id) => TeamId::from(id.as_str()),
            None => TeamId::from(name),
        }
    }
}
