//! Load — config loading from file and environment variables.

use std::fs;
use std::path::Path;

use super::model::{ConfigError, HarvesterConfig};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/harvester/harvester.toml";

impl HarvesterConfig {
    /// Load configuration from file, then apply environment overrides.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("HARVESTER_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using defaults", config_path);
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: HarvesterConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Override settings from variables resolved by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let containers = &mut self.containers;

        if let Some(path) = lookup("HARVESTER_CONTAINERS_PATH") {
            containers.path = path;
        }
        if let Some(ids) = lookup("HARVESTER_CONTAINER_IDS") {
            containers.ids = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(stream) = lookup("HARVESTER_STREAM") {
            containers.stream = stream
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("HARVESTER_STREAM: {}", e)))?;
        }
        if let Some(max) = lookup("HARVESTER_MAX_LINE_BYTES") {
            containers.max_line_bytes = max.parse().map_err(|_| {
                ConfigError::Invalid(format!("HARVESTER_MAX_LINE_BYTES: {:?} is not a byte count", max))
            })?;
        }
        if let Some(concat) = lookup("HARVESTER_CONCAT_PARTIAL") {
            containers.concat_partial = concat.parse().map_err(|_| {
                ConfigError::Invalid(format!("HARVESTER_CONCAT_PARTIAL: {:?} is not a boolean", concat))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        self.containers.validate()
    }
}
