//! Model — HarvesterConfig and related structs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::MAX_LINE_SIZE;
use crate::stream::StreamFilter;

pub const DEFAULT_CONTAINERS_PATH: &str = "/var/lib/docker/containers";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvesterConfig {
    pub containers: ContainersConfig,
}

/// The `[containers]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainersConfig {
    /// Container IDs whose logs are read
    pub ids: Vec<String>,
    /// Root holding one directory per container
    pub path: String,
    /// Stream can be all, stdout or stderr
    pub stream: StreamFilter,
    /// Join lines Docker split because they exceeded 16k
    pub concat_partial: bool,
    /// Longest physical line, and longest joined partial run, kept in one message
    pub max_line_bytes: usize,
}

impl Default for ContainersConfig {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            path: DEFAULT_CONTAINERS_PATH.to_string(),
            stream: StreamFilter::All,
            concat_partial: false,
            max_line_bytes: MAX_LINE_SIZE,
        }
    }
}

impl ContainersConfig {
    /// `<path>/<id>/<id>-json.log`, where the json-file driver writes.
    pub fn log_path(&self, id: &str) -> PathBuf {
        PathBuf::from(&self.path)
            .join(id)
            .join(format!("{}-json.log", id))
    }

    pub fn log_paths(&self) -> Vec<PathBuf> {
        self.ids.iter().map(|id| self.log_path(id)).collect()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("containers.path must not be empty".to_string());
        }
        if self.max_line_bytes == 0 {
            return Err("containers.max_line_bytes must be > 0".to_string());
        }
        for id in &self.ids {
            if id.is_empty() {
                return Err("containers.ids must not contain empty IDs".to_string());
            }
            if id.contains(|c: char| c == '/' || c == '\\') || id == "." || id == ".." {
                return Err(format!("containers.ids entry {:?} is not a container ID", id));
            }
        }
        Ok(())
    }
}
