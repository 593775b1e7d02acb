//! Conf — configuration model and loading.

pub mod model;
pub mod load;

pub use model::{ConfigError, ContainersConfig, HarvesterConfig, DEFAULT_CONTAINERS_PATH};
pub use load::DEFAULT_CONFIG_PATH;
