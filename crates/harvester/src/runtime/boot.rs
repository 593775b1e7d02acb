//! Boot — logging init and config load.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::{ConfigError, HarvesterConfig};

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr: stdout carries the decoded messages.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "harvester=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate the configuration.
pub fn boot() -> Result<HarvesterConfig, ConfigError> {
    info!("Starting harvester v{}", env!("CARGO_PKG_VERSION"));

    let config = HarvesterConfig::load()?;
    let containers = &config.containers;
    info!(
        "Containers: path={}, ids={}, stream={}, concat_partial={}",
        containers.path,
        containers.ids.len(),
        containers.stream,
        containers.concat_partial
    );

    Ok(config)
}
