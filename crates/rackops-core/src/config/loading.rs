//! Config file loading.
//!
//! Reads the user config from `~/.rackops/config.toml` (or `$RACKOPS_DIR`).
//! A missing file yields the default configuration; a present but malformed
//! file is an error so a typo never silently disables refresh or GC.

use std::path::Path;

use tracing::{debug, info};

use crate::config::types::{Config, RackopsConfig};
use crate::errors::ConfigError;

pub fn load_config() -> Result<RackopsConfig, ConfigError> {
    let config = Config::new();
    load_config_from(&config.config_file())
}

pub fn load_config_from(path: &Path) -> Result<RackopsConfig, ConfigError> {
    if !path.exists() {
        debug!(
            event = "core.config.file_missing",
            path = %path.display(),
            message = "No config file found, using defaults"
        );
        return Ok(RackopsConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError { source: e })?;

    let parsed: RackopsConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: e.to_string(),
        })?;

    info!(
        event = "core.config.loaded",
        path = %path.display(),
        refresh_interval_secs = parsed.refresh.interval_secs,
        gc_interval_secs = parsed.jobs.gc_interval_secs
    );

    Ok(parsed)
}
