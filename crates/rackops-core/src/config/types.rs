//! Configuration type definitions for the rackops core.
//!
//! These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [refresh]
//! interval_secs = 10
//!
//! [resources.volumes]
//! min_visible_loading_ms = 500
//!
//! [jobs]
//! gc_interval_secs = 30
//! expiration_window_secs = 300
//!
//! [events]
//! endpoint = "https://ops.example.net/events"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Runtime configuration derived from environment variables and system
/// defaults, not from config files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for all rackops data (default: ~/.rackops)
    pub rackops_dir: PathBuf,
    /// Log level for the application
    pub log_level: String,
}

impl Config {
    pub fn new() -> Self {
        let rackops_dir = std::env::var("RACKOPS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".rackops")
            });

        let log_level = std::env::var("RACKOPS_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            rackops_dir,
            log_level,
        }
    }

    /// Directory holding the durable job records.
    pub fn jobs_store_dir(&self) -> PathBuf {
        self.rackops_dir.join("state")
    }

    /// Path to the user config file.
    pub fn config_file(&self) -> PathBuf {
        self.rackops_dir.join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Main configuration loaded from TOML config files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RackopsConfig {
    /// Refresh loop configuration shared by all resource kinds
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Per-resource-kind settings that override the global refresh config
    #[serde(default)]
    pub resources: HashMap<String, ResourceSettings>,

    /// Job tracking and garbage collection configuration
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Push channel configuration
    #[serde(default)]
    pub events: EventsConfig,
}

/// Global refresh loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between refresh loop iterations.
    #[serde(default = "super::defaults::default_refresh_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: super::defaults::default_refresh_interval_secs(),
        }
    }
}

/// Per-resource-kind overrides.
///
/// Used in `[resources.<kind>]` sections of the config file.
///
/// # Example
///
/// ```toml
/// [resources.volumes]
/// interval_secs = 5
/// min_visible_loading_ms = 500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResourceSettings {
    /// Kind-specific refresh interval.
    #[serde(default)]
    pub interval_secs: Option<u64>,

    /// Minimum visible-loading duration so progress indicators do not
    /// flicker on fast responses. Presentation accommodation only.
    #[serde(default)]
    pub min_visible_loading_ms: Option<u64>,
}

/// Job tracking and garbage collection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Seconds between garbage collection sweeps.
    #[serde(default = "super::defaults::default_gc_interval_secs")]
    pub gc_interval_secs: u64,

    /// Seconds a completed job is retained before it becomes eligible
    /// for garbage collection.
    #[serde(default = "super::defaults::default_expiration_window_secs")]
    pub expiration_window_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            gc_interval_secs: super::defaults::default_gc_interval_secs(),
            expiration_window_secs: super::defaults::default_expiration_window_secs(),
        }
    }
}

/// Push channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventsConfig {
    /// Base URL of the server-pushed event stream. The transport collaborator
    /// appends the bearer token as a query parameter.
    #[serde(default)]
    pub endpoint: Option<String>,
}
