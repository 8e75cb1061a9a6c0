pub mod defaults;
pub mod loading;
pub mod types;

pub use loading::load_config;
pub use types::{Config, EventsConfig, JobsConfig, RackopsConfig, RefreshConfig, ResourceSettings};
