//! rackops-core: Core library for the bare-metal ops dashboard
//!
//! This library provides the refresh and job-tracking machinery behind the
//! dashboard: live polling of cluster resource collections, durable tracking
//! of long-running admin jobs, server-pushed event correlation, and
//! expiration of completed work. It is UI-agnostic; embedding surfaces drive
//! it through [`runtime::Supervisor`].
//!
//! # Main Entry Points
//!
//! - [`runtime`] - Supervisor wiring the long-running tasks together
//! - [`resources`] - Resource store and per-kind refresh scheduling
//! - [`jobs`] - Job registry, status resolution, startup reconciliation
//! - [`events`] - Push channel consumption and job correlation
//! - [`gc`] - Expiration of completed jobs
//! - [`persistence`] - Durable key/value store for job identity records
//! - [`config`] - Configuration management

pub mod config;
pub mod errors;
pub mod events;
pub mod gc;
pub mod jobs;
pub mod logging;
pub mod persistence;
pub mod resources;
pub mod runtime;

// Re-export commonly used types at crate root for convenience
pub use config::types::{Config, RackopsConfig};
pub use events::consumer::EventStreamConsumer;
pub use events::source::{EventSource, EventStream};
pub use events::types::EventEnvelope;
pub use gc::{GarbageCollector, SweepSummary};
pub use jobs::{Job, JobError, JobRegistry, JobResolver, JobStatus, ResolveError};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use resources::fetcher::ResourceFetcher;
pub use resources::store::ResourceStore;
pub use resources::types::{RefreshableResource, ResourceKind};
pub use resources::RefreshScheduler;
pub use runtime::Supervisor;

// Re-export logging initialization
pub use logging::init_logging;
