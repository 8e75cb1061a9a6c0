pub mod errors;
pub mod reconcile;
pub mod registry;
pub mod resolver;
pub mod status;
pub mod types;

pub use errors::{JobError, ResolveError};
pub use registry::JobRegistry;
pub use resolver::JobResolver;
pub use types::{Job, JobStatus, PersistedJobRecord, StepResult};
