pub mod errors;
pub mod fetcher;
pub mod scheduler;
pub mod store;
pub mod types;

pub use errors::FetchError;
pub use fetcher::ResourceFetcher;
pub use scheduler::RefreshScheduler;
pub use store::ResourceStore;
pub use types::{RefreshableResource, ResourceKind};
