pub mod handler;
pub mod types;

pub use handler::GarbageCollector;
pub use types::SweepSummary;
