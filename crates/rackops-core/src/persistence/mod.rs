//! Durable key/value persistence for job identity records.
//!
//! The subsystem persists exactly one kind of data: the minimal set of
//! in-flight admin job identities, written under a single key on every
//! add/remove and read back once at process start. The store is an
//! injectable trait so tests run against an in-memory fake.

pub mod errors;
pub mod file;
pub mod memory;

pub use errors::PersistenceError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// The single durable key holding the JSON array of persisted job records.
pub const JOBS_KEY: &str = "JOBS";

/// Durable key/value store surviving process restarts.
///
/// Implementations must make `set` atomic with respect to crashes: a reader
/// must observe either the previous value or the new one, never a torn write.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}
