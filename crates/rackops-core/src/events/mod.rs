pub mod consumer;
pub mod errors;
pub mod source;
pub mod types;

pub use consumer::EventStreamConsumer;
pub use errors::EventError;
pub use source::{EventSource, EventStream};
pub use types::{COMPLETION_MARKER, EventEnvelope};
