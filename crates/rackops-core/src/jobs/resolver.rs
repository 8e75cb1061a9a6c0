//! Poll resolver seam.
//!
//! The backend exposes a request/response lookup for a job's step results.
//! The transport lives outside this crate; the raw JSON response is handed
//! to [`crate::jobs::status::resolve_from_poll`] unmodified.

use futures::future::BoxFuture;
use serde_json::Value;

use crate::jobs::errors::ResolveError;

pub trait JobResolver: Send + Sync {
    /// Fetch the raw poll response for `id`.
    ///
    /// An absent `Result` entry in the response means "still running", which
    /// is a successful response here, not an error.
    fn print_job(&self, id: &str) -> BoxFuture<'static, Result<Value, ResolveError>>;
}
