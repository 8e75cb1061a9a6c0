//! Resource fetch seam.
//!
//! One async fetch collaborator per resource kind. Backends that embed an
//! error field in an otherwise successful response must surface it as
//! `FetchError::Backend` so the scheduler sees a single failure shape.

use futures::future::BoxFuture;
use serde_json::Value;

use crate::resources::errors::FetchError;

pub trait ResourceFetcher: Send + Sync {
    /// Fetch the current collection for this fetcher's resource kind.
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Value>, FetchError>>;
}
