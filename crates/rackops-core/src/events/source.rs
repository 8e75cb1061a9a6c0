//! Push channel subscription seam.
//!
//! The actual transport (persistent text event stream with the bearer token
//! in the URL) lives outside this crate. Implementations yield decoded
//! envelopes and end the stream on any transport error or server close.

use futures::future::BoxFuture;
use futures::stream::BoxStream;

use crate::events::errors::EventError;
use crate::events::types::EventEnvelope;

/// Stream of decoded push channel envelopes. The stream ending means the
/// underlying transport ended; there is no in-band error signal.
pub type EventStream = BoxStream<'static, EventEnvelope>;

/// Server-pushed event channel, one subscription per authenticated session.
pub trait EventSource: Send + Sync {
    /// Open a subscription authenticated by `token`.
    fn subscribe(&self, token: &str) -> BoxFuture<'static, Result<EventStream, EventError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    struct StaticSource {
        envelopes: Vec<EventEnvelope>,
    }

    impl EventSource for StaticSource {
        fn subscribe(&self, _token: &str) -> BoxFuture<'static, Result<EventStream, EventError>> {
            let envelopes = self.envelopes.clone();
            Box::pin(async move { Ok(futures::stream::iter(envelopes).boxed()) })
        }
    }

    #[tokio::test]
    async fn test_event_source_is_implementable() {
        let source = StaticSource {
            envelopes: vec![EventEnvelope::new("salt/job/j1/ret", serde_json::json!({}))],
        };
        let mut stream = source.subscribe("token").await.unwrap();
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }
}
