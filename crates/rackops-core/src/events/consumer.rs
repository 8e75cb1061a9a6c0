//! Push channel consumption and job correlation.
//!
//! Envelopes are correlated to jobs by substring containment: the first
//! tracked job id that appears anywhere in the envelope tag wins. This rule
//! is deliberately preserved from the backend's established behavior even
//! though ids that prefix each other can shadow one another; see the
//! substring hazard test below. Do not silently change it to exact matching.

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::events::errors::EventError;
use crate::events::source::{EventSource, EventStream};
use crate::events::types::EventEnvelope;
use crate::jobs::registry::JobRegistry;
use crate::jobs::status;

pub struct EventStreamConsumer {
    registry: JobRegistry,
}

impl EventStreamConsumer {
    pub fn new(registry: JobRegistry) -> Self {
        Self { registry }
    }

    /// Open a subscription and consume it until the transport ends.
    ///
    /// There is no automatic reconnect: when the stream ends (server close
    /// or transport error) this returns, and re-establishing the channel is
    /// the caller's decision (typically the next login).
    pub async fn connect_and_run(
        self,
        source: &dyn EventSource,
        token: &str,
    ) -> Result<(), EventError> {
        let stream = source.subscribe(token).await.map_err(|e| {
            warn!(event = "core.events.subscribe_failed", error = %e);
            e
        })?;

        info!(event = "core.events.subscribed");
        self.run(stream).await;
        Ok(())
    }

    /// Consume an already-open stream until it ends.
    pub async fn run(self, mut stream: EventStream) {
        while let Some(envelope) = stream.next().await {
            self.handle_envelope(envelope).await;
        }

        info!(
            event = "core.events.stream_ended",
            message = "Push channel closed, consumer exiting without reconnect"
        );
    }

    async fn handle_envelope(&self, envelope: EventEnvelope) {
        let ids = self.registry.tracked_ids().await;

        let Some(id) = ids.iter().find(|id| envelope.tag.contains(id.as_str())) else {
            debug!(
                event = "core.events.envelope_unmatched",
                tag = %envelope.tag
            );
            return;
        };

        debug!(
            event = "core.events.envelope_matched",
            job_id = %id,
            tag = %envelope.tag,
            completion = envelope.is_completion()
        );

        let completion = envelope.is_completion();
        let data = envelope.data.clone();

        self.registry.append_event(id, envelope).await;

        if completion {
            let resolved = status::resolve_from_event(&data);
            self.registry.apply_status(id, resolved).await;
        }
    }
}
