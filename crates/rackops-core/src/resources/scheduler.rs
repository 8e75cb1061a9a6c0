//! Self-rescheduling polling loop, one instance per resource kind.
//!
//! The loop is sequential by construction: the next fetch is issued only
//! after the previous one resolves and the post-fetch delay elapses, so no
//! two fetches for one kind are ever outstanding. The stop flag is rechecked
//! only after the delay, which makes termination eventual rather than
//! immediate: a stop during an in-flight fetch still lets that iteration
//! finish and write its data.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::resources::fetcher::ResourceFetcher;
use crate::resources::store::ResourceStore;
use crate::resources::types::ResourceKind;

pub struct RefreshScheduler {
    kind: ResourceKind,
    store: ResourceStore,
    fetcher: Arc<dyn ResourceFetcher>,
    interval: Duration,
    min_visible_loading: Option<Duration>,
}

impl RefreshScheduler {
    pub fn new(
        kind: ResourceKind,
        store: ResourceStore,
        fetcher: Arc<dyn ResourceFetcher>,
        interval: Duration,
    ) -> Self {
        Self {
            kind,
            store,
            fetcher,
            interval,
            min_visible_loading: None,
        }
    }

    /// Enforce a minimum visible-loading duration on the first response of
    /// a cycle, so a fast backend does not make the indicator flicker.
    /// Presentation accommodation, not a correctness requirement.
    pub fn with_min_visible_loading(mut self, floor: Duration) -> Self {
        self.min_visible_loading = Some(floor);
        self
    }

    /// Claim the `is_refreshing` flag for this kind and spawn the polling
    /// loop, or return `None` when a loop for the kind is already live.
    ///
    /// The claim is a single atomic test-and-set in the store, so two
    /// racing starts can never both spawn a loop for one kind. Stopping is
    /// done through the store: clearing the flag (via
    /// [`ResourceStore::set_refreshing`]) makes the loop exit after its
    /// current iteration settles.
    pub async fn start(self) -> Option<JoinHandle<()>> {
        if !self.store.try_begin_refreshing(self.kind).await {
            return None;
        }
        Some(tokio::spawn(self.run()))
    }

    async fn run(self) {
        info!(
            event = "core.refresh.loop_started",
            kind = %self.kind,
            interval_ms = self.interval.as_millis() as u64
        );

        self.store.begin_loading(self.kind).await;

        loop {
            let started = Instant::now();

            match self.fetcher.fetch().await {
                Ok(items) => {
                    if let Some(floor) = self.min_visible_loading
                        && self.is_loading().await
                    {
                        // Bind elapsed once: re-reading the clock for the
                        // subtraction could cross the floor in between and
                        // underflow.
                        let elapsed = started.elapsed();
                        if elapsed < floor {
                            tokio::time::sleep(floor - elapsed).await;
                        }
                    }
                    self.store.put_items(self.kind, items).await;
                }
                Err(e) => {
                    // No retry, no backoff: the failure surfaces only as
                    // stale or absent data for this kind.
                    warn!(
                        event = "core.refresh.fetch_failed",
                        kind = %self.kind,
                        error = %e,
                        message = "Stopping refresh loop for this kind"
                    );
                    self.store.end_loading(self.kind).await;
                    self.store.set_refreshing(self.kind, false).await;
                    break;
                }
            }

            tokio::time::sleep(self.interval).await;

            if !self.store.is_refreshing(self.kind).await {
                debug!(event = "core.refresh.stop_observed", kind = %self.kind);
                break;
            }
        }

        info!(event = "core.refresh.loop_exited", kind = %self.kind);
    }

    async fn is_loading(&self) -> bool {
        self.store
            .snapshot(self.kind)
            .await
            .map(|r| r.is_loading)
            .unwrap_or(false)
    }
}
