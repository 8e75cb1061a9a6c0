//! Wiring layer that owns the long-running tasks.
//!
//! The supervisor composes the store, registry, schedulers, event consumer
//! and garbage collector into one object the embedding surface drives. It
//! owns no policy of its own: every behavior here is delegation plus
//! lifecycle bookkeeping.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::types::RackopsConfig;
use crate::events::consumer::EventStreamConsumer;
use crate::events::errors::EventError;
use crate::events::source::EventSource;
use crate::gc::GarbageCollector;
use crate::jobs::errors::JobError;
use crate::jobs::reconcile::reconcile_persisted_jobs;
use crate::jobs::registry::JobRegistry;
use crate::jobs::resolver::JobResolver;
use crate::resources::fetcher::ResourceFetcher;
use crate::resources::scheduler::RefreshScheduler;
use crate::resources::store::ResourceStore;
use crate::resources::types::ResourceKind;

pub struct Supervisor {
    store: ResourceStore,
    registry: JobRegistry,
    fetchers: HashMap<ResourceKind, Arc<dyn ResourceFetcher>>,
    resolver: Arc<dyn JobResolver>,
    event_source: Arc<dyn EventSource>,
    config: RackopsConfig,
    shutdown: CancellationToken,
    gc_handle: Mutex<Option<JoinHandle<()>>>,
    consumer_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Supervisor {
    pub fn new(
        store: ResourceStore,
        registry: JobRegistry,
        fetchers: HashMap<ResourceKind, Arc<dyn ResourceFetcher>>,
        resolver: Arc<dyn JobResolver>,
        event_source: Arc<dyn EventSource>,
        config: RackopsConfig,
    ) -> Self {
        Self {
            store,
            registry,
            fetchers,
            resolver,
            event_source,
            config,
            shutdown: CancellationToken::new(),
            gc_handle: Mutex::new(None),
            consumer_handle: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Start the refresh loop for `kind` unless one is already live.
    ///
    /// Returns true when a new loop was spawned. Idempotence rests on the
    /// scheduler's atomic flag claim, so re-invoking a live refresh (view
    /// re-entry, double navigation, two racing callers) never stacks a
    /// second loop on the same kind.
    pub async fn start_refresh(&self, kind: ResourceKind) -> bool {
        let Some(fetcher) = self.fetchers.get(&kind) else {
            warn!(event = "core.runtime.no_fetcher", kind = %kind);
            return false;
        };

        let settings = self.config.resources.get(kind.as_str());
        let interval_secs = settings
            .and_then(|s| s.interval_secs)
            .unwrap_or(self.config.refresh.interval_secs);

        let mut scheduler = RefreshScheduler::new(
            kind,
            self.store.clone(),
            fetcher.clone(),
            Duration::from_secs(interval_secs),
        );
        if let Some(floor_ms) = settings.and_then(|s| s.min_visible_loading_ms) {
            scheduler = scheduler.with_min_visible_loading(Duration::from_millis(floor_ms));
        }

        match scheduler.start().await {
            Some(_handle) => true,
            None => {
                info!(event = "core.runtime.refresh_already_live", kind = %kind);
                false
            }
        }
    }

    /// Ask the refresh loop for `kind` to stop after its current iteration.
    pub async fn stop_refresh(&self, kind: ResourceKind) {
        self.store.set_refreshing(kind, false).await;
    }

    /// The configured push channel endpoint, for the transport collaborator
    /// implementing [`EventSource`].
    pub fn events_endpoint(&self) -> Option<&str> {
        self.config.events.endpoint.as_deref()
    }

    /// Rehydrate persisted jobs and kick off their one-shot resolutions.
    ///
    /// Called once on startup, before the push channel is connected.
    pub async fn startup(&self) -> Result<Vec<JoinHandle<()>>, JobError> {
        reconcile_persisted_jobs(&self.registry, self.resolver.clone()).await
    }

    /// Begin tracking a freshly submitted job.
    pub async fn submit_job(&self, id: &str, name: &str) -> Result<(), JobError> {
        self.registry.add_job(id, name).await
    }

    /// Open the push channel and consume it in the background.
    ///
    /// The subscription is established before this returns, so an auth
    /// failure surfaces to the caller; once running, the consumer exits
    /// silently when the transport ends. Reconnecting means calling this
    /// again, typically on the next login.
    pub async fn connect_events(&self, token: &str) -> Result<(), EventError> {
        let stream = self.event_source.subscribe(token).await?;
        info!(event = "core.runtime.events_connected");

        let consumer = EventStreamConsumer::new(self.registry.clone());
        let handle = tokio::spawn(consumer.run(stream));
        *self.consumer_handle.lock().await = Some(handle);
        Ok(())
    }

    /// Spawn the garbage collection loop, replacing a previous one if any.
    pub async fn start_gc(&self) {
        let gc = GarbageCollector::new(
            self.registry.clone(),
            Duration::from_secs(self.config.jobs.gc_interval_secs),
            Duration::from_secs(self.config.jobs.expiration_window_secs),
        );

        let handle = gc.start(self.shutdown.clone());
        let mut slot = self.gc_handle.lock().await;
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Stop every loop the supervisor owns.
    ///
    /// Refresh loops are asked to stop through their store flags; the
    /// collector observes the cancellation token; the event consumer is
    /// aborted since its stream may never yield again.
    pub async fn shutdown(&self) {
        info!(event = "core.runtime.shutdown");
        self.shutdown.cancel();

        for kind in ResourceKind::all() {
            self.store.set_refreshing(kind, false).await;
        }

        if let Some(handle) = self.consumer_handle.lock().await.take() {
            handle.abort();
        }
        if let Some(handle) = self.gc_handle.lock().await.take() {
            let _ = handle.await;
        }
    }
}
