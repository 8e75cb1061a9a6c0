//! Shared resource state.
//!
//! The store is readable from any task but mutated only through these
//! methods, and by convention only by the scheduler owning each kind
//! (single-writer discipline enforced by structure, not by the type
//! system). All writes go through one `RwLock`, so no write is ever torn;
//! cross-task check-then-act races on the flags are tolerated by design.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::resources::types::{RefreshableResource, ResourceKind};

#[derive(Clone, Default)]
pub struct ResourceStore {
    resources: Arc<RwLock<HashMap<ResourceKind, RefreshableResource>>>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the live-loop flag for `kind`.
    pub async fn set_refreshing(&self, kind: ResourceKind, refreshing: bool) {
        let mut resources = self.resources.write().await;
        let resource = resources.entry(kind).or_default();
        if resource.is_refreshing != refreshing {
            debug!(
                event = "core.resources.refreshing_changed",
                kind = %kind,
                refreshing = refreshing
            );
        }
        resource.is_refreshing = refreshing;
    }

    /// Atomically claim the live-loop flag for `kind`.
    ///
    /// Returns false when a loop already holds it. The check and the set
    /// happen under one write lock, so two racing claims can never both
    /// succeed.
    pub async fn try_begin_refreshing(&self, kind: ResourceKind) -> bool {
        let mut resources = self.resources.write().await;
        let resource = resources.entry(kind).or_default();
        if resource.is_refreshing {
            return false;
        }
        resource.is_refreshing = true;
        debug!(
            event = "core.resources.refreshing_changed",
            kind = %kind,
            refreshing = true
        );
        true
    }

    pub async fn is_refreshing(&self, kind: ResourceKind) -> bool {
        let resources = self.resources.read().await;
        resources
            .get(&kind)
            .map(|r| r.is_refreshing)
            .unwrap_or(false)
    }

    /// Mark `kind` as loading until its first data of this cycle lands.
    pub async fn begin_loading(&self, kind: ResourceKind) {
        let mut resources = self.resources.write().await;
        resources.entry(kind).or_default().is_loading = true;
    }

    /// Clear the loading flag without touching items. Used when a refresh
    /// loop dies before its first data lands, so an indicator does not
    /// outlive the loop feeding it.
    pub async fn end_loading(&self, kind: ResourceKind) {
        let mut resources = self.resources.write().await;
        resources.entry(kind).or_default().is_loading = false;
    }

    /// Replace the collection for `kind` and clear its loading flag.
    pub async fn put_items(&self, kind: ResourceKind, items: Vec<Value>) {
        let mut resources = self.resources.write().await;
        let resource = resources.entry(kind).or_default();
        debug!(
            event = "core.resources.items_updated",
            kind = %kind,
            item_count = items.len()
        );
        resource.items = items;
        resource.is_loading = false;
    }

    pub async fn snapshot(&self, kind: ResourceKind) -> Option<RefreshableResource> {
        let resources = self.resources.read().await;
        resources.get(&kind).cloned()
    }

    pub async fn items(&self, kind: ResourceKind) -> Vec<Value> {
        let resources = self.resources.read().await;
        resources
            .get(&kind)
            .map(|r| r.items.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_kind_reads_as_inert() {
        let store = ResourceStore::new();
        assert!(!store.is_refreshing(ResourceKind::Nodes).await);
        assert!(store.items(ResourceKind::Nodes).await.is_empty());
        assert!(store.snapshot(ResourceKind::Nodes).await.is_none());
    }

    #[tokio::test]
    async fn test_put_items_clears_loading() {
        let store = ResourceStore::new();
        store.begin_loading(ResourceKind::Volumes).await;
        assert!(store.snapshot(ResourceKind::Volumes).await.unwrap().is_loading);

        store
            .put_items(ResourceKind::Volumes, vec![json!({"name": "pv-1"})])
            .await;

        let snapshot = store.snapshot(ResourceKind::Volumes).await.unwrap();
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.items.len(), 1);
    }

    #[tokio::test]
    async fn test_put_items_replaces_collection() {
        let store = ResourceStore::new();
        store
            .put_items(ResourceKind::Nodes, vec![json!({"name": "node-01"})])
            .await;
        store
            .put_items(ResourceKind::Nodes, vec![json!({"name": "node-02"})])
            .await;

        let items = store.items(ResourceKind::Nodes).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "node-02");
    }

    #[tokio::test]
    async fn test_try_begin_refreshing_claims_once() {
        let store = ResourceStore::new();

        assert!(store.try_begin_refreshing(ResourceKind::Nodes).await);
        assert!(!store.try_begin_refreshing(ResourceKind::Nodes).await);
        assert!(store.is_refreshing(ResourceKind::Nodes).await);

        store.set_refreshing(ResourceKind::Nodes, false).await;
        assert!(store.try_begin_refreshing(ResourceKind::Nodes).await);
    }

    #[tokio::test]
    async fn test_kinds_are_independent() {
        let store = ResourceStore::new();
        store.set_refreshing(ResourceKind::Nodes, true).await;

        assert!(store.is_refreshing(ResourceKind::Nodes).await);
        assert!(!store.is_refreshing(ResourceKind::Volumes).await);
    }

    #[tokio::test]
    async fn test_snapshot_is_a_copy() {
        let store = ResourceStore::new();
        store
            .put_items(ResourceKind::Alerts, vec![json!({"severity": "warning"})])
            .await;

        let mut snapshot = store.snapshot(ResourceKind::Alerts).await.unwrap();
        snapshot.items.clear();

        assert_eq!(store.items(ResourceKind::Alerts).await.len(), 1);
    }
}
