//! Startup reconciliation.
//!
//! After a restart the push channel may not be connected yet, so every
//! rehydrated job gets one poll-based resolution attempt. This closes the
//! gap between a reload and channel re-establishment: a job that finished
//! while the process was down is marked completed here instead of lingering
//! until the next envelope arrives.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::jobs::errors::JobError;
use crate::jobs::registry::JobRegistry;
use crate::jobs::resolver::JobResolver;
use crate::jobs::status;

/// Rehydrate persisted jobs and spawn one-shot resolution tasks for them.
///
/// Returns the handles of the spawned tasks so callers (and tests) can await
/// settlement; the tasks are otherwise fire-and-forget.
pub async fn reconcile_persisted_jobs(
    registry: &JobRegistry,
    resolver: Arc<dyn JobResolver>,
) -> Result<Vec<JoinHandle<()>>, JobError> {
    let records = registry.rehydrate().await?;

    info!(
        event = "core.jobs.reconcile_started",
        job_count = records.len()
    );

    let mut handles = Vec::with_capacity(records.len());
    for record in records {
        let registry = registry.clone();
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move {
            resolve_once(&registry, resolver.as_ref(), &record.id).await;
        }));
    }

    Ok(handles)
}

/// One poll-based resolution attempt. Resolver failure is logged and the job
/// stays pending; the event channel or a later poll will pick it up.
async fn resolve_once(registry: &JobRegistry, resolver: &dyn JobResolver, id: &str) {
    match resolver.print_job(id).await {
        Ok(response) => {
            let resolved = status::resolve_from_poll(&response, id);
            if registry.apply_status(id, resolved).await {
                info!(event = "core.jobs.reconcile_resolved", job_id = id);
            } else {
                debug!(event = "core.jobs.reconcile_still_running", job_id = id);
            }
        }
        Err(e) => {
            warn!(
                event = "core.jobs.reconcile_poll_failed",
                job_id = id,
                error = %e,
                message = "Treating job as still running"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::errors::ResolveError;
    use crate::persistence::{JOBS_KEY, KeyValueStore, MemoryStore};
    use futures::future::BoxFuture;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    struct MapResolver {
        responses: HashMap<String, Value>,
    }

    impl JobResolver for MapResolver {
        fn print_job(&self, id: &str) -> BoxFuture<'static, Result<Value, ResolveError>> {
            let response = self.responses.get(id).cloned();
            Box::pin(async move {
                response.ok_or_else(|| ResolveError::Transport {
                    message: "connection refused".to_string(),
                })
            })
        }
    }

    async fn settle(handles: Vec<JoinHandle<()>>) {
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_reconcile_resolves_finished_jobs() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                JOBS_KEY,
                r#"[{"id":"j1","name":"deploy-node"},{"id":"j2","name":"drain-node"}]"#,
            )
            .unwrap();
        let registry = JobRegistry::new(store);

        let resolver = Arc::new(MapResolver {
            responses: HashMap::from([
                (
                    "j1".to_string(),
                    json!({"return": [{"j1": {"Result": {
                        "s_|-a": {"result": true, "comment": "ok", "runOrder": 0}
                    }}}]}),
                ),
                // j2 has no Result yet: still running
                ("j2".to_string(), json!({"return": [{"j2": {}}]})),
            ]),
        });

        let handles = reconcile_persisted_jobs(&registry, resolver).await.unwrap();
        settle(handles).await;

        let j1 = registry.get_job("j1").await.unwrap();
        assert!(j1.completed);
        assert_eq!(j1.status.success, Some(true));

        let j2 = registry.get_job("j2").await.unwrap();
        assert!(!j2.completed);
    }

    #[tokio::test]
    async fn test_reconcile_poll_failure_leaves_job_pending() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(JOBS_KEY, r#"[{"id":"j1","name":"deploy-node"}]"#)
            .unwrap();
        let registry = JobRegistry::new(store);

        let resolver = Arc::new(MapResolver {
            responses: HashMap::new(),
        });

        let handles = reconcile_persisted_jobs(&registry, resolver).await.unwrap();
        settle(handles).await;

        let job = registry.get_job("j1").await.unwrap();
        assert!(!job.completed);
    }

    #[tokio::test]
    async fn test_reconcile_with_empty_store_spawns_nothing() {
        let registry = JobRegistry::new(Arc::new(MemoryStore::new()));
        let resolver = Arc::new(MapResolver {
            responses: HashMap::new(),
        });

        let handles = reconcile_persisted_jobs(&registry, resolver).await.unwrap();
        assert!(handles.is_empty());
    }
}
