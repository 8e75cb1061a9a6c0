//! In-memory catalogue of admin jobs, mirrored to the durable store.
//!
//! The registry is the single writer for job state. Identity changes
//! (add/remove/rehydrate) are mirrored to the key/value store under
//! [`JOBS_KEY`]; status and event-log changes are memory-only by design.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::events::types::EventEnvelope;
use crate::jobs::errors::JobError;
use crate::jobs::types::{Job, JobStatus, PersistedJobRecord};
use crate::persistence::{JOBS_KEY, KeyValueStore, errors::PersistenceError};

#[derive(Clone)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
    store: Arc<dyn KeyValueStore>,
}

impl JobRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            store,
        }
    }

    /// Track a new job and persist its identity record.
    pub async fn add_job(&self, id: &str, name: &str) -> Result<(), JobError> {
        let mut jobs = self.jobs.write().await;

        if jobs.contains_key(id) {
            return Err(JobError::AlreadyTracked { id: id.to_string() });
        }

        jobs.insert(id.to_string(), Job::new(id, name));
        if let Err(e) = self.persist_locked(&jobs) {
            // Roll back so memory never diverges from the durable set
            jobs.remove(id);
            return Err(e.into());
        }

        info!(event = "core.jobs.added", job_id = id, name = name);
        Ok(())
    }

    /// Stop tracking a job and delete its persisted record.
    pub async fn remove_job(&self, id: &str) -> Result<(), JobError> {
        let mut jobs = self.jobs.write().await;

        let Some(job) = jobs.remove(id) else {
            return Err(JobError::NotFound { id: id.to_string() });
        };

        if let Err(e) = self.persist_locked(&jobs) {
            jobs.insert(id.to_string(), job);
            return Err(e.into());
        }

        info!(event = "core.jobs.removed", job_id = id);
        Ok(())
    }

    /// Append an envelope to a job's event log iff the job exists.
    ///
    /// Returns true when the envelope was appended.
    pub async fn append_event(&self, id: &str, envelope: EventEnvelope) -> bool {
        let mut jobs = self.jobs.write().await;

        match jobs.get_mut(id) {
            Some(job) => {
                debug!(
                    event = "core.jobs.event_appended",
                    job_id = id,
                    tag = %envelope.tag,
                    event_count = job.events.len() + 1
                );
                job.events.push(envelope);
                true
            }
            None => false,
        }
    }

    /// Apply a resolved status to a job.
    ///
    /// Only a completed status has any effect, and only once per job:
    /// `completed` is monotonic and `completed_at` is set exactly at the
    /// false→true transition. Returns true when the job transitioned.
    pub async fn apply_status(&self, id: &str, status: JobStatus) -> bool {
        if !status.completed {
            debug!(event = "core.jobs.status_still_running", job_id = id);
            return false;
        }

        let mut jobs = self.jobs.write().await;

        let Some(job) = jobs.get_mut(id) else {
            debug!(event = "core.jobs.status_for_unknown_job", job_id = id);
            return false;
        };

        if job.completed {
            debug!(event = "core.jobs.status_already_completed", job_id = id);
            return false;
        }

        job.completed = true;
        job.completed_at = Some(Utc::now());
        info!(
            event = "core.jobs.completed",
            job_id = id,
            success = ?status.success,
            failing_step_id = ?status.failing_step_id
        );
        job.status = status;
        true
    }

    /// Rebuild the in-memory catalogue from the durable store at startup.
    ///
    /// Every persisted record becomes an incomplete job with an unknown
    /// status. A malformed store value is skipped, not fatal: losing the
    /// record list beats refusing to start. Returns the rehydrated records.
    pub async fn rehydrate(&self) -> Result<Vec<PersistedJobRecord>, JobError> {
        let raw = match self.store.get(JOBS_KEY)? {
            Some(raw) => raw,
            None => {
                debug!(event = "core.jobs.rehydrate_empty_store");
                return Ok(Vec::new());
            }
        };

        let records: Vec<PersistedJobRecord> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    event = "core.jobs.rehydrate_invalid_records",
                    error = %e,
                    message = "Persisted job records are not valid JSON, starting empty"
                );
                return Ok(Vec::new());
            }
        };

        let mut jobs = self.jobs.write().await;
        let mut rehydrated = Vec::new();
        for record in records {
            if jobs.contains_key(&record.id) {
                continue;
            }
            jobs.insert(record.id.clone(), Job::new(&record.id, &record.name));
            rehydrated.push(record);
        }

        info!(event = "core.jobs.rehydrated", count = rehydrated.len());
        Ok(rehydrated)
    }

    /// Currently tracked job ids, sorted for a deterministic scan order.
    pub async fn tracked_ids(&self) -> Vec<String> {
        let jobs = self.jobs.read().await;
        let mut ids: Vec<String> = jobs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn get_job(&self, id: &str) -> Option<Job> {
        let jobs = self.jobs.read().await;
        jobs.get(id).cloned()
    }

    pub async fn jobs_snapshot(&self) -> Vec<Job> {
        let jobs = self.jobs.read().await;
        jobs.values().cloned().collect()
    }

    pub async fn job_count(&self) -> usize {
        let jobs = self.jobs.read().await;
        jobs.len()
    }

    /// Write the identity record list while holding the jobs lock, so the
    /// persisted set can never interleave with a concurrent mutation.
    fn persist_locked(&self, jobs: &HashMap<String, Job>) -> Result<(), PersistenceError> {
        let mut records: Vec<PersistedJobRecord> =
            jobs.values().map(Job::persisted_record).collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));

        let value =
            serde_json::to_string(&records).map_err(|e| PersistenceError::SerializationFailed {
                key: JOBS_KEY.to_string(),
                message: e.to_string(),
            })?;

        self.store.set(JOBS_KEY, &value)
    }
}
