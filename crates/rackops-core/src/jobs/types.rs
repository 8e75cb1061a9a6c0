//! Job tracking type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::types::EventEnvelope;

/// A tracked long-running backend operation.
///
/// Created when a user triggers an admin action, rehydrated from the durable
/// store at process start (status unknown until resolved), removed only by
/// garbage collection once expired or by explicit acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub completed: bool,
    /// Set exactly when `completed` transitions to true, never cleared.
    pub completed_at: Option<DateTime<Utc>>,
    pub status: JobStatus,
    /// Every envelope correlated to this job, in arrival order. Growth is
    /// unbounded for the lifetime of the job record.
    pub events: Vec<EventEnvelope>,
}

impl Job {
    /// A freshly created or rehydrated job: incomplete, empty event log.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            completed: false,
            completed_at: None,
            status: JobStatus::pending(),
            events: Vec::new(),
        }
    }

    /// The durable subset of this job, written on creation/removal only.
    pub fn persisted_record(&self) -> PersistedJobRecord {
        PersistedJobRecord {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Derived completion state of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub completed: bool,
    pub success: Option<bool>,
    pub failing_step_id: Option<String>,
    pub comment: Option<String>,
}

impl JobStatus {
    /// Still running (or not yet resolvable): the only non-completed state.
    pub fn pending() -> Self {
        Self {
            completed: false,
            success: None,
            failing_step_id: None,
            comment: None,
        }
    }

    pub fn succeeded() -> Self {
        Self {
            completed: true,
            success: Some(true),
            failing_step_id: None,
            comment: None,
        }
    }

    pub fn failed(failing_step_id: Option<String>, comment: Option<String>) -> Self {
        Self {
            completed: true,
            success: Some(false),
            failing_step_id,
            comment,
        }
    }
}

/// The durable subset of a job: identity only, never status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedJobRecord {
    pub id: String,
    pub name: String,
}

/// One named step inside a job's poll result or completion envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub result: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "runOrder")]
    pub run_order: i64,
}
