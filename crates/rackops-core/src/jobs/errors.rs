use crate::errors::RackopsError;
use crate::persistence::errors::PersistenceError;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job '{id}' is already tracked")]
    AlreadyTracked { id: String },

    #[error("Job '{id}' is not tracked")]
    NotFound { id: String },

    #[error("Failed to persist job records: {source}")]
    Persistence {
        #[from]
        source: PersistenceError,
    },
}

impl RackopsError for JobError {
    fn error_code(&self) -> &'static str {
        match self {
            JobError::AlreadyTracked { .. } => "JOB_ALREADY_TRACKED",
            JobError::NotFound { .. } => "JOB_NOT_FOUND",
            JobError::Persistence { .. } => "JOB_PERSISTENCE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            JobError::AlreadyTracked { .. } | JobError::NotFound { .. }
        )
    }
}

/// Error from the external poll resolver collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Poll resolver backend error: {message}")]
    Backend { message: String },

    #[error("Poll resolver transport error: {message}")]
    Transport { message: String },
}

impl RackopsError for ResolveError {
    fn error_code(&self) -> &'static str {
        match self {
            ResolveError::Backend { .. } => "RESOLVE_BACKEND_ERROR",
            ResolveError::Transport { .. } => "RESOLVE_TRANSPORT_ERROR",
        }
    }
}
