use crate::errors::RackopsError;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error accessing store: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to serialize value for key '{key}': {message}")]
    SerializationFailed { key: String, message: String },
}

impl RackopsError for PersistenceError {
    fn error_code(&self) -> &'static str {
        match self {
            PersistenceError::IoError { .. } => "PERSISTENCE_IO_ERROR",
            PersistenceError::SerializationFailed { .. } => "PERSISTENCE_SERIALIZATION_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_codes() {
        let error = PersistenceError::SerializationFailed {
            key: "JOBS".to_string(),
            message: "bad value".to_string(),
        };
        assert_eq!(error.error_code(), "PERSISTENCE_SERIALIZATION_FAILED");
        assert!(!error.is_user_error());
    }
}
