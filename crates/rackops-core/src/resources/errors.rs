use crate::errors::RackopsError;

/// Failure from a resource fetch collaborator.
///
/// `Backend` carries the error field a backend response may embed;
/// `Transport` covers everything below it. The scheduler treats both the
/// same way: the loop for that kind stops silently.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Backend reported error: {message}")]
    Backend { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl RackopsError for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            FetchError::Backend { .. } => "FETCH_BACKEND_ERROR",
            FetchError::Transport { .. } => "FETCH_TRANSPORT_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let error = FetchError::Backend {
            message: "node not found".to_string(),
        };
        assert_eq!(error.to_string(), "Backend reported error: node not found");
        assert_eq!(error.error_code(), "FETCH_BACKEND_ERROR");
    }
}
