use crate::errors::RackopsError;

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Failed to subscribe to push channel: {message}")]
    SubscribeFailed { message: String },
}

impl RackopsError for EventError {
    fn error_code(&self) -> &'static str {
        match self {
            EventError::SubscribeFailed { .. } => "EVENT_SUBSCRIBE_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_error_display() {
        let error = EventError::SubscribeFailed {
            message: "401 unauthorized".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to subscribe to push channel: 401 unauthorized"
        );
        assert_eq!(error.error_code(), "EVENT_SUBSCRIBE_FAILED");
    }
}
