use serde::{Deserialize, Serialize};

/// Tag suffix indicating the referenced backend operation finished.
///
/// Tags look like `salt/job/<jid>/ret`; everything before the marker is an
/// opaque routing path owned by the backend.
pub const COMPLETION_MARKER: &str = "/ret";

/// One message received from the push channel.
///
/// The payload is kept opaque: only completion-marker envelopes are ever
/// interpreted, and then only through status resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub tag: String,
    pub data: serde_json::Value,
}

impl EventEnvelope {
    pub fn new(tag: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            tag: tag.into(),
            data,
        }
    }

    /// Whether this envelope's tag carries the completion marker.
    pub fn is_completion(&self) -> bool {
        self.tag.ends_with(COMPLETION_MARKER)
    }
}
