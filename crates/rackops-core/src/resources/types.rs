//! Resource collection type definitions.

use serde::{Deserialize, Serialize};

/// The independently refreshed resource collections on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Nodes,
    Volumes,
    Alerts,
    ClusterStatus,
    Jobs,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Nodes => "nodes",
            ResourceKind::Volumes => "volumes",
            ResourceKind::Alerts => "alerts",
            ResourceKind::ClusterStatus => "cluster_status",
            ResourceKind::Jobs => "jobs",
        }
    }

    pub fn all() -> [ResourceKind; 5] {
        [
            ResourceKind::Nodes,
            ResourceKind::Volumes,
            ResourceKind::Alerts,
            ResourceKind::ClusterStatus,
            ResourceKind::Jobs,
        ]
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resource collection plus its refresh bookkeeping.
///
/// Items are opaque backend payloads; interpreting them belongs to the
/// presentation layer. Entries live for the lifetime of the process and
/// hold no persistent state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshableResource {
    pub items: Vec<serde_json::Value>,
    /// True from the start of a refresh cycle until the first data lands.
    pub is_loading: bool,
    /// True while a refresh loop for this kind is live. Rechecked by the
    /// loop only after its post-fetch delay, so clearing it stops the loop
    /// eventually, not immediately.
    pub is_refreshing: bool,
}
