/// Outcome of one expiration sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepSummary {
    /// Jobs examined, completed or not.
    pub scanned: usize,
    /// Ids removed this sweep.
    pub removed: Vec<String>,
}
