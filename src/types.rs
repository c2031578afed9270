//! Core error and result types for the registry synchronizer

use serde::{Deserialize, Serialize};

/// Errors that can occur while synchronizing a registry snapshot
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("row has no persisted identity: {0}")]
    MissingId(&'static str),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Write-volume counters reported by storage backends.
///
/// The reconciler is expected to be quiet on re-imports of an unchanged
/// snapshot; these counters make that observable in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteStats {
    /// Rows inserted through bulk-create calls
    pub inserts: usize,
    /// Rows rewritten through save-with-changed-fields calls
    pub saves: usize,
    /// Rows marked inactive
    pub soft_deletes: usize,
}

impl WriteStats {
    /// Total writes of any kind
    pub fn total(&self) -> usize {
        self.inserts + self.saves + self.soft_deletes
    }
}
