//! State persistence port.

use std::fs;
use std::path::PathBuf;

use crate::domain::error::AgentError;
use crate::domain::state::AgentState;

/// Single-writer guard over the persisted record. Released on drop.
#[derive(Debug)]
pub struct StateLock {
    path: Option<PathBuf>,
}

impl StateLock {
    /// A guard that holds nothing, for stores without cross-process access.
    pub fn unlocked() -> Self {
        Self { path: None }
    }

    /// A guard owning a lock file that is removed on drop.
    pub fn file(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to release state lock");
            }
        }
    }
}

pub trait StatePort {
    /// Read the record, creating and persisting the default when none exists.
    /// A malformed record is an error, never silently reset.
    fn load(&self) -> Result<AgentState, AgentError>;

    /// Read the record without creating it; a missing record reads as the
    /// default. Malformed records are still an error.
    fn peek(&self) -> Result<AgentState, AgentError>;

    /// Replace the record. A crash mid-write must leave the prior record intact.
    fn save(&self, state: &AgentState) -> Result<(), AgentError>;

    /// Take the single-writer lock for a load-mutate-save cycle.
    fn lock(&self) -> Result<StateLock, AgentError> {
        Ok(StateLock::unlocked())
    }
}
