//! JSON file state store.
//!
//! The record is replaced by writing a sibling temp file, syncing it, and
//! renaming it over the original, so a crash mid-write leaves the previous
//! record readable. Overlapping runs are excluded by a `<path>.lock` file
//! created with `create_new`.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::domain::error::AgentError;
use crate::domain::state::AgentState;
use crate::ports::state_port::{StateLock, StatePort};

pub struct JsonStateAdapter {
    path: PathBuf,
}

impl JsonStateAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    fn storage_err(&self, reason: impl std::fmt::Display) -> AgentError {
        AgentError::storage(self.path.display(), reason)
    }

    /// `None` when no record exists.
    fn read(&self) -> Result<Option<AgentState>, AgentError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.storage_err(format!("failed to read: {e}"))),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| self.storage_err(format!("malformed state record: {e}")))
    }
}

impl StatePort for JsonStateAdapter {
    fn load(&self) -> Result<AgentState, AgentError> {
        match self.read()? {
            Some(state) => Ok(state),
            None => {
                tracing::info!(path = %self.path.display(), "no state record, initializing");
                let state = AgentState::default();
                self.save(&state)?;
                Ok(state)
            }
        }
    }

    fn peek(&self) -> Result<AgentState, AgentError> {
        Ok(self.read()?.unwrap_or_default())
    }

    fn save(&self, state: &AgentState) -> Result<(), AgentError> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| self.storage_err(format!("failed to encode: {e}")))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| self.storage_err(format!("failed to create directory: {e}")))?;
        }

        let tmp = self.sibling(".tmp");
        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            self.storage_err(format!("failed to write: {e}"))
        })
    }

    fn lock(&self) -> Result<StateLock, AgentError> {
        let lock_path = self.lock_path();
        if let Some(dir) = lock_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| self.storage_err(format!("failed to create directory: {e}")))?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(mut file) => {
                // The guard owns the file from here, so a failed write still
                // releases it.
                let guard = StateLock::file(lock_path);
                writeln!(file, "{}", std::process::id())
                    .map_err(|e| self.storage_err(format!("failed to write lock: {e}")))?;
                Ok(guard)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(self.storage_err(format!(
                "state is locked by another run (remove {} if stale)",
                lock_path.display()
            ))),
            Err(e) => Err(self.storage_err(format!("failed to acquire lock: {e}"))),
        }
    }
}
