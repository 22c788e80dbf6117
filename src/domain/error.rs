//! Domain error types.

/// A failed alert delivery. Recovered locally: logged and surfaced as a
/// warning, never allowed to undo a recorded investment, so it is not an
/// [`AgentError`] variant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("notification failed: {reason}")]
pub struct NotificationError {
    pub reason: String,
}

impl NotificationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Top-level error type for dipwatch.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("market data unavailable: {reason}")]
    DataUnavailable { reason: String },

    #[error("storage error at {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },
}

impl AgentError {
    pub fn data_unavailable(reason: impl Into<String>) -> Self {
        AgentError::DataUnavailable {
            reason: reason.into(),
        }
    }

    pub fn storage(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        AgentError::Storage {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<&AgentError> for std::process::ExitCode {
    fn from(err: &AgentError) -> Self {
        let code: u8 = match err {
            AgentError::ConfigParse { .. } | AgentError::ConfigInvalid { .. } => 2,
            AgentError::Storage { .. } => 3,
            AgentError::DataUnavailable { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
