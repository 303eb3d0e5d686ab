//! Error types for the vaultwalk export/import tooling.

use thiserror::Error;

/// Errors raised while talking to the remote store or interpreting what it returned.
///
/// Every variant carries the store path it happened at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Path not found: {path}")]
    NotFound { path: String },

    #[error("Transport error at {path}: {message}")]
    Transport { path: String, message: String },

    #[error("Malformed entry at {path}: {message}")]
    Malformed { path: String, message: String },
}

impl AccessError {
    /// Store path the error refers to
    pub fn path(&self) -> &str {
        match self {
            AccessError::NotFound { path }
            | AccessError::Transport { path, .. }
            | AccessError::Malformed { path, .. } => path,
        }
    }

    pub fn transport(path: impl Into<String>, message: impl Into<String>) -> Self {
        AccessError::Transport {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        AccessError::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A single leaf that could not be written during an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub path: String,
    pub error: AccessError,
}

/// Top-level errors surfaced by the API and CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("{} of {attempted} secret writes failed: {}", .failures.len(), summarize_failures(.failures))]
    PartialWriteFailure {
        attempted: usize,
        failures: Vec<WriteFailure>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn summarize_failures(failures: &[WriteFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("[{}] {}", f.path, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ApiError {
    fn from(err: serde_yaml::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}
