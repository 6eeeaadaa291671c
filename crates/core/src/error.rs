// Central Error Type for the Supervisor

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{Pid, Signum};

/// Supervisor-level error type
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    /// Pid file absent when an operation expected the node to have been launched
    #[error("Missing process record: {}", .0.display())]
    MissingProcessRecord(PathBuf),

    #[error("Spawn failed for node {node}: {source}")]
    SpawnFailed {
        node: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target process did not exist when the signal was sent
    #[error("No such process: {0}")]
    ProcessNotFound(Pid),

    #[error("Signal {signum} to pid {pid} failed: {reason}")]
    Signal {
        pid: Pid,
        signum: Signum,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SupervisorError {
    /// Wrap an I/O failure with the path it happened on
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SupervisorError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn is_missing_record(&self) -> bool {
        matches!(self, SupervisorError::MissingProcessRecord(_))
    }
}

/// Result type alias using SupervisorError
pub type Result<T> = std::result::Result<T, SupervisorError>;
