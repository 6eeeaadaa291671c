// Domain Error Types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Duplicate node name in topology: {0}")]
    DuplicateNodeName(String),

    #[error("Duplicate data directory in topology: {}", .0.display())]
    DuplicateDataDir(PathBuf),

    #[error("Invalid process record {}: {content:?}", .path.display())]
    InvalidProcessRecord { path: PathBuf, content: String },

    #[error("Invalid launch mode: {0} (expected all, local or none)")]
    InvalidLaunchMode(String),

    #[error("Empty command line for node {0}")]
    EmptyCommand(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
