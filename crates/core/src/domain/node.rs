// Node Domain Model

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::DomainError;

/// OS process id as persisted in a process record
pub type Pid = i32;

/// Raw signal number (e.g. 15 for SIGTERM)
pub type Signum = i32;

/// A single node of the test network, as produced by the topology generator
///
/// Only `name`, `data_dir` and `dont_start` matter to the supervisor; the other
/// fields are consumed by command-line construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefinition {
    /// Position in the topology (used for per-instance command overrides)
    #[serde(default)]
    pub index: usize,
    pub name: String,
    pub data_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<PathBuf>,
    /// Defined but intentionally not spawned
    #[serde(default)]
    pub dont_start: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

impl NodeDefinition {
    pub fn new(index: usize, name: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            index,
            name: name.into(),
            data_dir: data_dir.into(),
            config_dir: None,
            dont_start: false,
            extra_args: Vec::new(),
        }
    }

    pub fn with_config_dir(mut self, config_dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(config_dir.into());
        self
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the node as staged only: its command is recorded but never spawned
    pub fn unstarted(mut self) -> Self {
        self.dont_start = true;
        self
    }

    /// Configuration directory, falling back to the data directory
    pub fn config_dir(&self) -> &Path {
        self.config_dir.as_deref().unwrap_or(&self.data_dir)
    }
}

/// Which nodes `start_all` should spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    #[default]
    All,
    /// Every node runs on localhost, so this launches the same set as `All`
    Local,
    None,
}

impl LaunchMode {
    pub fn starts_nodes(&self) -> bool {
        !matches!(self, LaunchMode::None)
    }
}

impl std::fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchMode::All => write!(f, "all"),
            LaunchMode::Local => write!(f, "local"),
            LaunchMode::None => write!(f, "none"),
        }
    }
}

impl FromStr for LaunchMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(LaunchMode::All),
            "local" => Ok(LaunchMode::Local),
            "none" => Ok(LaunchMode::None),
            _ => Err(DomainError::InvalidLaunchMode(s.to_string())),
        }
    }
}
