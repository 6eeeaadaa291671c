// Process Record: the persisted pid file of a launched node
//
// The pid file is the only link between a node and its OS process across
// supervisor invocations. It is overwritten on relaunch and never deleted.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::error::DomainError;
use super::node::Pid;
use crate::error::{Result, SupervisorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: Pid,
}

impl ProcessRecord {
    pub fn new(pid: Pid) -> Self {
        Self { pid }
    }

    /// Read a pid file
    ///
    /// # Errors
    /// - `MissingProcessRecord` if the file does not exist
    /// - `Domain(InvalidProcessRecord)` if the first line is not a positive pid
    /// - `Filesystem` for any other read failure
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SupervisorError::MissingProcessRecord(path.to_path_buf()));
            }
            Err(e) => return Err(SupervisorError::filesystem(path, e)),
        };

        let first_line = content.lines().next().unwrap_or("").trim();
        match first_line.parse::<Pid>() {
            Ok(pid) if pid > 0 => Ok(Self { pid }),
            _ => Err(DomainError::InvalidProcessRecord {
                path: path.to_path_buf(),
                content: first_line.to_string(),
            }
            .into()),
        }
    }

    /// Write the pid file, replacing any previous content
    pub fn store(&self, path: &Path) -> Result<()> {
        fs::write(path, self.pid.to_string()).map_err(|e| SupervisorError::filesystem(path, e))
    }
}
