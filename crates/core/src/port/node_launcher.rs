// Node Launcher Port
// Spawns one node process and records its pid next to the node's data

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::{NodeDefinition, Pid};
use crate::error::Result;

/// Result of launching one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub node: String,
    /// Full argument vector, program first
    pub command: Vec<String>,
    /// None when the node is staged only (`dont_start`)
    pub pid: Option<Pid>,
    /// Timestamped stderr file of this launch
    pub stderr_file: Option<PathBuf>,
}

impl LaunchOutcome {
    pub fn is_spawned(&self) -> bool {
        self.pid.is_some()
    }

    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// Node Launcher trait
///
/// Implementations:
/// - ProcessLauncher: spawns a detached OS process (infra-system)
#[async_trait]
pub trait NodeLauncher: Send + Sync {
    /// Launch `node`, or only record its command when `node.dont_start` is set
    ///
    /// # Errors
    /// - SupervisorError::Filesystem if the data directory or output files cannot be created
    /// - SupervisorError::SpawnFailed if the OS refuses to create the process
    async fn launch(&self, node: &NodeDefinition) -> Result<LaunchOutcome>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::{NodeArtifacts, ProcessRecord};
    use crate::error::SupervisorError;
    use crate::port::liveness_probe::mocks::MockLivenessProbe;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    const FIRST_MOCK_PID: Pid = 10_000;

    /// Launcher that writes real pid files but only pretends to spawn
    ///
    /// Every spawned pid is registered as alive in the shared mock probe.
    pub struct MockNodeLauncher {
        probe: Arc<MockLivenessProbe>,
        server_name: String,
        next_pid: Mutex<Pid>,
        launches: Mutex<Vec<(String, Instant)>>,
        fail_for: Mutex<Option<String>>,
    }

    impl MockNodeLauncher {
        pub fn new(probe: Arc<MockLivenessProbe>, server_name: impl Into<String>) -> Self {
            Self {
                probe,
                server_name: server_name.into(),
                next_pid: Mutex::new(FIRST_MOCK_PID),
                launches: Mutex::new(Vec::new()),
                fail_for: Mutex::new(None),
            }
        }
        /// Make launches of `node` fail with a spawn error
        pub fn fail_for(&self, node: impl Into<String>) {
            *self.fail_for.lock().unwrap() = Some(node.into());
        }
        pub fn launched(&self) -> Vec<String> {
            self.launches
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _)| name.clone())
                .collect()
        }
        pub fn launch_times(&self) -> Vec<Instant> {
            self.launches.lock().unwrap().iter().map(|(_, t)| *t).collect()
        }
    }

    #[async_trait]
    impl NodeLauncher for MockNodeLauncher {
        async fn launch(&self, node: &NodeDefinition) -> Result<LaunchOutcome> {
            let command = vec!["mock-node".to_string(), node.name.clone()];

            if node.dont_start {
                return Ok(LaunchOutcome {
                    node: node.name.clone(),
                    command,
                    pid: None,
                    stderr_file: None,
                });
            }

            if self.fail_for.lock().unwrap().as_deref() == Some(node.name.as_str()) {
                return Err(SupervisorError::SpawnFailed {
                    node: node.name.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock spawn failure"),
                });
            }

            let pid = {
                let mut next = self.next_pid.lock().unwrap();
                let pid = *next;
                *next += 1;
                pid
            };

            let artifacts = NodeArtifacts::new(&node.data_dir, &self.server_name);
            std::fs::create_dir_all(artifacts.data_dir())
                .map_err(|e| SupervisorError::filesystem(artifacts.data_dir(), e))?;
            ProcessRecord::new(pid).store(&artifacts.pid_file())?;

            self.probe.spawn(pid);
            self.launches
                .lock()
                .unwrap()
                .push((node.name.clone(), Instant::now()));

            Ok(LaunchOutcome {
                node: node.name.clone(),
                command,
                pid: Some(pid),
                stderr_file: None,
            })
        }
    }
}
