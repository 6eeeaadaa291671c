// Cluster Supervisor
// Applies lifecycle operations across the topology, one node at a time

pub mod constants;
pub mod status;

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::{LaunchMode, NodeArtifacts, NodeDefinition, ProcessRecord, Signum, Topology};
use crate::error::{Result, SupervisorError};
use crate::port::{LaunchOutcome, LivenessProbe, NodeLauncher};

pub use constants::{DEFAULT_SERVER_NAME, SIGKILL, SIGTERM};
pub use status::{KillReport, NodeState, NodeStatus};

/// Supervisor settings
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub launch_mode: LaunchMode,
    /// Pause between consecutive launches in `start_all`
    pub delay: Duration,
    /// Names the pid file of every node
    pub server_name: String,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            launch_mode: LaunchMode::All,
            delay: Duration::ZERO,
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }
}

/// Cluster supervisor
///
/// Holds no per-node runtime state: every operation re-reads the pid files, so a
/// fresh invocation can manage processes spawned by an earlier one.
pub struct ClusterSupervisor {
    topology: Topology,
    launcher: Arc<dyn NodeLauncher>,
    probe: Arc<dyn LivenessProbe>,
    config: SupervisorConfig,
}

impl ClusterSupervisor {
    /// Create a new supervisor
    ///
    /// # Example
    /// ```ignore
    /// let supervisor = ClusterSupervisor::new(
    ///     topology,
    ///     Arc::new(ProcessLauncher::new(command_builder, time_provider, "nodeos")),
    ///     liveness::detect(),
    ///     SupervisorConfig::default(),
    /// );
    /// supervisor.start_all().await?;
    /// ```
    pub fn new(
        topology: Topology,
        launcher: Arc<dyn NodeLauncher>,
        probe: Arc<dyn LivenessProbe>,
        config: SupervisorConfig,
    ) -> Self {
        Self {
            topology,
            launcher,
            probe,
            config,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    fn artifacts(&self, node: &NodeDefinition) -> NodeArtifacts {
        NodeArtifacts::new(&node.data_dir, &self.config.server_name)
    }

    /// Launch every node in definition order, sleeping `delay` between launches
    ///
    /// Stops at the first failing launch.
    pub async fn start_all(&self) -> Result<Vec<LaunchOutcome>> {
        if !self.config.launch_mode.starts_nodes() {
            info!(launch_mode = %self.config.launch_mode, "Launch mode requests no startup");
            return Ok(Vec::new());
        }

        info!(
            network = %self.topology.name(),
            nodes = self.topology.len(),
            delay_ms = self.config.delay.as_millis() as u64,
            "Starting all nodes"
        );

        let mut outcomes = Vec::with_capacity(self.topology.len());
        for (i, node) in self.topology.nodes().iter().enumerate() {
            if i > 0 && !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
            outcomes.push(self.launcher.launch(node).await?);
        }

        Ok(outcomes)
    }

    /// Stop the named nodes, optionally relaunching each after confirmed exit
    ///
    /// A plain shutdown expects the process to exist: a missing pid file or a dead
    /// process is an error. With `relaunch` both are tolerated and the node is
    /// started again. The first failing node aborts the operation.
    pub async fn down<S: AsRef<str>>(&self, names: &[S], relaunch: bool) -> Result<()> {
        for name in names {
            if self.topology.find(name.as_ref()).is_none() {
                warn!(node = %name.as_ref(), "No node with this name in topology");
            }
        }

        for node in self.topology.select(names) {
            info!(
                node = %node.name,
                "{}",
                if relaunch { "Restarting node" } else { "Shutting down node" }
            );

            let pid_file = self.artifacts(node).pid_file();
            match ProcessRecord::load(&pid_file) {
                Ok(record) => {
                    info!(node = %node.name, pid = record.pid, signum = SIGTERM, "Signaling node");
                    self.probe
                        .wait_for_exit(record.pid, SIGTERM, !relaunch)
                        .await?;
                    info!(node = %node.name, pid = record.pid, "Node exited");
                }
                Err(e) if relaunch && e.is_missing_record() => {
                    warn!(node = %node.name, error = %e, "No pid file, relaunching anyway");
                }
                Err(e) => return Err(e),
            }

            if relaunch {
                self.launcher.launch(node).await?;
            }
        }

        Ok(())
    }

    /// Restart the named nodes: `down(names, relaunch = true)`
    pub async fn bounce<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        self.down(names, true).await
    }

    /// Signal every node with `signum` and wait for each to exit
    ///
    /// Missing pid files and already-dead processes never abort the sweep; the
    /// report's exit code is non-zero if any node could not be handled.
    pub async fn kill(&self, signum: Signum) -> KillReport {
        let mut report = KillReport::default();

        for node in self.topology.nodes() {
            let pid_file = self.artifacts(node).pid_file();
            let record = match ProcessRecord::load(&pid_file) {
                Ok(record) => record,
                Err(SupervisorError::MissingProcessRecord(path)) => {
                    warn!(node = %node.name, path = %path.display(), "No pid file, skipping");
                    report.missing.push(node.name.clone());
                    continue;
                }
                Err(e) => {
                    warn!(node = %node.name, error = %e, "Cannot read pid file");
                    report.failed.push((node.name.clone(), e.to_string()));
                    continue;
                }
            };

            info!(node = %node.name, pid = record.pid, signum, "Signaling node");
            match self.probe.wait_for_exit(record.pid, signum, false).await {
                Ok(()) => report.signaled.push(node.name.clone()),
                Err(e) => {
                    warn!(node = %node.name, pid = record.pid, error = %e, "Signal failed");
                    report.failed.push((node.name.clone(), e.to_string()));
                }
            }
        }

        info!(
            signaled = report.signaled.len(),
            missing = report.missing.len(),
            failed = report.failed.len(),
            "Kill sweep complete"
        );
        report
    }

    /// Current state of every node, read from disk
    pub fn status(&self) -> Result<Vec<NodeStatus>> {
        self.topology
            .nodes()
            .iter()
            .map(|node| self.node_status(node))
            .collect()
    }

    fn node_status(&self, node: &NodeDefinition) -> Result<NodeStatus> {
        let (pid, state) = match ProcessRecord::load(&self.artifacts(node).pid_file()) {
            Ok(record) => {
                let state = if self.probe.is_alive(record.pid)? {
                    NodeState::Running
                } else {
                    NodeState::Stopped
                };
                (Some(record.pid), state)
            }
            Err(e) if e.is_missing_record() => {
                let state = if node.dont_start {
                    NodeState::Unstarted
                } else {
                    NodeState::NotLaunched
                };
                (None, state)
            }
            Err(e) => return Err(e),
        };

        Ok(NodeStatus {
            name: node.name.clone(),
            pid,
            state,
        })
    }
}
