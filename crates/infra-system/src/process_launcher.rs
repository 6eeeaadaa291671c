// Node process launcher
// reason: tokio::process for detached spawning with file-backed stdio
use async_trait::async_trait;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use launcher_core::domain::{launch_stamp, NodeArtifacts, NodeDefinition, Pid, ProcessRecord};
use launcher_core::port::{CommandBuilder, LaunchOutcome, NodeLauncher, TimeProvider};
use launcher_core::{Result, SupervisorError};

/// Upper bound on same-timestamp stderr files before giving up
const MAX_STDERR_ATTEMPTS: u32 = 1000;

/// Spawns node processes that outlive the supervisor
///
/// Each node runs in its own process group with stdout/stderr redirected to files
/// under its data directory; its pid is persisted for later invocations.
pub struct ProcessLauncher {
    command_builder: Arc<dyn CommandBuilder>,
    time_provider: Arc<dyn TimeProvider>,
    server_name: String,
}

impl ProcessLauncher {
    /// Create a new process launcher
    ///
    /// # Arguments
    /// * `command_builder` - Builds each node's argument vector
    /// * `time_provider` - Clock for stderr file timestamps
    /// * `server_name` - Names the pid file (`<server_name>.pid`)
    ///
    /// # Example
    /// ```ignore
    /// let launcher = ProcessLauncher::new(
    ///     Arc::new(NodeosCommandBuilder::new(NodeosCommandConfig::default())),
    ///     Arc::new(SystemTimeProvider),
    ///     "nodeos",
    /// );
    /// ```
    pub fn new(
        command_builder: Arc<dyn CommandBuilder>,
        time_provider: Arc<dyn TimeProvider>,
        server_name: impl Into<String>,
    ) -> Self {
        Self {
            command_builder,
            time_provider,
            server_name: server_name.into(),
        }
    }

    fn ensure_dir(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| SupervisorError::filesystem(dir, e))
    }

    fn write_start_cmd(artifacts: &NodeArtifacts, command: &[String]) -> Result<()> {
        let path = artifacts.start_cmd();
        fs::write(&path, command.join(" ")).map_err(|e| SupervisorError::filesystem(path, e))
    }

    /// Create this launch's stderr file without clobbering an earlier one
    fn open_stderr(&self, artifacts: &NodeArtifacts) -> Result<(PathBuf, File)> {
        let stamp = launch_stamp(self.time_provider.now_millis());

        for attempt in 0..MAX_STDERR_ATTEMPTS {
            let path = artifacts.stderr_file(&stamp, attempt);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(SupervisorError::filesystem(path, e)),
            }
        }

        Err(SupervisorError::filesystem(
            artifacts.stderr_file(&stamp, MAX_STDERR_ATTEMPTS),
            std::io::Error::new(ErrorKind::AlreadyExists, "too many launches per millisecond"),
        ))
    }

    /// Point `stderr.txt` at the newest stderr file
    fn repoint_stderr_link(artifacts: &NodeArtifacts, stderr_file: &Path) -> Result<()> {
        let link = artifacts.stderr_link();
        match fs::remove_file(&link) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(SupervisorError::filesystem(link, e)),
        }

        // Relative target keeps the data directory relocatable
        let target = stderr_file.file_name().unwrap_or(stderr_file.as_os_str());
        std::os::unix::fs::symlink(target, &link).map_err(|e| SupervisorError::filesystem(link, e))
    }

    fn spawn_detached(
        node: &NodeDefinition,
        command: &[String],
        stdout: File,
        stderr: File,
    ) -> Result<Child> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| launcher_core::domain::DomainError::EmptyCommand(node.name.clone()))?;

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            // Own process group: signals aimed at the supervisor's group skip the node
            .process_group(0)
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| SupervisorError::SpawnFailed {
                node: node.name.clone(),
                source,
            })
    }

    /// Reap the child in the background so its pid disappears on exit
    fn reap_in_background(node: &str, pid: Pid, mut child: Child) {
        let node = node.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!(node = %node, pid, status = %status, "Node process exited"),
                Err(e) => warn!(node = %node, pid, error = %e, "Failed to reap node process"),
            }
        });
    }
}

#[async_trait]
impl NodeLauncher for ProcessLauncher {
    async fn launch(&self, node: &NodeDefinition) -> Result<LaunchOutcome> {
        let command = self.command_builder.build(node)?;
        let command_line = command.join(" ");
        let artifacts = NodeArtifacts::new(&node.data_dir, &self.server_name);

        Self::ensure_dir(artifacts.data_dir())?;
        // Written before any output file is opened; a failed launch still leaves it
        Self::write_start_cmd(&artifacts, &command)?;

        if node.dont_start {
            info!(node = %node.name, command = %command_line, "Unstarted node command");
            return Ok(LaunchOutcome {
                node: node.name.clone(),
                command,
                pid: None,
                stderr_file: None,
            });
        }

        let stdout_path = artifacts.stdout_file();
        let stdout =
            File::create(&stdout_path).map_err(|e| SupervisorError::filesystem(&stdout_path, e))?;
        let (stderr_path, stderr) = self.open_stderr(&artifacts)?;

        info!(node = %node.name, command = %command_line, "Spawning child");

        let child = Self::spawn_detached(node, &command, stdout, stderr)?;

        let pid = child.id().map(|id| id as Pid).ok_or_else(|| SupervisorError::SpawnFailed {
            node: node.name.clone(),
            source: std::io::Error::new(ErrorKind::Other, "process exited before its pid was read"),
        })?;
        Self::reap_in_background(&node.name, pid, child);

        ProcessRecord::new(pid).store(&artifacts.pid_file())?;
        Self::repoint_stderr_link(&artifacts, &stderr_path)?;

        info!(node = %node.name, pid, stderr = %stderr_path.display(), "Node launched");

        Ok(LaunchOutcome {
            node: node.name.clone(),
            command,
            pid: Some(pid),
            stderr_file: Some(stderr_path),
        })
    }
}
