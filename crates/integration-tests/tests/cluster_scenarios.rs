//! Cluster-wide scenarios against real processes
//!
//! Every supervisor here is built fresh from the topology, the same way a new
//! CLI invocation would be, so state only flows through the pid files.

use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use launcher_core::application::{
    ClusterSupervisor, NodeState, SupervisorConfig, SIGKILL, SIGTERM,
};
use launcher_core::domain::{NodeArtifacts, NodeDefinition, Pid, ProcessRecord, Topology};
use launcher_core::port::command_builder::mocks::FixedCommandBuilder;
use launcher_core::port::time_provider::SystemTimeProvider;
use launcher_core::SupervisorError;
use launcher_infra_system::{liveness, ProcessLauncher};

const SERVER_NAME: &str = "nodeos";

fn topology(dir: &std::path::Path, names: &[&str]) -> Topology {
    let nodes = names
        .iter()
        .enumerate()
        .map(|(i, name)| NodeDefinition::new(i, *name, dir.join(format!("node_{name}"))))
        .collect();
    Topology::new("testnet_", nodes).unwrap()
}

fn supervisor(topology: Topology, delay: Duration) -> ClusterSupervisor {
    let launcher = Arc::new(ProcessLauncher::new(
        Arc::new(FixedCommandBuilder::new(["sleep", "30"])),
        Arc::new(SystemTimeProvider),
        SERVER_NAME,
    ));
    let config = SupervisorConfig {
        delay,
        ..Default::default()
    };
    ClusterSupervisor::new(topology, launcher, liveness::detect(), config)
}

fn pid_of(supervisor: &ClusterSupervisor, name: &str) -> Pid {
    let node = supervisor.topology().find(name).unwrap();
    ProcessRecord::load(&NodeArtifacts::new(&node.data_dir, SERVER_NAME).pid_file())
        .unwrap()
        .pid
}

/// start_all → down(b) → bounce(b)
#[tokio::test]
async fn test_three_node_start_down_bounce() {
    let dir = tempfile::tempdir().unwrap();
    let topology = topology(dir.path(), &["a", "b", "c"]);
    let supervisor = supervisor(topology.clone(), Duration::from_millis(200));
    let probe = liveness::detect();

    let started = Instant::now();
    let outcomes = supervisor.start_all().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(400));
    assert_eq!(outcomes.len(), 3);

    let (a, b, c) = (
        pid_of(&supervisor, "a"),
        pid_of(&supervisor, "b"),
        pid_of(&supervisor, "c"),
    );
    assert!(probe.is_alive(a).unwrap() && probe.is_alive(b).unwrap() && probe.is_alive(c).unwrap());

    supervisor.down(&["b"], false).await.unwrap();

    assert!(!probe.is_alive(b).unwrap());
    assert!(probe.is_alive(a).unwrap());
    assert!(probe.is_alive(c).unwrap());

    // Fresh invocation: nothing in memory, only pid files
    let restarted = self::supervisor(topology, Duration::ZERO);
    restarted.bounce(&["b"]).await.unwrap();

    let new_b = pid_of(&restarted, "b");
    assert_ne!(new_b, b);
    assert!(probe.is_alive(new_b).unwrap());

    let report = restarted.kill(SIGKILL).await;
    assert_eq!(report.exit_code(), 0);
    for pid in [a, new_b, c] {
        assert!(!probe.is_alive(pid).unwrap());
    }
}

#[tokio::test]
async fn test_down_without_pid_file_fails_but_bounce_relaunches() {
    let dir = tempfile::tempdir().unwrap();
    let supervisor = supervisor(topology(dir.path(), &["a"]), Duration::ZERO);

    let result = supervisor.down(&["a"], false).await;
    assert!(matches!(result, Err(SupervisorError::MissingProcessRecord(_))));

    supervisor.bounce(&["a"]).await.unwrap();
    let pid = pid_of(&supervisor, "a");
    assert!(liveness::detect().is_alive(pid).unwrap());

    assert_eq!(supervisor.kill(SIGKILL).await.exit_code(), 0);
}

#[tokio::test]
async fn test_kill_sweeps_past_missing_pid_file() {
    let dir = tempfile::tempdir().unwrap();
    let supervisor = supervisor(topology(dir.path(), &["a", "b", "c"]), Duration::ZERO);
    supervisor.start_all().await.unwrap();
    let (a, c) = (pid_of(&supervisor, "a"), pid_of(&supervisor, "c"));
    let b = pid_of(&supervisor, "b");

    let b_node = supervisor.topology().find("b").unwrap();
    fs::remove_file(NodeArtifacts::new(&b_node.data_dir, SERVER_NAME).pid_file()).unwrap();

    let report = supervisor.kill(SIGTERM).await;

    assert_ne!(report.exit_code(), 0);
    assert_eq!(report.missing, vec!["b"]);
    assert_eq!(report.signaled, vec!["a", "c"]);
    let probe = liveness::detect();
    assert!(!probe.is_alive(a).unwrap());
    assert!(!probe.is_alive(c).unwrap());

    // b lost its pid file but is still running
    assert!(probe.is_alive(b).unwrap());
    probe.wait_for_exit(b, SIGKILL, true).await.unwrap();
}

#[tokio::test]
async fn test_kill_twice_on_stopped_cluster() {
    let dir = tempfile::tempdir().unwrap();
    let supervisor = supervisor(topology(dir.path(), &["a", "b"]), Duration::ZERO);

    let first = supervisor.kill(SIGTERM).await;
    let second = supervisor.kill(SIGTERM).await;

    assert_ne!(first.exit_code(), 0);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_kill_after_exit_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let supervisor = supervisor(topology(dir.path(), &["a", "b"]), Duration::ZERO);
    supervisor.start_all().await.unwrap();

    assert_eq!(supervisor.kill(SIGTERM).await.exit_code(), 0);
    // pid files remain, processes are gone
    let report = supervisor.kill(SIGTERM).await;
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.signaled, vec!["a", "b"]);
}

#[tokio::test]
async fn test_status_tracks_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let mut nodes = topology(dir.path(), &["a", "b"]).nodes().to_vec();
    nodes.push(NodeDefinition::new(2, "c", dir.path().join("node_c")).unstarted());
    let supervisor = supervisor(Topology::new("testnet_", nodes).unwrap(), Duration::ZERO);

    let states = |s: &ClusterSupervisor| -> Vec<NodeState> {
        s.status().unwrap().into_iter().map(|n| n.state).collect()
    };
    assert_eq!(
        states(&supervisor),
        vec![NodeState::NotLaunched, NodeState::NotLaunched, NodeState::Unstarted]
    );

    supervisor.start_all().await.unwrap();
    assert_eq!(
        states(&supervisor),
        vec![NodeState::Running, NodeState::Running, NodeState::Unstarted]
    );

    supervisor.down(&["a"], false).await.unwrap();
    assert_eq!(
        states(&supervisor),
        vec![NodeState::Stopped, NodeState::Running, NodeState::Unstarted]
    );

    supervisor.kill(SIGKILL).await;
}
