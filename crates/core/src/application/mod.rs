// Application Layer - Cluster-wide lifecycle operations

pub mod supervisor;

// Re-exports
pub use supervisor::{
    ClusterSupervisor, KillReport, NodeState, NodeStatus, SupervisorConfig, SIGKILL, SIGTERM,
};
