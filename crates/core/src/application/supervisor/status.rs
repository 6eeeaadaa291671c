// Node status, re-derived from the pid file and the liveness probe

use serde::Serialize;

use crate::domain::Pid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeState {
    Running,
    /// Pid file present, process gone
    Stopped,
    /// No pid file yet
    NotLaunched,
    /// `dont_start` node without a pid file
    Unstarted,
}

impl std::fmt::Display for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeState::Running => write!(f, "RUNNING"),
            NodeState::Stopped => write!(f, "STOPPED"),
            NodeState::NotLaunched => write!(f, "NOT_LAUNCHED"),
            NodeState::Unstarted => write!(f, "UNSTARTED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStatus {
    pub name: String,
    pub pid: Option<Pid>,
    pub state: NodeState,
}

/// Outcome of a whole-cluster `kill` sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillReport {
    /// Nodes whose process was signaled and confirmed gone (or already gone)
    pub signaled: Vec<String>,
    /// Nodes without a pid file
    pub missing: Vec<String>,
    /// Nodes where signaling failed, with the error text
    pub failed: Vec<(String, String)>,
}

impl KillReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }

    /// 0 on full success, non-zero if any node could not be handled
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            super::constants::EXIT_MISSING_RECORD
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code() {
        let mut report = KillReport::default();
        assert_eq!(report.exit_code(), 0);

        report.signaled.push("a".to_string());
        assert_eq!(report.exit_code(), 0);

        report.missing.push("b".to_string());
        assert_eq!(report.exit_code(), 1);

        let report = KillReport {
            failed: vec![("c".to_string(), "boom".to_string())],
            ..Default::default()
        };
        assert_ne!(report.exit_code(), 0);
    }
}
