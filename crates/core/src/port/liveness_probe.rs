// Liveness Probe Port
// Answers "is pid P alive?" and "block until pid P exits" without being P's parent

use async_trait::async_trait;

use crate::domain::{Pid, Signum};
use crate::error::Result;

/// Liveness probe trait
///
/// Implementations (infra-system):
/// - PidfdProbe: pidfd readiness, Linux only
/// - BackoffProbe: null-signal polling with capped exponential sleep, any POSIX host
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    /// Check whether `pid` refers to a live process
    ///
    /// "No such process" is `false`; "not permitted to signal" is `true`.
    ///
    /// # Errors
    /// - SupervisorError::Signal for any other failure of the null signal
    fn is_alive(&self, pid: Pid) -> Result<bool>;

    /// Send `signum` to `pid` and wait until the process is gone
    ///
    /// There is no timeout: the call returns only once `is_alive(pid)` is false.
    ///
    /// # Arguments
    /// * `pid` - Target process
    /// * `signum` - Signal to send (SIGTERM for a graceful stop)
    /// * `raise_if_missing` - Report an absent process as an error instead of a no-op
    ///
    /// # Errors
    /// - SupervisorError::ProcessNotFound if the process is absent and `raise_if_missing`
    /// - SupervisorError::Signal if the signal cannot be delivered
    async fn wait_for_exit(&self, pid: Pid, signum: Signum, raise_if_missing: bool)
        -> Result<()>;

    /// Short strategy name for logs
    fn strategy(&self) -> &'static str;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::SupervisorError;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// One recorded `wait_for_exit` call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SignalCall {
        pub pid: Pid,
        pub signum: Signum,
        pub raise_if_missing: bool,
    }

    /// In-memory process table
    ///
    /// `spawn` marks a pid alive; `wait_for_exit` removes it.
    #[derive(Default)]
    pub struct MockLivenessProbe {
        alive: Arc<Mutex<HashSet<Pid>>>,
        calls: Arc<Mutex<Vec<SignalCall>>>,
    }

    impl MockLivenessProbe {
        pub fn new() -> Self {
            Self::default()
        }
        pub fn spawn(&self, pid: Pid) {
            self.alive.lock().unwrap().insert(pid);
        }
        /// Simulate a process exiting on its own
        pub fn exit(&self, pid: Pid) {
            self.alive.lock().unwrap().remove(&pid);
        }
        pub fn calls(&self) -> Vec<SignalCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LivenessProbe for MockLivenessProbe {
        fn is_alive(&self, pid: Pid) -> Result<bool> {
            Ok(self.alive.lock().unwrap().contains(&pid))
        }
        async fn wait_for_exit(
            &self,
            pid: Pid,
            signum: Signum,
            raise_if_missing: bool,
        ) -> Result<()> {
            self.calls.lock().unwrap().push(SignalCall {
                pid,
                signum,
                raise_if_missing,
            });

            let was_alive = self.alive.lock().unwrap().remove(&pid);
            if !was_alive && raise_if_missing {
                return Err(SupervisorError::ProcessNotFound(pid));
            }
            Ok(())
        }
        fn strategy(&self) -> &'static str {
            "mock"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::*;
    use super::*;
    use crate::error::SupervisorError;

    #[test]
    fn test_mock_records_calls_and_removes_pid() {
        let probe = MockLivenessProbe::new();
        probe.spawn(42);

        tokio_test::block_on(probe.wait_for_exit(42, 15, true)).unwrap();

        assert!(!probe.is_alive(42).unwrap());
        assert_eq!(
            probe.calls(),
            vec![SignalCall {
                pid: 42,
                signum: 15,
                raise_if_missing: true
            }]
        );
    }

    #[test]
    fn test_mock_absent_pid() {
        let probe = MockLivenessProbe::new();

        tokio_test::assert_ok!(tokio_test::block_on(probe.wait_for_exit(7, 9, false)));
        let err = tokio_test::assert_err!(tokio_test::block_on(probe.wait_for_exit(7, 9, true)));
        assert!(matches!(err, SupervisorError::ProcessNotFound(7)));
    }
}
