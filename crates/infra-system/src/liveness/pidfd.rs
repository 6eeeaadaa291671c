// pidfd probe (Linux >= 5.3)
// reason: a pidfd becomes readable when its process exits, so waiting needs no polling
use async_trait::async_trait;
use std::io;
use std::os::fd::{FromRawFd, OwnedFd, RawFd};
use tokio::io::unix::AsyncFd;
use tokio::io::Interest;
use tracing::debug;

use launcher_core::application::supervisor::constants::{BACKOFF_INITIAL_DELAY, BACKOFF_MAX_DELAY};
use launcher_core::domain::{Pid, Signum};
use launcher_core::port::LivenessProbe;
use launcher_core::{Result, SupervisorError};

use super::backoff::wait_until_gone;
use crate::signal::{self, Delivery};

fn pidfd_open(pid: Pid) -> io::Result<OwnedFd> {
    // SAFETY: pidfd_open(2) takes a pid and a flags word and returns a new descriptor or -1
    let fd = unsafe { libc::syscall(libc::SYS_pidfd_open, pid, 0 as libc::c_uint) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: the descriptor was just created by the kernel and is owned by nobody else
    Ok(unsafe { OwnedFd::from_raw_fd(fd as RawFd) })
}

/// Whether this kernel implements pidfd_open
pub(crate) fn is_supported() -> bool {
    match pidfd_open(std::process::id() as Pid) {
        Ok(_) => true,
        Err(e) => {
            debug!(error = %e, "pidfd_open unavailable");
            false
        }
    }
}

pub struct PidfdProbe;

impl PidfdProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PidfdProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LivenessProbe for PidfdProbe {
    fn is_alive(&self, pid: Pid) -> Result<bool> {
        signal::is_alive(pid)
    }

    async fn wait_for_exit(&self, pid: Pid, signum: Signum, raise_if_missing: bool) -> Result<()> {
        let fd = match pidfd_open(pid) {
            Ok(fd) => fd,
            Err(e) if e.raw_os_error() == Some(libc::ESRCH) => {
                if raise_if_missing {
                    return Err(SupervisorError::ProcessNotFound(pid));
                }
                debug!(pid, signum, "Process already gone");
                return Ok(());
            }
            Err(e) => {
                return Err(SupervisorError::Signal {
                    pid,
                    signum,
                    reason: format!("pidfd_open: {e}"),
                })
            }
        };

        // Register before signaling so the exit cannot be missed
        let exit = AsyncFd::with_interest(fd, Interest::READABLE).map_err(|e| {
            SupervisorError::Signal {
                pid,
                signum,
                reason: format!("pidfd registration: {e}"),
            }
        })?;

        if signal::send(pid, signum, raise_if_missing)? == Delivery::Missing {
            debug!(pid, signum, "Process exited before the signal");
        }

        let _ready = exit.readable().await.map_err(|e| SupervisorError::Signal {
            pid,
            signum,
            reason: format!("pidfd poll: {e}"),
        })?;

        // The pidfd also fires for zombies; the pid is gone only once reaped
        wait_until_gone(pid, BACKOFF_INITIAL_DELAY, BACKOFF_MAX_DELAY).await
    }

    fn strategy(&self) -> &'static str {
        "pidfd"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_self() {
        if !is_supported() {
            return;
        }
        assert!(pidfd_open(std::process::id() as Pid).is_ok());
        let err = pidfd_open(i32::MAX).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ESRCH));
    }

    #[tokio::test]
    async fn test_wait_for_exit_of_child() {
        if !is_supported() {
            return;
        }
        let mut child = tokio::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .unwrap();
        let pid = child.id().unwrap() as Pid;
        tokio::spawn(async move {
            let _ = child.wait().await;
        });

        let probe = PidfdProbe::new();
        probe.wait_for_exit(pid, 15, true).await.unwrap();

        assert!(!probe.is_alive(pid).unwrap());
    }

    #[tokio::test]
    async fn test_missing_process() {
        if !is_supported() {
            return;
        }
        let probe = PidfdProbe::new();

        assert!(probe.wait_for_exit(i32::MAX, 15, false).await.is_ok());
        assert!(matches!(
            probe.wait_for_exit(i32::MAX, 15, true).await,
            Err(SupervisorError::ProcessNotFound(_))
        ));
    }
}
