// Signal delivery and null-signal liveness checks
// reason: nix for typed kill(2) and errno handling
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid as NixPid;

use launcher_core::domain::{Pid, Signum};
use launcher_core::{Result, SupervisorError};

/// Result of sending a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The process did not exist and the caller tolerates that
    Missing,
}

fn target(pid: Pid, signum: Signum) -> Result<NixPid> {
    // kill(2) with pid <= 0 addresses process groups
    if pid <= 0 {
        return Err(SupervisorError::Signal {
            pid,
            signum,
            reason: "pid must be positive".to_string(),
        });
    }
    Ok(NixPid::from_raw(pid))
}

/// Null signal: ESRCH means gone, EPERM means alive but not ours
pub fn is_alive(pid: Pid) -> Result<bool> {
    match kill(target(pid, 0)?, None::<Signal>) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(Errno::EPERM) => Ok(true),
        Err(e) => Err(SupervisorError::Signal {
            pid,
            signum: 0,
            reason: e.to_string(),
        }),
    }
}

/// Send `signum` (0 for the null signal) to `pid`
///
/// # Errors
/// - ProcessNotFound if the process is gone and `raise_if_missing`
/// - Signal for an invalid signal number or any other kill(2) failure
pub fn send(pid: Pid, signum: Signum, raise_if_missing: bool) -> Result<Delivery> {
    let nix_pid = target(pid, signum)?;
    let signal = if signum == 0 {
        None
    } else {
        Some(
            Signal::try_from(signum).map_err(|e| SupervisorError::Signal {
                pid,
                signum,
                reason: format!("invalid signal: {e}"),
            })?,
        )
    };

    match kill(nix_pid, signal) {
        Ok(()) => Ok(Delivery::Delivered),
        Err(Errno::ESRCH) if raise_if_missing => Err(SupervisorError::ProcessNotFound(pid)),
        Err(Errno::ESRCH) => Ok(Delivery::Missing),
        Err(e) => Err(SupervisorError::Signal {
            pid,
            signum,
            reason: e.to_string(),
        }),
    }
}
