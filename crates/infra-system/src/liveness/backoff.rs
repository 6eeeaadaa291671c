// Backoff probe: signal, then poll the null signal with doubling sleeps
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use launcher_core::application::supervisor::constants::{BACKOFF_INITIAL_DELAY, BACKOFF_MAX_DELAY};
use launcher_core::domain::{Pid, Signum};
use launcher_core::port::LivenessProbe;
use launcher_core::Result;

use crate::signal::{self, Delivery};

/// Portable probe for any POSIX host
///
/// Sleeps 100 µs after the first check, doubling up to 40 ms, until the pid is gone.
pub struct BackoffProbe {
    initial_delay: Duration,
    max_delay: Duration,
}

impl BackoffProbe {
    pub fn new() -> Self {
        Self::with_delays(BACKOFF_INITIAL_DELAY, BACKOFF_MAX_DELAY)
    }

    pub fn with_delays(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
        }
    }
}

impl Default for BackoffProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn next_delay(delay: Duration, max_delay: Duration) -> Duration {
    (delay * 2).min(max_delay)
}

/// Poll until `pid` no longer exists
pub(crate) async fn wait_until_gone(
    pid: Pid,
    initial_delay: Duration,
    max_delay: Duration,
) -> Result<()> {
    let mut delay = initial_delay;
    let mut polls: u32 = 0;

    while signal::is_alive(pid)? {
        tokio::time::sleep(delay).await;
        delay = next_delay(delay, max_delay);
        polls += 1;
    }

    debug!(pid, polls, "Process confirmed gone");
    Ok(())
}

#[async_trait]
impl LivenessProbe for BackoffProbe {
    fn is_alive(&self, pid: Pid) -> Result<bool> {
        signal::is_alive(pid)
    }

    async fn wait_for_exit(&self, pid: Pid, signum: Signum, raise_if_missing: bool) -> Result<()> {
        if signal::send(pid, signum, raise_if_missing)? == Delivery::Missing {
            debug!(pid, signum, "Process already gone");
            return Ok(());
        }

        wait_until_gone(pid, self.initial_delay, self.max_delay).await
    }

    fn strategy(&self) -> &'static str {
        "backoff"
    }
}
