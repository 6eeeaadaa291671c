// Liveness probe strategies and capability detection

mod backoff;
#[cfg(target_os = "linux")]
mod pidfd;

pub use backoff::BackoffProbe;
#[cfg(target_os = "linux")]
pub use pidfd::PidfdProbe;

use std::sync::Arc;
use tracing::info;

use launcher_core::port::LivenessProbe;

/// Pick the best probe for this host
///
/// pidfd readiness where the kernel offers `pidfd_open` (Linux >= 5.3),
/// capped-backoff polling everywhere else.
pub fn detect() -> Arc<dyn LivenessProbe> {
    #[cfg(target_os = "linux")]
    {
        if pidfd::is_supported() {
            info!(strategy = "pidfd", "Liveness probe selected");
            return Arc::new(PidfdProbe::new());
        }
    }

    info!(strategy = "backoff", "Liveness probe selected");
    Arc::new(BackoffProbe::new())
}
