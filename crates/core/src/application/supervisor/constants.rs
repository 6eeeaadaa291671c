// Supervisor constants (No magic values)
use std::time::Duration;

use crate::domain::Signum;

/// Graceful termination signal used by `down` and `bounce`
pub const SIGTERM: Signum = 15;

/// Forceful termination, for escalating a `kill` sweep
pub const SIGKILL: Signum = 9;

/// First sleep of the liveness polling loop (100 µs)
pub const BACKOFF_INITIAL_DELAY: Duration = Duration::from_micros(100);

/// Ceiling for the doubling sleep of the liveness polling loop (40 ms)
pub const BACKOFF_MAX_DELAY: Duration = Duration::from_millis(40);

/// Server binary name; also names the pid file (`<server_name>.pid`)
pub const DEFAULT_SERVER_NAME: &str = "nodeos";

/// Exit code of a `kill` sweep that found at least one node without a pid file
pub const EXIT_MISSING_RECORD: i32 = 1;
