// Testnet Launcher Infrastructure - System Adapters
// Implements: LivenessProbe, NodeLauncher, CommandBuilder

#[cfg(not(unix))]
compile_error!("launcher-infra-system supports Unix hosts only");

pub mod liveness;
pub mod nodeos_command;
pub mod process_launcher;
pub mod signal;
pub mod topology_file;

pub use liveness::BackoffProbe;
#[cfg(target_os = "linux")]
pub use liveness::PidfdProbe;
pub use nodeos_command::{NodeosCommandBuilder, NodeosCommandConfig};
pub use process_launcher::ProcessLauncher;
pub use topology_file::{load_topology, save_topology};
