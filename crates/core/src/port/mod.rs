// Port Layer - Interfaces for OS-facing collaborators

pub mod command_builder;
pub mod liveness_probe;
pub mod node_launcher;
pub mod time_provider;

// Re-exports
pub use command_builder::CommandBuilder;
pub use liveness_probe::LivenessProbe;
pub use node_launcher::{LaunchOutcome, NodeLauncher};
pub use time_provider::{SystemTimeProvider, TimeProvider};
