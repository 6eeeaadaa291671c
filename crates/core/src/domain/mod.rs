// Domain Layer - Nodes, topology and the persisted process state

pub mod artifacts;
pub mod error;
pub mod node;
pub mod process_record;
pub mod topology;

// Re-exports
pub use artifacts::{launch_stamp, NodeArtifacts};
pub use error::DomainError;
pub use node::{LaunchMode, NodeDefinition, Pid, Signum};
pub use process_record::ProcessRecord;
pub use topology::Topology;
