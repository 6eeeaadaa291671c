// Testnet Launcher Core - Domain Logic & Ports
// NO process or signal handling here: OS access goes through the ports

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{Result, SupervisorError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
