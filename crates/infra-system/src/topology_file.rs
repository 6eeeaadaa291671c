// Topology files written by the topology generator
use std::fs;
use std::path::Path;
use tracing::info;

use launcher_core::domain::Topology;
use launcher_core::{Result, SupervisorError};

/// Load a JSON topology
///
/// Relative node directories are resolved against `base_dir` when given.
pub fn load_topology(path: &Path, base_dir: Option<&Path>) -> Result<Topology> {
    let content = fs::read_to_string(path).map_err(|e| SupervisorError::filesystem(path, e))?;
    let topology: Topology = serde_json::from_str(&content)?;

    let topology = match base_dir {
        Some(base) => topology.rebase(base)?,
        None => topology,
    };

    info!(
        path = %path.display(),
        network = %topology.name(),
        nodes = topology.len(),
        "Topology loaded"
    );
    Ok(topology)
}

/// Write a topology as pretty JSON
pub fn save_topology(topology: &Topology, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(topology)?;
    fs::write(path, json).map_err(|e| SupervisorError::filesystem(path, e))
}
