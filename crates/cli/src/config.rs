//! Command-line configuration: flags (with env fallbacks) mapped onto the
//! supervisor and command-builder settings

use clap::Args;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use launcher_core::application::supervisor::constants::DEFAULT_SERVER_NAME;
use launcher_core::application::SupervisorConfig;
use launcher_core::domain::LaunchMode;
use launcher_infra_system::NodeosCommandConfig;

/// Where the topology lives and how its nodes are named on disk
#[derive(Args, Debug, Clone)]
pub struct TopologyArgs {
    /// JSON topology written by the topology generator
    #[arg(short, long, env = "LAUNCHER_TOPOLOGY")]
    pub topology: String,

    /// Base directory for relative node directories
    #[arg(short, long, env = "LAUNCHER_BASE_DIR")]
    pub base_dir: Option<String>,

    /// Server name; also names each node's pid file
    #[arg(long, env = "LAUNCHER_SERVER_NAME", default_value = DEFAULT_SERVER_NAME)]
    pub server_name: String,
}

impl TopologyArgs {
    pub fn topology_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.topology).into_owned())
    }

    pub fn base_dir(&self) -> Option<PathBuf> {
        self.base_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned()))
    }
}

/// How node command lines are constructed
#[derive(Args, Debug, Clone)]
pub struct NodeCommandArgs {
    /// Server binary
    #[arg(long, env = "LAUNCHER_NODE_BINARY", default_value = "nodeos")]
    pub node_binary: String,

    /// Binary for one node, as INDEX=PATH (repeatable)
    #[arg(long = "instance-binary", value_parser = parse_indexed)]
    pub instance_binaries: Vec<(usize, String)>,

    /// Pass --skip-transaction-signatures to every node
    #[arg(long)]
    pub skip_signature: bool,

    /// Argument forwarded to every node (repeatable)
    #[arg(long = "node-arg", allow_hyphen_values = true)]
    pub node_args: Vec<String>,

    /// Argument forwarded to one node, as INDEX=ARG (repeatable)
    #[arg(long = "specific-arg", value_parser = parse_indexed, allow_hyphen_values = true)]
    pub specific_args: Vec<(usize, String)>,

    /// Genesis timestamp passed to every node
    #[arg(long, env = "LAUNCHER_GENESIS_TIMESTAMP")]
    pub genesis_timestamp: Option<String>,
}

impl NodeCommandArgs {
    pub fn to_config(&self) -> NodeosCommandConfig {
        let mut specific_args: HashMap<usize, Vec<String>> = HashMap::new();
        for (index, arg) in &self.specific_args {
            specific_args.entry(*index).or_default().push(arg.clone());
        }

        NodeosCommandConfig {
            binary: shellexpand::tilde(&self.node_binary).into_owned(),
            instance_binaries: self
                .instance_binaries
                .iter()
                .map(|(index, path)| (*index, shellexpand::tilde(path).into_owned()))
                .collect(),
            skip_signature: self.skip_signature,
            extra_args: self.node_args.clone(),
            specific_args,
            genesis_timestamp: self.genesis_timestamp.clone(),
        }
    }
}

/// Parse `INDEX=VALUE`
pub fn parse_indexed(s: &str) -> Result<(usize, String), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=VALUE, got {s:?}"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid node index {index:?}: {e}"))?;
    Ok((index, value.to_string()))
}

pub fn supervisor_config(
    server_name: &str,
    launch_mode: LaunchMode,
    delay_secs: f64,
) -> anyhow::Result<SupervisorConfig> {
    let delay = Duration::try_from_secs_f64(delay_secs)
        .map_err(|e| anyhow::anyhow!("invalid delay {delay_secs}: {e}"))?;

    Ok(SupervisorConfig {
        launch_mode,
        delay,
        server_name: server_name.to_string(),
    })
}
