// nodeos command-line construction
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use launcher_core::domain::{DomainError, NodeDefinition};
use launcher_core::port::CommandBuilder;
use launcher_core::Result;

/// The bios node always gets a history query plugin
pub const BIOS_NODE_NAME: &str = "bios";
const BIOS_PLUGIN: &str = "eosio::trace_api_plugin";

/// How node command lines are put together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeosCommandConfig {
    /// Default server binary
    pub binary: String,
    /// Binary overrides keyed by node index
    #[serde(default)]
    pub instance_binaries: HashMap<usize, String>,
    #[serde(default)]
    pub skip_signature: bool,
    /// Arguments forwarded to every node
    #[serde(default)]
    pub extra_args: Vec<String>,
    /// Arguments forwarded to one node, keyed by node index
    #[serde(default)]
    pub specific_args: HashMap<usize, Vec<String>>,
    /// Value for `--genesis-timestamp`
    #[serde(default)]
    pub genesis_timestamp: Option<String>,
}

impl Default for NodeosCommandConfig {
    fn default() -> Self {
        Self {
            binary: "nodeos".to_string(),
            instance_binaries: HashMap::new(),
            skip_signature: false,
            extra_args: Vec::new(),
            specific_args: HashMap::new(),
            genesis_timestamp: None,
        }
    }
}

pub struct NodeosCommandBuilder {
    config: NodeosCommandConfig,
}

impl NodeosCommandBuilder {
    pub fn new(config: NodeosCommandConfig) -> Self {
        Self { config }
    }
}

impl CommandBuilder for NodeosCommandBuilder {
    fn build(&self, node: &NodeDefinition) -> Result<Vec<String>> {
        let binary = self
            .config
            .instance_binaries
            .get(&node.index)
            .unwrap_or(&self.config.binary);
        if binary.trim().is_empty() {
            return Err(DomainError::EmptyCommand(node.name.clone()).into());
        }

        let mut argv = vec![binary.clone()];
        if self.config.skip_signature {
            argv.push("--skip-transaction-signatures".to_string());
        }
        argv.extend(self.config.extra_args.iter().cloned());
        if let Some(specific) = self.config.specific_args.get(&node.index) {
            argv.extend(specific.iter().cloned());
        }
        argv.extend(node.extra_args.iter().cloned());

        let config_dir = node.config_dir();
        argv.push("--config-dir".to_string());
        argv.push(config_dir.display().to_string());
        argv.push("--data-dir".to_string());
        argv.push(node.data_dir.display().to_string());
        argv.push("--genesis-json".to_string());
        argv.push(config_dir.join("genesis.json").display().to_string());

        if let Some(timestamp) = &self.config.genesis_timestamp {
            argv.push("--genesis-timestamp".to_string());
            argv.push(timestamp.clone());
        }

        if node.name == BIOS_NODE_NAME {
            argv.push("--plugin".to_string());
            argv.push(BIOS_PLUGIN.to_string());
        }

        Ok(argv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launcher_core::SupervisorError;

    fn node(index: usize, name: &str) -> NodeDefinition {
        NodeDefinition::new(index, name, format!("/var/lib/node_{index:02}"))
            .with_config_dir(format!("/etc/eosio/node_{index:02}"))
    }

    #[test]
    fn test_minimal_command() {
        let builder = NodeosCommandBuilder::new(NodeosCommandConfig::default());

        let argv = builder.build(&node(1, "testnet_01")).unwrap();

        assert_eq!(
            argv,
            vec![
                "nodeos",
                "--config-dir",
                "/etc/eosio/node_01",
                "--data-dir",
                "/var/lib/node_01",
                "--genesis-json",
                "/etc/eosio/node_01/genesis.json",
            ]
        );
    }

    #[test]
    fn test_argument_order() {
        let config = NodeosCommandConfig {
            binary: "/usr/bin/nodeos".to_string(),
            instance_binaries: HashMap::from([(2, "/opt/old/nodeos".to_string())]),
            skip_signature: true,
            extra_args: vec!["--http-validate-host".into(), "false".into()],
            specific_args: HashMap::from([(2, vec!["--read-mode".into(), "head".into()])]),
            genesis_timestamp: Some("2020-01-01T00:00:00.000".to_string()),
        };
        let builder = NodeosCommandBuilder::new(config);
        let node = node(2, "testnet_02").with_extra_args(["--p2p-peer-address", "localhost:9876"]);

        let argv = builder.build(&node).unwrap();

        assert_eq!(argv[0], "/opt/old/nodeos");
        assert_eq!(argv[1], "--skip-transaction-signatures");
        assert_eq!(&argv[2..4], &["--http-validate-host", "false"]);
        assert_eq!(&argv[4..6], &["--read-mode", "head"]);
        assert_eq!(&argv[6..8], &["--p2p-peer-address", "localhost:9876"]);
        assert_eq!(argv[8], "--config-dir");
        assert_eq!(
            &argv[argv.len() - 2..],
            &["--genesis-timestamp", "2020-01-01T00:00:00.000"]
        );
    }

    #[test]
    fn test_bios_gets_trace_plugin() {
        let builder = NodeosCommandBuilder::new(NodeosCommandConfig::default());

        let argv = builder.build(&node(0, "bios")).unwrap();

        assert_eq!(&argv[argv.len() - 2..], &["--plugin", "eosio::trace_api_plugin"]);
        let other = builder.build(&node(1, "testnet_01")).unwrap();
        assert!(!other.contains(&"--plugin".to_string()));
    }

    #[test]
    fn test_empty_binary_rejected() {
        let builder = NodeosCommandBuilder::new(NodeosCommandConfig {
            binary: " ".to_string(),
            ..Default::default()
        });

        let err = builder.build(&node(0, "bios")).unwrap_err();
        assert!(matches!(
            err,
            SupervisorError::Domain(DomainError::EmptyCommand(_))
        ));
    }
}
