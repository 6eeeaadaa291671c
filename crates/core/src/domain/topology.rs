// Topology: the ordered set of nodes for one test run

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::error::{DomainError, Result};
use super::node::NodeDefinition;

/// Validated topology
///
/// Node order is definition order and is the iteration order for every
/// cluster-wide operation. Names and data directories are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopologyDocument", into = "TopologyDocument")]
pub struct Topology {
    name: String,
    nodes: Vec<NodeDefinition>,
}

/// Unvalidated on-disk shape of a topology
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TopologyDocument {
    #[serde(default)]
    name: String,
    nodes: Vec<NodeDefinition>,
}

impl Topology {
    pub fn new(name: impl Into<String>, nodes: Vec<NodeDefinition>) -> Result<Self> {
        let mut names = HashSet::new();
        let mut data_dirs = HashSet::new();

        for node in &nodes {
            if node.name.is_empty() {
                return Err(DomainError::ValidationError(
                    "node name must not be empty".to_string(),
                ));
            }
            if !names.insert(node.name.as_str()) {
                return Err(DomainError::DuplicateNodeName(node.name.clone()));
            }
            if !data_dirs.insert(node.data_dir.as_path()) {
                return Err(DomainError::DuplicateDataDir(node.data_dir.clone()));
            }
        }

        Ok(Self {
            name: name.into(),
            nodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[NodeDefinition] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `name` designates `node`: the full node name, or the suffix
    /// after the network name (`01` for `testnet_01`)
    fn designates(&self, node: &NodeDefinition, name: &str) -> bool {
        node.name == name || node.name.strip_prefix(self.name.as_str()) == Some(name)
    }

    /// Lookup by full name or network-relative suffix
    pub fn find(&self, name: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|node| self.designates(node, name))
    }

    /// Nodes designated by any of `names`, in definition order
    pub fn select<'a, S: AsRef<str>>(
        &'a self,
        names: &'a [S],
    ) -> impl Iterator<Item = &'a NodeDefinition> + 'a {
        self.nodes
            .iter()
            .filter(move |node| names.iter().any(|n| self.designates(node, n.as_ref())))
    }

    /// Resolve relative data/config directories against `base`
    pub fn rebase(self, base: &Path) -> Result<Self> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|mut node| {
                if node.data_dir.is_relative() {
                    node.data_dir = base.join(&node.data_dir);
                }
                if let Some(dir) = node.config_dir.take() {
                    node.config_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
                }
                node
            })
            .collect();

        Self::new(self.name, nodes)
    }
}

impl TryFrom<TopologyDocument> for Topology {
    type Error = DomainError;

    fn try_from(doc: TopologyDocument) -> Result<Self> {
        Topology::new(doc.name, doc.nodes)
    }
}

impl From<Topology> for TopologyDocument {
    fn from(topology: Topology) -> Self {
        Self {
            name: topology.name,
            nodes: topology.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn three_nodes() -> Vec<NodeDefinition> {
        vec![
            NodeDefinition::new(0, "a", "/tmp/net/a"),
            NodeDefinition::new(1, "b", "/tmp/net/b"),
            NodeDefinition::new(2, "c", "/tmp/net/c"),
        ]
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let mut nodes = three_nodes();
        nodes[2].name = "a".to_string();

        let result = Topology::new("testnet_", nodes);
        assert!(matches!(result, Err(DomainError::DuplicateNodeName(n)) if n == "a"));
    }

    #[test]
    fn test_rejects_shared_data_dir() {
        let mut nodes = three_nodes();
        nodes[1].data_dir = PathBuf::from("/tmp/net/a");

        let result = Topology::new("testnet_", nodes);
        assert!(matches!(result, Err(DomainError::DuplicateDataDir(_))));
    }

    #[test]
    fn test_select_keeps_definition_order() {
        let topology = Topology::new("testnet_", three_nodes()).unwrap();

        let selected: Vec<&str> = topology
            .select(&["c", "a", "missing"])
            .map(|n| n.name.as_str())
            .collect();

        assert_eq!(selected, vec!["a", "c"]);
    }

    #[test]
    fn test_select_is_exact_match() {
        let topology = Topology::new("testnet_", three_nodes()).unwrap();
        assert_eq!(topology.select(&["A", "b "]).count(), 0);
    }

    #[test]
    fn test_select_by_network_suffix() {
        let nodes = vec![
            NodeDefinition::new(0, "bios", "/tmp/net/bios"),
            NodeDefinition::new(1, "testnet_00", "/tmp/net/00"),
            NodeDefinition::new(2, "testnet_01", "/tmp/net/01"),
        ];
        let topology = Topology::new("testnet_", nodes).unwrap();

        let selected: Vec<&str> = topology
            .select(&["01", "bios", "testnet_00"])
            .map(|n| n.name.as_str())
            .collect();

        assert_eq!(selected, vec!["bios", "testnet_00", "testnet_01"]);
        assert_eq!(topology.find("00").unwrap().name, "testnet_00");
        assert!(topology.find("02").is_none());
        assert!(topology.find("_01").is_none());
    }

    #[test]
    fn test_rebase_only_touches_relative_dirs() {
        let nodes = vec![
            NodeDefinition::new(0, "a", "var/lib/a").with_config_dir("etc/a"),
            NodeDefinition::new(1, "b", "/abs/b"),
        ];
        let topology = Topology::new("t", nodes)
            .unwrap()
            .rebase(Path::new("/base"))
            .unwrap();

        assert_eq!(topology.nodes()[0].data_dir, PathBuf::from("/base/var/lib/a"));
        assert_eq!(topology.nodes()[0].config_dir(), Path::new("/base/etc/a"));
        assert_eq!(topology.nodes()[1].data_dir, PathBuf::from("/abs/b"));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = serde_json::json!({
            "name": "testnet_",
            "nodes": [
                {"name": "a", "data_dir": "/x"},
                {"name": "a", "data_dir": "/y"}
            ]
        });

        assert!(serde_json::from_value::<Topology>(json).is_err());
    }
}
