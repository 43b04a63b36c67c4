//! File-backed cluster snapshot.
//!
//! The expected YAML structure is:
//! ```yaml
//! nodes:
//!   node-a:
//!     allocatable_memory: 8589934592
//!   node-b:
//!     allocatable_memory: 4294967296
//! pods:
//!   - name: worker-0
//!     labels:
//!       podGroup: g1
//!       minAvailable: "3"
//!   - name: web-0
//! ```
//!
//! Nodes are keyed by name; pods keep file order so that group membership
//! listings are reproducible.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use super::{InventoryError, NodeInventory, PodGroupIndex};
use crate::pod::Pod;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    nodes: BTreeMap<String, NodeEntry>,
    #[serde(default)]
    pods: Vec<Pod>,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    /// Allocatable memory in bytes.
    allocatable_memory: u64,
}

// ── ClusterSnapshot ───────────────────────────────────────────────────────────

/// In-memory node inventory and pod group index loaded from YAML.
///
/// `BTreeMap` (not `HashMap`) so [`node_names`](Self::node_names) is always
/// sorted, which keeps candidate order deterministic across runs.
#[derive(Debug, Default)]
pub struct ClusterSnapshot {
    /// node name → allocatable memory (bytes).
    nodes: BTreeMap<String, u64>,

    /// All pods, in file order.
    pods: Vec<Pod>,

    /// Set to `true` after a successful load.
    loaded: bool,
}

impl ClusterSnapshot {
    /// Creates a new, empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `path` and replaces the current contents.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or if the YAML is
    /// structurally invalid.  On error the snapshot is left empty.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading cluster snapshot from: {}", path.display());

        self.nodes.clear();
        self.pods.clear();
        self.loaded = false;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open cluster snapshot: {}", path.display()))?;

        self.load_from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))
    }

    /// Parses a YAML document and replaces the current contents.
    pub fn load_from_str(&mut self, content: &str) -> Result<()> {
        self.nodes.clear();
        self.pods.clear();
        self.loaded = false;

        let file: SnapshotFile = serde_yaml::from_str(content)?;

        for (name, entry) in file.nodes {
            debug!(node = %name, allocatable_memory = entry.allocatable_memory, "node loaded");
            self.nodes.insert(name, entry.allocatable_memory);
        }
        for pod in &file.pods {
            debug!(pod = %pod.name, labels = ?pod.labels, "pod loaded");
        }
        self.pods = file.pods;
        self.loaded = true;

        info!(
            nodes = self.nodes.len(),
            pods = self.pods.len(),
            "cluster snapshot loaded"
        );
        Ok(())
    }

    /// Returns `true` after a successful load.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Candidate node names, sorted.
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// All pods, in file order.
    pub fn pods(&self) -> &[Pod] {
        &self.pods
    }

    /// Looks up a pod by name.
    pub fn get_pod(&self, name: &str) -> Option<&Pod> {
        self.pods.iter().find(|p| p.name == name)
    }
}

impl NodeInventory for ClusterSnapshot {
    fn allocatable_memory(&self, node: &str) -> Result<u64, InventoryError> {
        self.nodes
            .get(node)
            .copied()
            .ok_or_else(|| InventoryError::NodeNotFound {
                node: node.to_string(),
            })
    }
}

impl PodGroupIndex for ClusterSnapshot {
    /// Label-selector match on `podGroup == group`.
    fn list_members(&self, group: &str) -> Result<Vec<String>, InventoryError> {
        Ok(self
            .pods
            .iter()
            .filter(|p| p.group_name() == Some(group))
            .map(|p| p.name.clone())
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const CLUSTER: &str = r#"
nodes:
  node-b:
    allocatable_memory: 4096
  node-a:
    allocatable_memory: 8192
pods:
  - name: worker-0
    labels:
      podGroup: g1
      minAvailable: "3"
  - name: web-0
  - name: worker-1
    labels:
      podGroup: g1
      minAvailable: "3"
  - name: batch-0
    labels:
      podGroup: g2
      minAvailable: "1"
"#;

    #[test]
    fn load_example_yaml() {
        let f = yaml_tempfile(CLUSTER);
        let mut snap = ClusterSnapshot::new();
        snap.load_from_file(f.path()).unwrap();

        assert!(snap.is_loaded());
        assert_eq!(snap.node_names(), vec!["node-a", "node-b"]);
        assert_eq!(snap.pods().len(), 4);
        assert_eq!(snap.allocatable_memory("node-a").unwrap(), 8192);
        assert_eq!(snap.allocatable_memory("node-b").unwrap(), 4096);
        assert_eq!(snap.get_pod("worker-1").unwrap().group_name(), Some("g1"));
    }

    #[test]
    fn unknown_node_is_not_found() {
        let mut snap = ClusterSnapshot::new();
        snap.load_from_str(CLUSTER).unwrap();
        assert_eq!(
            snap.allocatable_memory("node-z"),
            Err(InventoryError::NodeNotFound {
                node: "node-z".to_string()
            })
        );
    }

    #[test]
    fn list_members_selects_by_group_label_in_file_order() {
        let mut snap = ClusterSnapshot::new();
        snap.load_from_str(CLUSTER).unwrap();

        assert_eq!(snap.list_members("g1").unwrap(), vec!["worker-0", "worker-1"]);
        assert_eq!(snap.list_members("g2").unwrap(), vec!["batch-0"]);
        assert!(snap.list_members("nope").unwrap().is_empty());
    }

    #[test]
    fn sections_are_optional() {
        let mut snap = ClusterSnapshot::new();
        snap.load_from_str("nodes:\n  n1:\n    allocatable_memory: 1\n")
            .unwrap();
        assert!(snap.is_loaded());
        assert!(snap.pods().is_empty());
    }

    #[test]
    fn missing_file_returns_error() {
        let mut snap = ClusterSnapshot::new();
        let result = snap.load_from_file(Path::new("/nonexistent/path/cluster.yaml"));
        assert!(result.is_err());
        assert!(!snap.is_loaded());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        let mut snap = ClusterSnapshot::new();
        let result = snap.load_from_file(f.path());
        assert!(result.is_err());
        assert!(!snap.is_loaded());
    }

    #[test]
    fn negative_memory_is_rejected() {
        let mut snap = ClusterSnapshot::new();
        let result = snap.load_from_str("nodes:\n  n1:\n    allocatable_memory: -5\n");
        assert!(result.is_err());
    }

    #[test]
    fn reload_replaces_previous_contents() {
        let mut snap = ClusterSnapshot::new();
        snap.load_from_str(CLUSTER).unwrap();
        snap.load_from_str("nodes:\n  n2:\n    allocatable_memory: 7\n")
            .unwrap();

        assert_eq!(snap.node_names(), vec!["n2"]);
        assert!(snap.pods().is_empty(), "old pods must be gone");
        assert!(snap.allocatable_memory("node-a").is_err());
    }
}
