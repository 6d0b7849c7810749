//! Cluster snapshot consumed by allocation deciders
//!
//! A [`ClusterSnapshot`] is a read-only point-in-time view of node
//! membership, index metadata, and shard-copy assignments. The surrounding
//! cluster-state module builds one per rebalancing pass; deciders derive
//! their counts fresh from it on every call and never cache across calls,
//! because the live topology changes continuously underneath.

use serde::{Deserialize, Serialize};
use shardspread_common::{CopyState, NodeId, ShardId};
use std::collections::HashMap;

/// A cluster node with its advertised awareness attributes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Node unique identifier
    pub id: NodeId,
    /// Human-readable name
    pub name: String,
    /// Awareness attribute key/value pairs (e.g. `zone -> z1`);
    /// immutable for the lifetime of the node's membership
    pub attributes: HashMap<String, String>,
}

impl NodeDescriptor {
    /// Create a node descriptor from `(attribute, value)` pairs
    pub fn new<K, V, I>(id: NodeId, name: impl Into<String>, attributes: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            id,
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The node's value for an awareness attribute, if declared
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Index-level metadata the decider consults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Index name
    pub name: String,
    /// Configured replica count (copies beyond the primary)
    pub replicas: u32,
    /// Whether the index auto-expands its replica count to cover every
    /// node in the cluster
    pub auto_expand_to_all: bool,
}

impl IndexMetadata {
    /// Create index metadata with a fixed replica count
    #[must_use]
    pub fn new(name: impl Into<String>, replicas: u32) -> Self {
        Self {
            name: name.into(),
            replicas,
            auto_expand_to_all: false,
        }
    }

    /// Desired total copy count: one primary plus the replicas
    #[must_use]
    pub const fn desired_copies(&self) -> u32 {
        self.replicas + 1
    }
}

/// One shard copy resident on (or moving between) nodes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShardCopy {
    /// Identity of the logical shard
    pub shard: ShardId,
    /// Node currently hosting this copy record
    pub node: NodeId,
    /// Lifecycle state
    pub state: CopyState,
    /// For a relocating source, the node the copy is moving to
    pub relocation_target: Option<NodeId>,
}

impl ShardCopy {
    /// A settled copy in the given state
    #[must_use]
    pub const fn new(shard: ShardId, node: NodeId, state: CopyState) -> Self {
        Self {
            shard,
            node,
            state,
            relocation_target: None,
        }
    }

    /// A copy relocating from `source` to `target`
    #[must_use]
    pub const fn relocating(shard: ShardId, source: NodeId, target: NodeId) -> Self {
        Self {
            shard,
            node: source,
            state: CopyState::RelocatingSource,
            relocation_target: Some(target),
        }
    }

    /// The node whose attribute bucket this copy is charged to: a vacating
    /// source is charged to its relocation target, every other state to its
    /// current host.
    #[must_use]
    pub fn future_node(&self) -> NodeId {
        match self.state {
            CopyState::RelocatingSource => self.relocation_target.unwrap_or(self.node),
            _ => self.node,
        }
    }
}

/// Read-only view of the cluster, valid for the duration of one
/// rebalancing pass.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    nodes: HashMap<NodeId, NodeDescriptor>,
    indices: HashMap<String, IndexMetadata>,
    assignments: HashMap<ShardId, Vec<ShardCopy>>,
    explain: bool,
}

impl ClusterSnapshot {
    /// Create an empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request explanations on decisions rendered against this snapshot
    #[must_use]
    pub fn with_explanations(mut self) -> Self {
        self.explain = true;
        self
    }

    /// Whether decisions should carry explanations
    #[must_use]
    pub const fn explain(&self) -> bool {
        self.explain
    }

    /// Add or replace a node
    pub fn upsert_node(&mut self, node: NodeDescriptor) {
        self.nodes.insert(node.id, node);
    }

    /// Add or replace index metadata
    pub fn put_index(&mut self, index: IndexMetadata) {
        self.indices.insert(index.name.clone(), index);
    }

    /// Record a shard-copy assignment
    pub fn add_copy(&mut self, copy: ShardCopy) {
        self.assignments.entry(copy.shard.clone()).or_default().push(copy);
    }

    /// Look up a node by ID
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeDescriptor> {
        self.nodes.get(&id)
    }

    /// Look up index metadata by name
    #[must_use]
    pub fn index(&self, name: &str) -> Option<&IndexMetadata> {
        self.indices.get(name)
    }

    /// All copy records currently assigned for a shard. Empty when the
    /// shard is not placed anywhere yet.
    #[must_use]
    pub fn assigned_copies(&self, shard: &ShardId) -> &[ShardCopy] {
        self.assignments.get(shard).map_or(&[], Vec::as_slice)
    }

    /// Count distinct live nodes per value of an awareness attribute.
    /// A node is one vote regardless of how many copies it hosts; nodes
    /// not declaring the attribute are skipped.
    #[must_use]
    pub fn nodes_per_attribute(&self, attribute: &str) -> HashMap<&str, u32> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for node in self.nodes.values() {
            if let Some(value) = node.attribute(attribute) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_per_attribute_counts_nodes_once() {
        let mut snapshot = ClusterSnapshot::new();
        snapshot.upsert_node(NodeDescriptor::new(NodeId::new(), "n1", [("zone", "z1")]));
        snapshot.upsert_node(NodeDescriptor::new(NodeId::new(), "n2", [("zone", "z1")]));
        snapshot.upsert_node(NodeDescriptor::new(NodeId::new(), "n3", [("zone", "z2")]));
        // no zone attribute at all
        snapshot.upsert_node(NodeDescriptor::new(
            NodeId::new(),
            "n4",
            std::iter::empty::<(&str, &str)>(),
        ));

        let counts = snapshot.nodes_per_attribute("zone");
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["z1"], 2);
        assert_eq!(counts["z2"], 1);
    }

    #[test]
    fn test_assigned_copies_empty_for_unplaced_shard() {
        let snapshot = ClusterSnapshot::new();
        let shard = ShardId::new("logs", 0);
        assert!(snapshot.assigned_copies(&shard).is_empty());
    }

    #[test]
    fn test_future_node_of_relocating_source() {
        let source = NodeId::new();
        let target = NodeId::new();
        let copy = ShardCopy::relocating(ShardId::new("logs", 0), source, target);
        assert_eq!(copy.future_node(), target);

        let settled = ShardCopy::new(ShardId::new("logs", 0), source, CopyState::Started);
        assert_eq!(settled.future_node(), source);
    }

    #[test]
    fn test_desired_copies() {
        let index = IndexMetadata::new("logs", 2);
        assert_eq!(index.desired_copies(), 3);
    }
}
