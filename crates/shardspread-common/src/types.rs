//! Core type definitions for Shardspread
//!
//! This module defines the fundamental identifiers used throughout the
//! allocation engine: node and shard identities plus the lifecycle state
//! of a shard copy.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a cluster node
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, From, Into)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a new random node ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a logical shard: the owning index plus the shard number.
///
/// A shard has one primary copy and a configured number of replica copies;
/// the desired total copy count is `replicas + 1`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShardId {
    /// Name of the owning index
    pub index: String,
    /// Shard number within the index
    pub shard: u32,
}

impl ShardId {
    /// Create a new shard identity
    #[must_use]
    pub fn new(index: impl Into<String>, shard: u32) -> Self {
        Self {
            index: index.into(),
            shard,
        }
    }
}

impl fmt::Debug for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShardId([{}][{}])", self.index, self.shard)
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][{}]", self.index, self.shard)
    }
}

/// Lifecycle state of one shard copy on a node.
///
/// During relocation both a source and a target record exist transiently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyState {
    /// Copy is active and serving
    Started,
    /// Copy is being built on its node
    Initializing,
    /// Copy is moving away from this node
    RelocatingSource,
    /// Copy is moving onto this node
    RelocatingTarget,
}

impl CopyState {
    /// Whether a copy in this state occupies its node for awareness
    /// accounting. A relocating source is vacating and does not count;
    /// a relocating target is the copy's future home and does.
    #[must_use]
    pub const fn occupies_node(self) -> bool {
        !matches!(self, Self::RelocatingSource)
    }
}
