//! Shardspread Allocation - awareness-based placement decisions
//!
//! This crate implements the awareness allocation decider: given a shard
//! copy and a candidate node, it decides whether placing (or keeping) that
//! copy on that node keeps copies spread evenly across topological
//! "awareness" attributes (rack, zone, ...) that nodes advertise.
//!
//! Enabling awareness for an attribute:
//!
//! ```text
//! cluster.routing.allocation.awareness.attributes: rack_id
//! ```
//!
//! spreads copies so that no rack holds more than its fair share. Forcing
//! a value to count as a group even while no node reports it:
//!
//! ```text
//! cluster.routing.allocation.awareness.force.zone.values: zone1,zone2
//! ```
//!
//! prevents over-allocation on `zone1` while `zone2` is entirely down.
//!
//! # Example
//! ```ignore
//! use shardspread_allocation::{AllocationDecider, AwarenessDecider, AwarenessPolicy};
//!
//! let policy = AwarenessPolicy::from_settings(&settings);
//! let decider = AwarenessDecider::new(policy);
//! let decision = decider.can_place(&copy, candidate, &snapshot)?;
//! ```

pub mod decider;
pub mod decision;
pub mod policy;
pub mod topology;

pub use decider::{AllocationDecider, AwarenessDecider};
pub use decision::{Decision, Explanation, Verdict};
pub use policy::{AwarenessConfig, AwarenessPolicy};
pub use topology::{ClusterSnapshot, IndexMetadata, NodeDescriptor, ShardCopy};
