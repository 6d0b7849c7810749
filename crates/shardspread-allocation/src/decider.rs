//! Awareness allocation decider
//!
//! The decider classifies nodes into groups by each configured awareness
//! attribute, counts how many copies of the shard sit in each group, and
//! denies a placement that would push the candidate's group past its fair
//! share `ceil(desired_copies / group_count)`. Forced values reserve a slot
//! in the denominator even while no live node reports them.
//!
//! The decision is a pure synchronous function over one snapshot and one
//! policy version; it takes no locks and caches nothing across calls, so
//! it is safe to invoke concurrently from every placement-evaluation task.

use crate::decision::{Decision, Explanation};
use crate::policy::AwarenessPolicy;
use crate::topology::{ClusterSnapshot, ShardCopy};
use shardspread_common::{Error, NodeId, Result, ShardId};
use std::collections::HashMap;
use std::sync::Arc;

/// One voter in the allocation pipeline.
///
/// The pipeline aggregates many deciders' verdicts elsewhere; each decider
/// only answers the two questions below for a single shard/node pair.
pub trait AllocationDecider {
    /// Evaluate a prospective placement: may this shard copy (currently
    /// `current`, or unassigned when `None`) be put on `candidate`?
    fn can_place(
        &self,
        shard: &ShardId,
        current: Option<&ShardCopy>,
        candidate: NodeId,
        cluster: &ClusterSnapshot,
    ) -> Result<Decision>;

    /// Validate an already-placed copy: may it remain on its current node?
    fn can_remain(&self, copy: &ShardCopy, cluster: &ClusterSnapshot) -> Result<Decision>;
}

/// Decider spreading shard copies evenly across awareness attribute groups
#[derive(Debug)]
pub struct AwarenessDecider {
    policy: Arc<AwarenessPolicy>,
}

impl AwarenessDecider {
    /// Create a decider reading the given policy
    #[must_use]
    pub fn new(policy: Arc<AwarenessPolicy>) -> Self {
        Self { policy }
    }

    /// The shared algorithm behind both trait operations. `move_to_node`
    /// selects whether the copy counts are adjusted for the hypothetical
    /// outcome of moving the copy onto `candidate`.
    fn under_capacity(
        &self,
        shard: &ShardId,
        current: Option<&ShardCopy>,
        candidate: NodeId,
        cluster: &ClusterSnapshot,
        move_to_node: bool,
    ) -> Result<Decision> {
        let config = self.policy.current();
        let explain = cluster.explain();

        if config.attributes.is_empty() {
            return Ok(explained(Decision::allow(), explain, || Explanation::Disabled));
        }

        let index = cluster
            .index(&shard.index)
            .ok_or_else(|| Error::IndexNotFound(shard.index.clone()))?;

        // Awareness balancing is meaningless when every node must hold a copy.
        if index.auto_expand_to_all {
            return Ok(explained(Decision::allow(), explain, || {
                Explanation::AutoExpandAll
            }));
        }

        let candidate_node = cluster
            .node(candidate)
            .ok_or_else(|| Error::NodeNotFound(candidate.to_string()))?;
        let desired_copies = index.desired_copies();

        for attribute in &config.attributes {
            // every participating node must declare every configured dimension
            let Some(candidate_value) = candidate_node.attribute(attribute) else {
                return Ok(explained(Decision::deny(), explain, || {
                    Explanation::MissingAttribute {
                        attribute: attribute.clone(),
                        configured: config.attributes.clone(),
                    }
                }));
            };

            let nodes_per_value = cluster.nodes_per_attribute(attribute);

            // Copies per attribute value for this shard. Relocation sources
            // are vacating and do not occupy their node; relocation targets
            // are the copy's future home and do.
            let mut copies_per_value: HashMap<&str, i64> = HashMap::new();
            for assigned in cluster.assigned_copies(shard) {
                if !assigned.state.occupies_node() {
                    continue;
                }
                let host = cluster
                    .node(assigned.node)
                    .ok_or_else(|| Error::NodeNotFound(assigned.node.to_string()))?;
                if let Some(value) = host.attribute(attribute) {
                    *copies_per_value.entry(value).or_insert(0) += 1;
                }
            }

            if move_to_node {
                match current {
                    Some(copy) => {
                        // A relocating source is charged to its target bucket,
                        // matching the occupancy counts above.
                        let origin = copy.future_node();
                        if origin != candidate {
                            let origin_node = cluster
                                .node(origin)
                                .ok_or_else(|| Error::NodeNotFound(origin.to_string()))?;
                            if let Some(value) = origin_node.attribute(attribute) {
                                *copies_per_value.entry(value).or_insert(0) -= 1;
                            }
                            *copies_per_value.entry(candidate_value).or_insert(0) += 1;
                        }
                    }
                    None => {
                        *copies_per_value.entry(candidate_value).or_insert(0) += 1;
                    }
                }
            }

            // A forced value with no copies reserves a slot in the
            // denominator even while no live node reports it.
            // TODO decide whether live values absent from the forced list
            // should still count as groups once forcing is configured.
            let forced_values = config.forced_values(attribute);
            let mut group_count = u32::try_from(nodes_per_value.len()).unwrap_or(u32::MAX);
            if let Some(forced) = forced_values {
                for value in forced {
                    if !copies_per_value.contains_key(value.as_str()) {
                        group_count += 1;
                    }
                }
            }

            let max_per_group = desired_copies.div_ceil(group_count);
            let current_for_value = copies_per_value
                .get(candidate_value)
                .copied()
                .unwrap_or(0)
                .max(0) as u32;

            if current_for_value > max_per_group {
                return Ok(explained(Decision::deny(), explain, || {
                    let mut live_values: Vec<String> =
                        nodes_per_value.keys().map(|v| (*v).to_string()).collect();
                    live_values.sort_unstable();
                    let forced_values = forced_values.map(|forced| {
                        let mut sorted = forced.to_vec();
                        sorted.sort_unstable();
                        sorted
                    });
                    Explanation::TooManyCopies {
                        desired_copies,
                        attribute: attribute.clone(),
                        node_value: candidate_value.to_string(),
                        group_count,
                        live_values,
                        forced_values,
                        max_per_group,
                        current_for_value,
                    }
                }));
            }
        }

        Ok(explained(Decision::allow(), explain, || {
            Explanation::AllRequirementsMet
        }))
    }
}

impl AllocationDecider for AwarenessDecider {
    fn can_place(
        &self,
        shard: &ShardId,
        current: Option<&ShardCopy>,
        candidate: NodeId,
        cluster: &ClusterSnapshot,
    ) -> Result<Decision> {
        self.under_capacity(shard, current, candidate, cluster, true)
    }

    fn can_remain(&self, copy: &ShardCopy, cluster: &ClusterSnapshot) -> Result<Decision> {
        self.under_capacity(&copy.shard, Some(copy), copy.node, cluster, false)
    }
}

/// Attach a lazily-built explanation only when one was requested; both
/// branches carry the identical verdict.
fn explained(
    decision: Decision,
    explain: bool,
    build: impl FnOnce() -> Explanation,
) -> Decision {
    if explain {
        decision.explained(build())
    } else {
        decision
    }
}
