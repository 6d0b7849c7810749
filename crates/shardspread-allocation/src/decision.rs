//! Decision and explanation types
//!
//! A decider renders an allow/deny verdict for one shard/node pair. The
//! explanation is structured so tooling can inspect the inputs that
//! produced the verdict instead of parsing a message string; it is only
//! populated when the caller asked for explanations, so the hot path
//! skips the allocation and formatting cost entirely.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the awareness allocation rule, reported on every decision.
pub const AWARENESS_RULE: &str = "awareness";

/// The verdict a decider renders for a shard/node pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Placement is permitted
    Allow,
    /// Placement would violate the awareness constraints
    Deny,
}

/// An immutable allocation decision
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// The verdict
    pub verdict: Verdict,
    /// Name of the rule that produced this decision
    pub rule: &'static str,
    /// Diagnostic context, present only when explanations were requested
    pub explanation: Option<Explanation>,
}

impl Decision {
    /// An ALLOW decision with no explanation
    #[must_use]
    pub const fn allow() -> Self {
        Self {
            verdict: Verdict::Allow,
            rule: AWARENESS_RULE,
            explanation: None,
        }
    }

    /// A DENY decision with no explanation
    #[must_use]
    pub const fn deny() -> Self {
        Self {
            verdict: Verdict::Deny,
            rule: AWARENESS_RULE,
            explanation: None,
        }
    }

    /// Attach an explanation
    #[must_use]
    pub fn explained(mut self, explanation: Explanation) -> Self {
        self.explanation = Some(explanation);
        self
    }

    /// Whether this decision permits the placement
    #[must_use]
    pub const fn is_allow(&self) -> bool {
        matches!(self.verdict, Verdict::Allow)
    }
}

/// Structured diagnostic context for a decision.
///
/// Every field an operator needs to re-derive the verdict is carried here;
/// `Display` renders the human-readable form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Explanation {
    /// No awareness attributes are configured
    Disabled,
    /// The index auto-expands replicas to every node
    AutoExpandAll,
    /// Every configured attribute passed its capacity check
    AllRequirementsMet,
    /// The candidate node does not declare a configured attribute
    MissingAttribute {
        /// The attribute the node is missing
        attribute: String,
        /// The full configured attribute list
        configured: Vec<String>,
    },
    /// The candidate's group would exceed its fair share of copies
    TooManyCopies {
        /// Desired total copy count for the shard (primary + replicas)
        desired_copies: u32,
        /// The attribute whose check failed
        attribute: String,
        /// The candidate node's value for that attribute
        node_value: String,
        /// Number of groups in the denominator (live + forced-but-absent)
        group_count: u32,
        /// Values observed on live nodes, sorted
        live_values: Vec<String>,
        /// Forced values for this attribute, sorted; `None` when no
        /// forced awareness is configured for it
        forced_values: Option<Vec<String>>,
        /// Maximum copies any one group may hold
        max_per_group: u32,
        /// Copies the candidate's group would hold, including this copy
        current_for_value: u32,
    },
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(
                f,
                "allocation awareness is not enabled, set cluster setting \
                 [cluster.routing.allocation.awareness.attributes] to enable it"
            ),
            Self::AutoExpandAll => write!(
                f,
                "allocation awareness is ignored, this index is set to \
                 auto-expand to all nodes"
            ),
            Self::AllRequirementsMet => {
                write!(f, "node meets all awareness attribute requirements")
            }
            Self::MissingAttribute {
                attribute,
                configured,
            } => write!(
                f,
                "node does not contain the awareness attribute [{attribute}]; \
                 required attributes cluster setting \
                 [cluster.routing.allocation.awareness.attributes={}]",
                configured.join(",")
            ),
            Self::TooManyCopies {
                desired_copies,
                attribute,
                node_value,
                group_count,
                live_values,
                forced_values,
                max_per_group,
                current_for_value,
            } => {
                write!(
                    f,
                    "there are [{desired_copies}] copies of this shard and \
                     [{group_count}] values for attribute [{attribute}] \
                     ([{}] from nodes in the cluster and ",
                    live_values.join(", ")
                )?;
                match forced_values {
                    Some(forced) => {
                        write!(f, "[{}] from forced awareness", forced.join(", "))?;
                    }
                    None => write!(f, "no forced awareness")?,
                }
                write!(
                    f,
                    ") so there may be at most [{max_per_group}] copies of this \
                     shard allocated to nodes with each value, but (including \
                     this copy) there would be [{current_for_value}] copies \
                     allocated to nodes with [node.attr.{attribute}: {node_value}]"
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_verdict() {
        assert!(Decision::allow().is_allow());
        assert!(!Decision::deny().is_allow());
        assert_eq!(Decision::allow().rule, "awareness");
    }

    #[test]
    fn test_explained_attaches_context() {
        let decision = Decision::allow().explained(Explanation::AllRequirementsMet);
        assert_eq!(decision.explanation, Some(Explanation::AllRequirementsMet));
    }

    #[test]
    fn test_too_many_copies_rendering() {
        let explanation = Explanation::TooManyCopies {
            desired_copies: 3,
            attribute: "zone".to_string(),
            node_value: "z1".to_string(),
            group_count: 2,
            live_values: vec!["z1".to_string(), "z2".to_string()],
            forced_values: None,
            max_per_group: 2,
            current_for_value: 3,
        };
        let rendered = explanation.to_string();
        assert!(rendered.contains("[3] copies of this shard"));
        assert!(rendered.contains("[2] values for attribute [zone]"));
        assert!(rendered.contains("no forced awareness"));
        assert!(rendered.contains("[node.attr.zone: z1]"));
    }

    #[test]
    fn test_forced_values_rendering() {
        let explanation = Explanation::TooManyCopies {
            desired_copies: 2,
            attribute: "zone".to_string(),
            node_value: "z1".to_string(),
            group_count: 3,
            live_values: vec!["z1".to_string(), "z2".to_string()],
            forced_values: Some(vec!["z3".to_string()]),
            max_per_group: 1,
            current_for_value: 2,
        };
        assert!(explanation.to_string().contains("[z3] from forced awareness"));
    }
}
