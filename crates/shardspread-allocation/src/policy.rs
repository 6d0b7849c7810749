//! Awareness policy configuration
//!
//! Holds the two dynamically-updatable awareness settings: the ordered
//! attribute list and the forced-group values. Updates wholesale-replace an
//! immutable [`AwarenessConfig`] behind an [`ArcSwap`], so a decision in
//! flight always observes one fully-formed pair of values and readers never
//! take a lock.

use arc_swap::ArcSwap;
use shardspread_common::Settings;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Setting key for the ordered awareness attribute list
pub const AWARENESS_ATTRIBUTES_SETTING: &str = "cluster.routing.allocation.awareness.attributes";

/// Setting prefix for forced awareness groups; full keys look like
/// `cluster.routing.allocation.awareness.force.zone.values = z1,z2`
pub const AWARENESS_FORCE_GROUP_PREFIX: &str = "cluster.routing.allocation.awareness.force.";

/// One immutable version of the awareness configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AwarenessConfig {
    /// Awareness dimensions, evaluated in this order
    pub attributes: Vec<String>,
    /// Per-attribute forced values: a floor on the group count, never a
    /// ceiling. Keys need not appear in `attributes`.
    pub forced: HashMap<String, Vec<String>>,
}

impl AwarenessConfig {
    /// Parse a configuration version from a settings view.
    ///
    /// Forced buckets with an empty `values` list are dropped entirely.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            attributes: settings.get_list(AWARENESS_ATTRIBUTES_SETTING),
            forced: parse_forced_groups(settings),
        }
    }

    /// Forced values for one attribute, if any are configured
    #[must_use]
    pub fn forced_values(&self, attribute: &str) -> Option<&[String]> {
        self.forced.get(attribute).map(Vec::as_slice)
    }
}

fn parse_forced_groups(settings: &Settings) -> HashMap<String, Vec<String>> {
    let mut forced = HashMap::new();
    for (attribute, group) in settings.groups(AWARENESS_FORCE_GROUP_PREFIX) {
        let values = group.get_list("values");
        if !values.is_empty() {
            forced.insert(attribute, values);
        }
    }
    forced
}

/// Process-wide holder of the current awareness configuration.
///
/// The external settings mechanism calls [`AwarenessPolicy::apply_settings`]
/// whenever either awareness setting changes; deciders call
/// [`AwarenessPolicy::current`] at the top of every decision.
#[derive(Debug, Default)]
pub struct AwarenessPolicy {
    config: ArcSwap<AwarenessConfig>,
}

impl AwarenessPolicy {
    /// Create a policy with no awareness configured
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy from initial settings
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            config: ArcSwap::from_pointee(AwarenessConfig::from_settings(settings)),
        }
    }

    /// The currently published configuration version
    #[must_use]
    pub fn current(&self) -> Arc<AwarenessConfig> {
        self.config.load_full()
    }

    /// Re-parse both awareness settings and publish the new version with a
    /// single atomic swap.
    pub fn apply_settings(&self, settings: &Settings) {
        let config = AwarenessConfig::from_settings(settings);
        debug!(
            attributes = ?config.attributes,
            forced_groups = config.forced.len(),
            "updating awareness configuration"
        );
        self.config.store(Arc::new(config));
    }
}
