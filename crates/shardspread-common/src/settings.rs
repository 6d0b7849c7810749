//! Flat dynamic-settings map
//!
//! Cluster configuration arrives as flat dotted keys with string values
//! (e.g. `cluster.routing.allocation.awareness.attributes = zone,rack_id`).
//! This module provides the small read side of that convention: list-valued
//! lookups and prefix-grouped sub-views. The full settings infrastructure
//! (validation, scopes, registration) lives outside this repo; consumers
//! here only ever read a point-in-time map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An immutable point-in-time view of flat string settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    entries: BTreeMap<String, String>,
}

impl Settings {
    /// Create an empty settings map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a raw value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Get a comma-separated list value by key.
    ///
    /// Items are trimmed; empty items are dropped. A missing key yields an
    /// empty list, same as an empty value.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Group entries under a dotted prefix by their first key segment.
    ///
    /// For prefix `a.force.` the entry `a.force.zone.values = z1,z2`
    /// lands in the group `zone` as `values = z1,z2`. Keys with no
    /// remaining segment after the group name are skipped.
    #[must_use]
    pub fn groups(&self, prefix: &str) -> BTreeMap<String, Settings> {
        let mut grouped: BTreeMap<String, Settings> = BTreeMap::new();
        for (key, value) in &self.entries {
            let Some(rest) = key.strip_prefix(prefix) else {
                continue;
            };
            let Some((group, remainder)) = rest.split_once('.') else {
                continue;
            };
            if group.is_empty() || remainder.is_empty() {
                continue;
            }
            grouped
                .entry(group.to_string())
                .or_default()
                .entries
                .insert(remainder.to_string(), value.clone());
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_list_splits_and_trims() {
        let settings = Settings::from_pairs([("attrs", " zone, rack_id ,,")]);
        assert_eq!(settings.get_list("attrs"), vec!["zone", "rack_id"]);
        assert!(settings.get_list("missing").is_empty());
    }

    #[test]
    fn test_groups_by_prefix() {
        let settings = Settings::from_pairs([
            ("awareness.force.zone.values", "z1,z2"),
            ("awareness.force.rack_id.values", "r1"),
            ("awareness.attributes", "zone"),
        ]);

        let groups = settings.groups("awareness.force.");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["zone"].get_list("values"), vec!["z1", "z2"]);
        assert_eq!(groups["rack_id"].get_list("values"), vec!["r1"]);
    }

    #[test]
    fn test_groups_skips_bare_keys() {
        let settings = Settings::from_pairs([("awareness.force.zone", "oops")]);
        assert!(settings.groups("awareness.force.").is_empty());
    }
}
