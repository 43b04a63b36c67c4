/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Schedulable unit model.
//!
//! A [`Pod`] is the unit being placed.  Gang membership is declared through
//! two string-keyed labels on the pod itself:
//!
//! ```text
//! podGroup:     "g1"   – group identifier (absent → not subject to quorum)
//! minAvailable: "3"    – minimum members required before any is admitted
//! ```
//!
//! The labels are kept as raw strings here.  Interpreting `minAvailable` is
//! the admission gate's job, because a bad value must surface as a
//! configuration error for that pod only.

use std::collections::BTreeMap;

use serde::Deserialize;

// ── Label keys ────────────────────────────────────────────────────────────────

/// Label carrying the pod's group identifier.
pub const GROUP_NAME_LABEL: &str = "podGroup";

/// Label carrying the group's minimum-available member count.
pub const MIN_AVAILABLE_LABEL: &str = "minAvailable";

// ── Pod ───────────────────────────────────────────────────────────────────────

/// A schedulable unit: a unique name plus its labels.
///
/// `BTreeMap` keeps label iteration sorted so log output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Pod {
    /// Unique pod name.
    pub name: String,

    /// Free-form metadata labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Pod {
    /// Creates a pod with no labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Builder-style label setter.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Convenience constructor for a gang member.
    pub fn group_member(
        name: impl Into<String>,
        group: impl Into<String>,
        min_available: impl Into<String>,
    ) -> Self {
        Self::new(name)
            .with_label(GROUP_NAME_LABEL, group)
            .with_label(MIN_AVAILABLE_LABEL, min_available)
    }

    /// The group identifier, or `None` if the pod is not part of a gang.
    pub fn group_name(&self) -> Option<&str> {
        self.labels.get(GROUP_NAME_LABEL).map(String::as_str)
    }

    /// The raw `minAvailable` label value, unparsed.
    pub fn min_available(&self) -> Option<&str> {
        self.labels.get(MIN_AVAILABLE_LABEL).map(String::as_str)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_pod_has_no_group() {
        let pod = Pod::new("web-0");
        assert_eq!(pod.name, "web-0");
        assert_eq!(pod.group_name(), None);
        assert_eq!(pod.min_available(), None);
    }

    #[test]
    fn group_member_sets_both_labels() {
        let pod = Pod::group_member("worker-0", "g1", "3");
        assert_eq!(pod.group_name(), Some("g1"));
        assert_eq!(pod.min_available(), Some("3"));
    }

    #[test]
    fn with_label_overwrites_existing_value() {
        let pod = Pod::group_member("worker-0", "g1", "3").with_label(MIN_AVAILABLE_LABEL, "5");
        assert_eq!(pod.min_available(), Some("5"));
    }

    #[test]
    fn deserializes_from_yaml_with_missing_labels() {
        let pod: Pod = serde_yaml::from_str("name: lonely\n").unwrap();
        assert_eq!(pod, Pod::new("lonely"));
    }
}
