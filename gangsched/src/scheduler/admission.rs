//! Group-quorum admission decision.
//!
//! A pod that belongs to a group is only admitted once the group has at least
//! `minAvailable` members indexed.  The count is a snapshot taken at query
//! time and may include the pod itself; members can still appear or vanish
//! before placement is committed.  That window is accepted, not locked away.

use std::fmt;

use super::SchedulerError;
use crate::pod::Pod;

/// Why a pod was held back by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnschedulableReason {
    pub group: String,
    /// Members observed when the index was queried.
    pub members: usize,
    pub min_available: u64,
}

impl UnschedulableReason {
    /// How many more members the group needs.
    pub fn shortfall(&self) -> u64 {
        self.min_available.saturating_sub(self.members as u64)
    }
}

impl fmt::Display for UnschedulableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "not enough pods in group '{}': {} present, minimum required is {} (short by {})",
            self.group,
            self.members,
            self.min_available,
            self.shortfall()
        )
    }
}

/// Outcome of the pre-filter gate.  Errors travel separately as
/// [`SchedulerError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admit,
    Unschedulable(UnschedulableReason),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admit)
    }
}

/// Parse the pod's `minAvailable` label for `group`.
///
/// The value must be a bare decimal integer.  Surrounding whitespace,
/// negative numbers and fractions are rejected.
pub fn parse_min_available(pod: &Pod, group: &str) -> Result<u64, SchedulerError> {
    let raw = pod
        .min_available()
        .ok_or_else(|| SchedulerError::MissingMinAvailable {
            pod: pod.name.clone(),
            group: group.to_string(),
        })?;

    raw.parse::<u64>()
        .map_err(|_| SchedulerError::InvalidMinAvailable {
            pod: pod.name.clone(),
            group: group.to_string(),
            value: raw.to_string(),
        })
}

/// Compare the observed member count against the declared minimum.
pub fn check_quorum(group: &str, members: usize, min_available: u64) -> Admission {
    if (members as u64) < min_available {
        Admission::Unschedulable(UnschedulableReason {
            group: group.to_string(),
            members,
            min_available,
        })
    } else {
        Admission::Admit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pod::{Pod, GROUP_NAME_LABEL};

    #[test]
    fn quorum_met_admits() {
        assert_eq!(check_quorum("g1", 3, 3), Admission::Admit);
        assert_eq!(check_quorum("g1", 5, 3), Admission::Admit);
    }

    #[test]
    fn zero_minimum_always_admits() {
        assert_eq!(check_quorum("g1", 0, 0), Admission::Admit);
    }

    #[test]
    fn quorum_short_by_one_is_unschedulable() {
        let Admission::Unschedulable(reason) = check_quorum("g1", 2, 3) else {
            panic!("expected unschedulable");
        };
        assert_eq!(reason.shortfall(), 1);
        let msg = reason.to_string();
        assert!(msg.contains("'g1'"), "reason should name the group: {msg}");
        assert!(msg.contains("short by 1"), "reason should state the shortfall: {msg}");
    }

    #[test]
    fn parses_plain_integer() {
        let pod = Pod::group_member("p", "g1", "4");
        assert_eq!(parse_min_available(&pod, "g1"), Ok(4));
    }

    #[test]
    fn padded_value_is_config_error() {
        for padded in [" 2 ", "2 ", " 2", "2\n"] {
            let pod = Pod::group_member("p", "g1", padded);
            let err = parse_min_available(&pod, "g1").unwrap_err();
            assert!(
                matches!(err, SchedulerError::InvalidMinAvailable { ref value, .. } if value == padded),
                "{padded:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn values_beyond_u32_parse() {
        let pod = Pod::group_member("p", "g1", "4294967296");
        assert_eq!(parse_min_available(&pod, "g1"), Ok(4_294_967_296));
    }

    #[test]
    fn huge_minimum_is_unschedulable_not_error() {
        let Admission::Unschedulable(reason) = check_quorum("g1", 1, 4_294_967_296) else {
            panic!("expected unschedulable");
        };
        assert_eq!(reason.shortfall(), 4_294_967_295);
    }

    #[test]
    fn missing_label_is_config_error() {
        let pod = Pod::new("p").with_label(GROUP_NAME_LABEL, "g1");
        let err = parse_min_available(&pod, "g1").unwrap_err();
        assert!(matches!(err, SchedulerError::MissingMinAvailable { .. }));
        assert!(err.is_config_error());
    }

    #[test]
    fn non_numeric_and_negative_values_are_config_errors() {
        for bad in ["three", "", "-1", "2.5", "0x3"] {
            let pod = Pod::group_member("p", "g1", bad);
            let err = parse_min_available(&pod, "g1").unwrap_err();
            assert!(
                matches!(err, SchedulerError::InvalidMinAvailable { ref value, .. } if value == bad),
                "'{bad}' should be rejected, got {err:?}"
            );
        }
    }
}
