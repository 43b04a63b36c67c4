/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the gang scheduler.
//!
//! Every decision point (pre-filter, per-node score, whole cycle) returns a
//! [`SchedulerError`] on failure.  An insufficient group quorum is **not** an
//! error: it is a well-formed negative decision, modelled by
//! [`Admission::Unschedulable`](super::Admission::Unschedulable).
//!
//! | Variant | Kind | Scope |
//! |---|---|---|
//! | `MissingMode` / `InvalidMode` | configuration | scheduler construction |
//! | `MissingMinAvailable` / `InvalidMinAvailable` | configuration | one pod |
//! | `NodeNotFound` | not found | one node |
//! | `Upstream` | collaborator I/O | one pod or one node |
//! | `Cancelled` / `Aborted` | cycle | whole cycle |

use thiserror::Error;

use crate::inventory::InventoryError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// A scheduler args document was supplied but carries no `mode`.
    #[error("scoring mode is not set (valid: Least, Most)")]
    MissingMode,

    /// The configured mode is neither `Least` nor `Most`.
    #[error("invalid mode, got '{0}' (valid: Least, Most)")]
    InvalidMode(String),

    /// The pod declares a group but no minimum-available count.
    #[error("pod '{pod}' declares group '{group}' but has no minAvailable label")]
    MissingMinAvailable { pod: String, group: String },

    /// The minimum-available label is not a non-negative integer.
    #[error(
        "pod '{pod}' in group '{group}' has invalid minAvailable '{value}': \
         expected a non-negative integer"
    )]
    InvalidMinAvailable {
        pod: String,
        group: String,
        value: String,
    },

    /// The node is absent from the inventory snapshot.
    #[error("node '{node}' not found in inventory snapshot")]
    NodeNotFound { node: String },

    /// A collaborator read failed.  Never retried inside the scheduler.
    #[error("upstream read failed: {0}")]
    Upstream(#[source] InventoryError),

    /// The cycle deadline passed or the cycle was cancelled by its driver.
    #[error("scheduling cycle cancelled")]
    Cancelled,

    /// The cycle's worker task died before producing a result.
    #[error("scheduling cycle aborted: {0}")]
    Aborted(String),
}

impl SchedulerError {
    /// `true` for the configuration variants (mode or minAvailable).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SchedulerError::MissingMode
                | SchedulerError::InvalidMode(_)
                | SchedulerError::MissingMinAvailable { .. }
                | SchedulerError::InvalidMinAvailable { .. }
        )
    }
}

impl From<InventoryError> for SchedulerError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NodeNotFound { node } => SchedulerError::NodeNotFound { node },
            other => SchedulerError::Upstream(other),
        }
    }
}
