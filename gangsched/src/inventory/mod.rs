/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Read-only collaborators the scheduler consults during a cycle.
//!
//! The node inventory and the pod group index are owned by whoever drives
//! the scheduler.  The core only reads from them, and every read is fallible:
//! a failed read is surfaced to the caller as-is, never retried.
//!
//! [`ClusterSnapshot`] is a YAML-backed implementation of both traits, used
//! by the `gangsched` binary and by tests.

pub mod snapshot;

pub use snapshot::ClusterSnapshot;

use thiserror::Error;

/// Failure of a collaborator read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The node is not present in the snapshot taken at cycle start.
    #[error("node '{node}' not found in inventory snapshot")]
    NodeNotFound { node: String },

    /// The backing store could not be read (network, cache, ...).
    #[error("inventory unavailable: {0}")]
    Unavailable(String),

    /// The backing store did not answer in time.
    #[error("inventory read timed out")]
    Timeout,
}

/// Point-in-time view of node resources.
pub trait NodeInventory: Send + Sync {
    /// Allocatable memory of `node`, in bytes.
    fn allocatable_memory(&self, node: &str) -> Result<u64, InventoryError>;
}

/// Lookup of pods by group identifier.
///
/// Eventually consistent with the cluster: the returned set may include the
/// querying pod itself, and may change before placement is committed.
pub trait PodGroupIndex: Send + Sync {
    /// Names of every pod currently labelled with `group`.
    fn list_members(&self, group: &str) -> Result<Vec<String>, InventoryError>;
}
