//! Gang-aware pre-filter and memory-based node scoring.
//!
//! [`GangScheduler`] exposes the three extension points a host scheduler
//! calls for each pod, in order:
//!
//! 1. [`pre_filter`](GangScheduler::pre_filter) – group-quorum gate, once
//!    per pod.
//! 2. [`score`](GangScheduler::score) – raw signed score, once per candidate
//!    node.  A failing node does not affect its siblings.
//! 3. [`normalize_scores`](GangScheduler::normalize_scores) – rescales the
//!    whole batch into `[0, 100]`.
//!
//! [`run_cycle`](GangScheduler::run_cycle) strings the three together for
//! drivers that own their own loop (the `gangsched` binary, tests).
//!
//! The scheduler holds no per-cycle state.  The scoring mode is fixed at
//! construction and the collaborators are only read, so one instance can
//! serve concurrent cycles.
//!
//! # Example
//! ```rust,ignore
//! let snapshot = Arc::new(snapshot);
//! let scheduler = GangScheduler::new(ScoringMode::Least, snapshot.clone(), snapshot);
//! let outcome = scheduler.run_cycle(&pod, &nodes, &CycleContext::new())?;
//! ```

pub mod admission;
pub mod error;
pub mod normalize;

pub use admission::{Admission, UnschedulableReason};
pub use error::SchedulerError;
pub use normalize::{NodeScore, MAX_NODE_SCORE, MIN_NODE_SCORE};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ScoringMode;
use crate::cycle::{CycleContext, CycleOutcome, NodeFailure, ScoredNodes};
use crate::inventory::{NodeInventory, PodGroupIndex};
use crate::pod::Pod;

use admission::{check_quorum, parse_min_available};

/// Name under which the scheduler reports itself.
pub const NAME: &str = "GangScheduler";

/// Raw score for a node with `allocatable` bytes of memory.
///
/// `Least` negates the amount so that "highest score wins" holds for both
/// modes after normalization.  Amounts above `i64::MAX` saturate.
pub fn raw_score(mode: ScoringMode, allocatable: u64) -> i64 {
    let memory = i64::try_from(allocatable).unwrap_or(i64::MAX);
    match mode {
        ScoringMode::Least => -memory,
        ScoringMode::Most => memory,
    }
}

// ── GangScheduler ─────────────────────────────────────────────────────────────

pub struct GangScheduler {
    mode: ScoringMode,
    nodes: Arc<dyn NodeInventory>,
    groups: Arc<dyn PodGroupIndex>,
}

impl GangScheduler {
    pub fn new(
        mode: ScoringMode,
        nodes: Arc<dyn NodeInventory>,
        groups: Arc<dyn PodGroupIndex>,
    ) -> Self {
        info!(scheduler = NAME, mode = %mode, "scheduler runs with the mode {}", mode);
        Self {
            mode,
            nodes,
            groups,
        }
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    // ── Pre-filter ────────────────────────────────────────────────────────────

    /// Group-quorum gate.
    ///
    /// Pods without a `podGroup` label pass unconditionally.  Otherwise the
    /// group index is queried first and `minAvailable` is validated after,
    /// so an index failure takes precedence over a bad label.
    ///
    /// # Errors
    /// * [`SchedulerError::Upstream`] if the group index cannot be read.
    /// * [`SchedulerError::MissingMinAvailable`] /
    ///   [`SchedulerError::InvalidMinAvailable`] for a bad label.
    pub fn pre_filter(&self, pod: &Pod) -> Result<Admission, SchedulerError> {
        self.pre_filter_in(pod, &CycleContext::new())
    }

    fn pre_filter_in(&self, pod: &Pod, ctx: &CycleContext) -> Result<Admission, SchedulerError> {
        debug!(pod = %pod.name, "pod is in pre-filter phase");

        let Some(group) = pod.group_name() else {
            debug!(pod = %pod.name, "no group label, admitting");
            return Ok(Admission::Admit);
        };

        ctx.check()?;
        let members = self
            .groups
            .list_members(group)
            .map_err(SchedulerError::Upstream)?;

        let min_available = parse_min_available(pod, group)?;

        let admission = check_quorum(group, members.len(), min_available);
        match &admission {
            Admission::Admit => info!(
                pod = %pod.name,
                group = %group,
                members = members.len(),
                min_available,
                "group quorum met"
            ),
            Admission::Unschedulable(reason) => warn!(
                pod = %pod.name,
                group = %group,
                shortfall = reason.shortfall(),
                "{}",
                reason
            ),
        }
        Ok(admission)
    }

    // ── Score ─────────────────────────────────────────────────────────────────

    /// Raw score of `node` for `pod`.
    ///
    /// # Errors
    /// * [`SchedulerError::NodeNotFound`] if the node is not in the inventory.
    /// * [`SchedulerError::Upstream`] for any other inventory failure.
    pub fn score(&self, pod: &Pod, node: &str) -> Result<i64, SchedulerError> {
        debug!(pod = %pod.name, node = %node, "pod is in score phase");

        let allocatable = self.nodes.allocatable_memory(node)?;
        let score = raw_score(self.mode, allocatable);

        debug!(
            pod = %pod.name,
            node = %node,
            allocatable_memory = allocatable,
            score,
            "node scored"
        );
        Ok(score)
    }

    /// Rescale a full batch of raw scores in place.  Never fails.
    pub fn normalize_scores(&self, pod: &Pod, scores: &mut [NodeScore]) {
        if !normalize::normalize_scores(scores) {
            debug!(
                pod = %pod.name,
                candidates = scores.len(),
                "scores tied or empty, left unchanged"
            );
        }
    }

    // ── Full cycle ────────────────────────────────────────────────────────────

    /// Pre-filter, score every candidate, normalize.
    ///
    /// Per-node failures are collected in [`ScoredNodes::failures`] and
    /// excluded from the batch; the remaining nodes are still scored and
    /// normalized among themselves.
    ///
    /// # Errors
    /// Any pre-filter error, or [`SchedulerError::Cancelled`] if `ctx` fires
    /// before the batch is complete.  A cancelled cycle never returns a
    /// partially scored batch.
    pub fn run_cycle(
        &self,
        pod: &Pod,
        candidates: &[String],
        ctx: &CycleContext,
    ) -> Result<CycleOutcome, SchedulerError> {
        info!(
            pod = %pod.name,
            mode = %self.mode,
            candidates = candidates.len(),
            "=== scheduling cycle ==="
        );

        if let Admission::Unschedulable(reason) = self.pre_filter_in(pod, ctx)? {
            return Ok(CycleOutcome::Rejected(reason));
        }

        let mut scores = Vec::with_capacity(candidates.len());
        let mut failures = Vec::new();

        for node in candidates {
            ctx.check()?;
            match self.score(pod, node) {
                Ok(score) => scores.push(NodeScore::new(node.clone(), score)),
                Err(error) => {
                    warn!(pod = %pod.name, node = %node, %error, "node skipped");
                    failures.push(NodeFailure {
                        node: node.clone(),
                        error,
                    });
                }
            }
        }

        ctx.check()?;
        self.normalize_scores(pod, &mut scores);

        let scored = ScoredNodes { scores, failures };
        info!(
            pod = %pod.name,
            scored = scored.scores.len(),
            failed = scored.failures.len(),
            best = ?scored.best().map(|s| &s.name),
            "=== cycle complete ==="
        );
        Ok(CycleOutcome::Scored(scored))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
