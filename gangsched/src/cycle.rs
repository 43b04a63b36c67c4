/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scheduling cycle plumbing: cancellation, results, and the async runner.
//!
//! A cycle is one pass of pre-filter → score → normalize for one pod.  The
//! core work is synchronous; the only thing a cycle can wait on is a
//! collaborator read.  [`CycleContext`] is checked before each of those
//! reads so a cancelled or expired cycle stops promptly and never hands back
//! a half-scored batch.
//!
//! [`run_with_timeout`] drives one cycle on tokio's blocking pool and
//! cancels it when the timeout elapses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::pod::Pod;
use crate::scheduler::{GangScheduler, NodeScore, SchedulerError, UnschedulableReason};

// ── CycleContext ──────────────────────────────────────────────────────────────

/// Deadline and cancellation flag shared by everything working on a cycle.
///
/// Clones share the same flag, so the driver can keep one clone and cancel
/// the cycle running on another thread.
#[derive(Debug, Clone, Default)]
pub struct CycleContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl CycleContext {
    /// A context that never expires on its own.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::default()
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// `Err(Cancelled)` once the cycle has been cancelled or its deadline
    /// has passed.
    pub fn check(&self) -> Result<(), SchedulerError> {
        if self.is_cancelled() {
            Err(SchedulerError::Cancelled)
        } else {
            Ok(())
        }
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// A node that could not be scored this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    pub node: String,
    pub error: SchedulerError,
}

/// Normalized scores for every node that could be read, in candidate order,
/// plus the nodes that could not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoredNodes {
    pub scores: Vec<NodeScore>,
    pub failures: Vec<NodeFailure>,
}

impl ScoredNodes {
    /// Highest-scoring node; the first one wins a tie.
    pub fn best(&self) -> Option<&NodeScore> {
        self.scores
            .iter()
            .fold(None, |best: Option<&NodeScore>, s| match best {
                Some(b) if b.score >= s.score => Some(b),
                _ => Some(s),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The group quorum was not met; no node was scored.
    Rejected(UnschedulableReason),
    Scored(ScoredNodes),
}

impl CycleOutcome {
    pub fn scored(&self) -> Option<&ScoredNodes> {
        match self {
            CycleOutcome::Scored(s) => Some(s),
            CycleOutcome::Rejected(_) => None,
        }
    }
}

// ── Async runner ──────────────────────────────────────────────────────────────

/// Run one cycle for `pod` with a hard `timeout`.
///
/// The cycle runs on the blocking pool because collaborator reads may block.
/// If the timeout fires first the cycle's context is cancelled, so the
/// worker stops at its next check, and `Cancelled` is returned right away.
pub async fn run_with_timeout(
    scheduler: Arc<GangScheduler>,
    pod: Pod,
    candidates: Vec<String>,
    timeout: Duration,
) -> Result<CycleOutcome, SchedulerError> {
    let ctx = CycleContext::with_timeout(timeout);
    let handle = {
        let ctx = ctx.clone();
        let pod = pod.clone();
        tokio::task::spawn_blocking(move || scheduler.run_cycle(&pod, &candidates, &ctx))
    };

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(SchedulerError::Aborted(join_error.to_string())),
        Err(_elapsed) => {
            ctx.cancel();
            warn!(
                pod = %pod.name,
                timeout_ms = timeout.as_millis() as u64,
                "scheduling cycle timed out, abandoning"
            );
            Err(SchedulerError::Cancelled)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
