/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Min-max normalization of a batch of raw node scores.
//!
//! Raw scores are signed and unbounded (they are memory amounts, possibly
//! negated).  Before the placement engine compares them they are mapped onto
//! `[MIN_NODE_SCORE, MAX_NODE_SCORE]` with
//!
//! ```text
//! normalized = ((raw − min) × 100) / (max − min)      (truncating division)
//! ```
//!
//! so the lowest raw score becomes `0`, the highest becomes `100` and the
//! relative order is preserved.
//!
//! # Degenerate case
//! When every score is equal (including a single candidate) `max − min` is
//! zero.  The batch is then left untouched and the call still succeeds; all
//! nodes are equally preferred.
//!
//! # Overflow
//! `raw − min` can span the whole `i64` range, so the arithmetic is done in
//! `i128`.  The quotient is always in `[0, 100]` and converts back losslessly.

/// Lowest normalized score.
pub const MIN_NODE_SCORE: i64 = 0;

/// Highest normalized score.
pub const MAX_NODE_SCORE: i64 = 100;

/// One entry of a score batch: a candidate node and its score.
///
/// Holds the raw score until [`normalize_scores`] rewrites it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeScore {
    pub name: String,
    pub score: i64,
}

impl NodeScore {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Rescale `scores` in place.  Returns `false` when the batch was left as-is
/// (empty or all tied).
pub fn normalize_scores(scores: &mut [NodeScore]) -> bool {
    let Some((min, max)) = score_range(scores) else {
        return false;
    };

    // all tied: nothing to spread, and no zero division
    if min == max {
        return false;
    }

    let span = i128::from(max) - i128::from(min);
    let range = i128::from(MAX_NODE_SCORE - MIN_NODE_SCORE);

    for entry in scores.iter_mut() {
        let offset = i128::from(entry.score) - i128::from(min);
        let scaled = offset * range / span + i128::from(MIN_NODE_SCORE);
        entry.score = scaled as i64;
    }

    true
}

/// Min and max score in one pass, `None` for an empty batch.
fn score_range(scores: &[NodeScore]) -> Option<(i64, i64)> {
    let first = scores.first()?.score;
    Some(
        scores
            .iter()
            .fold((first, first), |(lo, hi), s| (lo.min(s.score), hi.max(s.score))),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(raw: &[i64]) -> Vec<NodeScore> {
        raw.iter()
            .enumerate()
            .map(|(i, &s)| NodeScore::new(format!("node{i}"), s))
            .collect()
    }

    fn scores(batch: &[NodeScore]) -> Vec<i64> {
        batch.iter().map(|s| s.score).collect()
    }

    #[test]
    fn extrema_map_to_bounds_and_middle_truncates() {
        // (5 − 3) × 100 / 6 = 33.33… → 33
        let mut b = batch(&[3, 9, 5]);
        assert!(normalize_scores(&mut b));
        assert_eq!(scores(&b), vec![0, 100, 33]);
    }

    #[test]
    fn ties_are_left_untouched() {
        let mut b = batch(&[7, 7, 7]);
        assert!(!normalize_scores(&mut b));
        assert_eq!(scores(&b), vec![7, 7, 7]);
    }

    #[test]
    fn single_candidate_is_a_tie() {
        let mut b = batch(&[-4096]);
        assert!(!normalize_scores(&mut b));
        assert_eq!(scores(&b), vec![-4096]);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut b: Vec<NodeScore> = vec![];
        assert!(!normalize_scores(&mut b));
        assert!(b.is_empty());
    }

    #[test]
    fn negated_memory_scores_normalize() {
        // least-loaded: A=200, B=50, C=50
        let mut b = batch(&[-200, -50, -50]);
        normalize_scores(&mut b);
        assert_eq!(scores(&b), vec![0, 100, 100]);
    }

    #[test]
    fn names_and_positions_are_preserved() {
        let mut b = batch(&[10, 0, 5]);
        normalize_scores(&mut b);
        let names: Vec<&str> = b.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["node0", "node1", "node2"]);
        assert_eq!(scores(&b), vec![100, 0, 50]);
    }

    #[test]
    fn full_i64_span_does_not_overflow() {
        let mut b = batch(&[i64::MIN, 0, i64::MAX]);
        normalize_scores(&mut b);
        assert_eq!(scores(&b), vec![0, 50, 100]);
    }

    #[test]
    fn output_is_monotonic_and_bounded() {
        let raw = [-17, 1_000_000, 42, 42, -3, 999_999, 0];
        let mut b = batch(&raw);
        normalize_scores(&mut b);
        for (i, a) in raw.iter().enumerate() {
            assert!((MIN_NODE_SCORE..=MAX_NODE_SCORE).contains(&b[i].score));
            for (j, c) in raw.iter().enumerate() {
                if a <= c {
                    assert!(b[i].score <= b[j].score, "order broken at {i},{j}");
                }
            }
        }
    }
}
