//! Candidate ranking against a target fingerprint
//!
//! Every element of the tree is fingerprinted with the target's shape and
//! scored in parallel. Scores are gathered back into document order before
//! ranking, so results do not depend on scheduling.

use crate::dom::{NodeId, TreeAccessor};
use crate::error::{FingerprintError, Result};
use crate::fingerprint::{score, Fingerprint, Fingerprinter};
use rayon::prelude::*;
use std::cmp::Ordering;

/// A scored candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub node: NodeId,
    pub score: f64,
}

/// Score every element of the tree, in document order
///
/// Candidates whose walk fails are logged and left out.
pub fn score_candidates<T>(
    target: &Fingerprint,
    fingerprinter: &Fingerprinter<'_, T>,
    depth: usize,
) -> Vec<Match>
where
    T: TreeAccessor + Sync + ?Sized,
{
    let kind = target.kind();
    let candidates = fingerprinter.tree().elements();

    let scored: Vec<Match> = candidates
        .par_iter()
        .filter_map(|&node| match fingerprinter.build(node, depth, kind) {
            Ok(fp) => Some(Match { node, score: score(target, &fp) }),
            Err(e) => {
                tracing::warn!(node, error = %e, "skipping candidate");
                None
            }
        })
        .collect();

    tracing::debug!(
        candidates = candidates.len(),
        scored = scored.len(),
        depth,
        "scored candidates"
    );
    scored
}

/// Highest-scoring node; ties go to the first in document order
pub fn find_best_match<T>(
    target: &Fingerprint,
    fingerprinter: &Fingerprinter<'_, T>,
    depth: usize,
) -> Result<Match>
where
    T: TreeAccessor + Sync + ?Sized,
{
    let mut best: Option<Match> = None;
    for candidate in score_candidates(target, fingerprinter, depth) {
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best.ok_or_else(|| FingerprintError::NodeNotFound("no candidate nodes".to_string()))
}

/// The `n` best candidates, descending by score, ties in document order
pub fn find_top_n<T>(
    target: &Fingerprint,
    fingerprinter: &Fingerprinter<'_, T>,
    depth: usize,
    n: usize,
) -> Vec<Match>
where
    T: TreeAccessor + Sync + ?Sized,
{
    let mut ranked = score_candidates(target, fingerprinter, depth);
    // stable sort keeps document order among equal scores
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}
