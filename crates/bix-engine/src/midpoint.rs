//! Midpoint selection: exhaustive and sampled scoring.
//!
//! The value of querying a commit `c` is how evenly it splits the
//! candidate set: with `a` ancestors in a graph of order `N`, the worst
//! case remaining after the answer is `max(a, N - a - 1)`, so the engine
//! maximizes the folded value `min(a, N - a)`. On graphs above the
//! configured size limit only a sampled candidate pool is scored: one
//! probable midpoint region per branch (the middle fifth of each leaf's
//! ancestor walk) plus a bounded number of merge commits, the places
//! where branches rejoin.
//!
//! The commit most recently answered Bad is never offered as a midpoint:
//! the graph already consists of it and its ancestors, so asking it again
//! cannot shrink anything. It is returned only when it is the sole
//! survivor, which is the controller's signal that the search is done.

use std::collections::HashSet;
use std::sync::mpsc;
use std::thread;

use tracing::debug;

use bix_dag::CommitDag;
use bix_types::CommitId;

use crate::config::ParamConfig;
use crate::error::{EngineError, EngineResult};

/// Pick the commit that best bisects the current candidate set.
///
/// Fails with [`EngineError::EmptyGraph`] on an empty DAG. The returned
/// commit is always a current vertex of the DAG.
pub fn midpoint(dag: &CommitDag, config: &ParamConfig) -> EngineResult<CommitId> {
    match dag.order() {
        0 => Err(EngineError::EmptyGraph),
        1 => sole_vertex(dag),
        order if order > config.limit => {
            if let Some(pick) = sampled_midpoint(dag, config)? {
                Ok(pick)
            } else {
                debug!("sampled candidate pool is empty, falling back to exhaustive scoring");
                exact_midpoint(dag)
            }
        }
        _ => exact_midpoint(dag),
    }
}

fn sole_vertex(dag: &CommitDag) -> EngineResult<CommitId> {
    dag.vertices().next().cloned().ok_or(EngineError::EmptyGraph)
}

/// Score every vertex of the DAG except the last known Bad commit.
fn exact_midpoint(dag: &CommitDag) -> EngineResult<CommitId> {
    let candidates: Vec<CommitId> = dag
        .vertices()
        .filter(|v| Some(*v) != dag.last_bad())
        .cloned()
        .collect();
    if candidates.is_empty() {
        // The graph has been narrowed down to the last Bad commit alone.
        return sole_vertex(dag);
    }
    score_pool(dag, candidates)
}

/// Build and score the sampled candidate pool. Returns `Ok(None)` when
/// the pool comes out empty (pathological graphs with only trivial
/// ancestor walks).
fn sampled_midpoint(dag: &CommitDag, config: &ParamConfig) -> EngineResult<Option<CommitId>> {
    let divisions = config.divisions.max(1);
    let mut pool: HashSet<CommitId> = HashSet::new();

    pool.extend(
        dag.vertices()
            .filter(|v| dag.parent_count(v) > 1)
            .take(config.merges)
            .cloned(),
    );

    for leaf in dag.leaves() {
        let walk = dag.ordered_ancestors(&leaf)?;
        let len = walk.len();
        let slice = &walk[2 * len / 5..3 * len / 5];
        if slice.is_empty() {
            continue;
        }
        let stride = (slice.len() / divisions).max(1);
        for i in (0..slice.len()).step_by(stride) {
            pool.insert(slice[i].clone());
        }
    }

    if let Some(last_bad) = dag.last_bad() {
        pool.remove(last_bad);
    }
    if pool.is_empty() {
        return Ok(None);
    }
    score_pool(dag, pool.into_iter().collect()).map(Some)
}

/// Score a candidate pool in parallel and fold to the winner.
///
/// Candidates are partitioned across a bounded pool of scoped threads;
/// each worker counts ancestors for its share and reports back over a
/// channel. The fold keeps the running maximum of `min(a, N - a)` with N
/// the *total* DAG order; ancestor counts are against the whole
/// candidate set no matter how the candidate was selected. Ties go to
/// the last candidate reaching the maximum.
fn score_pool(dag: &CommitDag, candidates: Vec<CommitId>) -> EngineResult<CommitId> {
    let total = dag.order();
    let workers = worker_count(candidates.len());
    debug!(
        candidates = candidates.len(),
        total, workers, "scoring midpoint candidates"
    );

    if workers <= 1 {
        let mut best: Option<(CommitId, usize)> = None;
        for candidate in candidates {
            let count = dag.ancestors_len(&candidate)?;
            fold_best(&mut best, candidate, count, total);
        }
        return best.map(|(c, _)| c).ok_or(EngineError::EmptyGraph);
    }

    let chunk_len = candidates.len().div_ceil(workers);
    let (tx, rx) = mpsc::channel();
    thread::scope(|scope| {
        for chunk in candidates.chunks(chunk_len) {
            let tx = tx.clone();
            scope.spawn(move || {
                for candidate in chunk {
                    let scored = dag
                        .ancestors_len(candidate)
                        .map(|count| (candidate.clone(), count));
                    if tx.send(scored).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut best: Option<(CommitId, usize)> = None;
        for scored in rx {
            let (candidate, count) = scored?;
            fold_best(&mut best, candidate, count, total);
        }
        best.map(|(c, _)| c).ok_or(EngineError::EmptyGraph)
    })
}

fn fold_best(best: &mut Option<(CommitId, usize)>, candidate: CommitId, count: usize, total: usize) {
    let value = count.min(total - count);
    match best {
        Some((_, best_value)) if value < *best_value => {}
        _ => *best = Some((candidate, value)),
    }
}

fn worker_count(jobs: usize) -> usize {
    thread::available_parallelism()
        .map(|value| value.get())
        .unwrap_or(4)
        .min(jobs)
        .max(1)
}
