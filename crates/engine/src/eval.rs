//! Recall measurement against exact results
//!
//! Both functions compare row `i` of a candidate `SearchResults` with row `i`
//! of a ground-truth batch (typically from `brute_force::ground_truth`).
//! Sentinel slots never count as matches.

use acorn_core::{SearchResults, NO_RESULT_LABEL};

/// Fraction of ground-truth top-`k` ids found in the candidate top-`k`,
/// pooled over all queries.
///
/// Rows whose ground truth is entirely padding contribute nothing. Returns
/// 1.0 when there is nothing to find.
pub fn recall_at_k(ground_truth: &SearchResults, results: &SearchResults, k: usize) -> f64 {
    let queries = ground_truth.num_queries().min(results.num_queries());
    let mut expected = 0usize;
    let mut found = 0usize;
    for q in 0..queries {
        let truth = top_labels(ground_truth, q, k);
        let got = top_labels(results, q, k);
        expected += truth.len();
        found += truth.iter().filter(|label| got.contains(label)).count();
    }
    if expected == 0 {
        1.0
    } else {
        found as f64 / expected as f64
    }
}

/// R@r: fraction of queries whose true nearest neighbor appears among the
/// first `r` candidates.
///
/// Queries without any ground-truth hit are skipped.
pub fn recall_at(ground_truth: &SearchResults, results: &SearchResults, r: usize) -> f64 {
    let queries = ground_truth.num_queries().min(results.num_queries());
    let mut counted = 0usize;
    let mut hits = 0usize;
    for q in 0..queries {
        let nearest = match top_labels(ground_truth, q, 1).first() {
            Some(&label) => label,
            None => continue,
        };
        counted += 1;
        if top_labels(results, q, r).contains(&nearest) {
            hits += 1;
        }
    }
    if counted == 0 {
        1.0
    } else {
        hits as f64 / counted as f64
    }
}

fn top_labels(batch: &SearchResults, row: usize, n: usize) -> Vec<i64> {
    let (_, labels) = batch.row(row);
    labels
        .iter()
        .take(n)
        .copied()
        .filter(|&l| l != NO_RESULT_LABEL)
        .collect()
}
