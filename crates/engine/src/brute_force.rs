//! Exact filtered k-NN by linear scan
//!
//! Used as the ground-truth baseline for recall measurement and as the
//! search fallback when a filter leaves only a handful of passing vectors.
//! Ordering rules match the graph search exactly: internal distance
//! ascending, ties by ascending id.

use std::collections::BinaryHeap;

use acorn_core::{FilterMask, SearchHit, SearchResults, VectorId};

use crate::distance::Metric;
use crate::graph::Scored;
use crate::store::VectorStorage;

/// Exact top-`k` passing vectors for one query
pub fn exhaustive_search(
    storage: &dyn VectorStorage,
    metric: &dyn Metric,
    query: &[f32],
    k: usize,
    mask: Option<&FilterMask>,
) -> Vec<Scored> {
    match mask {
        Some(mask) => top_k(storage, metric, query, k, mask.passing_ids()),
        None => top_k(storage, metric, query, k, (0..storage.len()).map(VectorId::from)),
    }
}

/// Exact top-`k` over an explicit id set
pub(crate) fn top_k(
    storage: &dyn VectorStorage,
    metric: &dyn Metric,
    query: &[f32],
    k: usize,
    ids: impl Iterator<Item = VectorId>,
) -> Vec<Scored> {
    if k == 0 {
        return Vec::new();
    }
    // Max-heap on (distance, id): the worst kept entry sits on top
    let mut heap: BinaryHeap<Scored> = BinaryHeap::with_capacity(k + 1);
    for id in ids {
        let vector = match storage.get(id) {
            Some(v) => v,
            None => continue,
        };
        let candidate = Scored {
            distance: metric.distance(query, vector),
            id,
        };
        if heap.len() < k {
            heap.push(candidate);
        } else if heap.peek().map_or(false, |worst| candidate < *worst) {
            heap.pop();
            heap.push(candidate);
        }
    }
    heap.into_sorted_vec()
}

/// Exact results for a batch of flattened queries, in the batch output layout
///
/// `masks`, when given, holds one mask per query.
pub fn ground_truth(
    storage: &dyn VectorStorage,
    metric: &dyn Metric,
    queries: &[f32],
    k: usize,
    masks: Option<&[FilterMask]>,
) -> SearchResults {
    let dimension = storage.dimension().max(1);
    let rows = queries
        .chunks(dimension)
        .enumerate()
        .map(|(i, query)| {
            let mask = masks.and_then(|m| m.get(i));
            exhaustive_search(storage, metric, query, k, mask)
                .into_iter()
                .map(|s| SearchHit {
                    id: s.id,
                    distance: metric.report(s.distance),
                })
                .collect()
        })
        .collect();
    SearchResults::from_rows(k, rows, metric.kind())
}
