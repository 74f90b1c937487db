//! Filtered best-first search
//!
//! Expansion is filter-agnostic and acceptance is filter-aware: every reached
//! node can widen the frontier through its augmented list, but only nodes the
//! mask passes enter the result set. Failing nodes therefore act as waypoints
//! between passing regions of the graph.
//!
//! ## Algorithm
//!
//! 1. Seed the frontier with the entry point
//! 2. Pop the closest frontier node; stop once it is farther than the worst
//!    of `ef` accepted results
//! 3. Evaluate its unvisited neighbors; a neighbor joins the frontier if the
//!    result set is not full or it beats the worst result, and joins the
//!    results as well if it passes the mask
//!
//! Filters that pass very few vectors skip the graph entirely and scan the
//! passing ids exactly.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use acorn_core::{FilterMask, SearchParams};

use super::visited::with_visited;
use super::{GraphContext, NeighborGraph, NeighborList, Scored};
use crate::brute_force;
use crate::observe::SearchStats;

/// Best-first traversal from the entry point with beam `ef`.
///
/// Returns accepted nodes sorted by (distance, id), at most `ef` of them.
/// `max_visited` bounds the number of distance evaluations.
pub fn beam_search(
    graph: &NeighborGraph,
    ctx: &GraphContext<'_>,
    query: &[f32],
    ef: usize,
    filter: Option<&FilterMask>,
    max_visited: Option<usize>,
) -> (Vec<Scored>, SearchStats) {
    let mut stats = SearchStats::default();
    let entry = match graph.entry_point() {
        Some(e) if ef > 0 => e,
        _ => return (Vec::new(), stats),
    };
    let accepts = |s: &Scored| filter.map_or(true, |m| m.passes(s.id));

    let results = with_visited(graph.len(), |visited| {
        visited.insert(entry);
        let start = Scored {
            distance: ctx.distance_to(query, entry),
            id: entry,
        };
        stats.visited += 1;
        stats.distance_computations += 1;

        // Frontier: min-heap via Reverse (closest popped first)
        let mut candidates: BinaryHeap<Reverse<Scored>> = BinaryHeap::new();
        candidates.push(Reverse(start));

        // Accepted results: max-heap (worst on top for eviction)
        let mut results: BinaryHeap<Scored> = BinaryHeap::new();
        if accepts(&start) {
            results.push(start);
        }

        'traversal: while let Some(Reverse(nearest)) = candidates.pop() {
            if results.len() >= ef {
                if let Some(worst) = results.peek() {
                    if nearest.distance > worst.distance {
                        break;
                    }
                }
            }

            for &neighbor in graph.neighbors(nearest.id, NeighborList::Augmented) {
                if max_visited.map_or(false, |cap| stats.visited >= cap) {
                    stats.capped = true;
                    break 'traversal;
                }
                if !visited.insert(neighbor) {
                    continue;
                }
                stats.visited += 1;
                stats.distance_computations += 1;

                let scored = Scored {
                    distance: ctx.distance_to(query, neighbor),
                    id: neighbor,
                };
                let improves = results.len() < ef || results.peek().map_or(true, |w| scored < *w);
                if !improves {
                    continue;
                }

                // Failing nodes still extend the frontier
                candidates.push(Reverse(scored));
                if accepts(&scored) {
                    results.push(scored);
                    if results.len() > ef {
                        results.pop();
                    }
                }
            }
        }

        results.into_sorted_vec()
    });

    stats.accepted = results.len();
    (results, stats)
}

/// Top-`k` filter-passing neighbors of `query`.
///
/// A mask passing at most `max(exhaustive_threshold, k)` vectors is answered
/// by an exact scan over the passing ids, so a query with fewer than `k`
/// passing vectors returns all of them.
pub fn filtered_search(
    graph: &NeighborGraph,
    ctx: &GraphContext<'_>,
    query: &[f32],
    k: usize,
    mask: Option<&FilterMask>,
    params: &SearchParams,
) -> (Vec<Scored>, SearchStats) {
    if k == 0 || graph.is_empty() {
        return (Vec::new(), SearchStats::default());
    }

    let passing = mask.map_or(graph.len(), FilterMask::count);
    if passing <= params.exhaustive_threshold.max(k) {
        let hits = brute_force::exhaustive_search(ctx.storage, ctx.metric, query, k, mask);
        let stats = SearchStats {
            visited: passing,
            distance_computations: passing,
            accepted: hits.len(),
            exhaustive: true,
            capped: false,
        };
        return (hits, stats);
    }

    let ef = params.ef.max(k);
    let (mut hits, mut stats) = beam_search(graph, ctx, query, ef, mask, params.max_visited);
    hits.truncate(k);
    stats.accepted = hits.len();
    (hits, stats)
}
