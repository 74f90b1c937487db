//! Incremental graph construction
//!
//! Each insertion:
//! 1. Gathers a candidate pool with an unfiltered beam search of width
//!    `gamma * m` over the graph built so far
//! 2. Selects base neighbors (distance only, `m_beta`) and augmented
//!    neighbors (attribute-aware, `m`) from that pool
//! 3. Adds the reverse edges, then shrinks any neighbor whose list overflows
//!
//! Shrinking removes whole edges, so both lists stay symmetric. An edge
//! `n - x` only leaves `n`'s list along a local detour:
//! - covered: another neighbor of `n` already links to `x`
//! - bridged: the edge is replaced by `p - x`, where `p` is a neighbor of `n`
//!   that is strictly closer to `x` than `n` is, or that still has room
//!
//! Either way `x` stays connected to `n` through `p`, so a shrink never splits
//! the graph. The diversity rule picks which edge goes first; when none of
//! its choices has a detour, a retained neighbor with one is evicted instead,
//! and when no neighbor has one, a neighbor that keeps another edge goes.
//! A bridge can overflow `p`, which is then shrunk in turn. Every step either
//! lowers the total overflow or keeps it and shortens an edge, so the cascade
//! terminates.
//!
//! Single writer: callers serialize inserts.

use acorn_core::{AcornConfig, VectorId};

use super::prune::select_neighbors;
use super::search::beam_search;
use super::{sort_scored, GraphContext, NeighborGraph, NeighborList, Scored};
use crate::observe::InsertEvent;

/// Degree bound of a list kind
pub fn degree_bound(config: &AcornConfig, which: NeighborList) -> usize {
    match which {
        NeighborList::Base => config.m_beta,
        NeighborList::Augmented => config.m,
    }
}

/// Link vector `id` into the graph.
///
/// The vector and its attribute must already be in `ctx`'s storage and
/// metadata, and `id` must be the next node id.
pub fn insert(
    graph: &mut NeighborGraph,
    ctx: &GraphContext<'_>,
    config: &AcornConfig,
    id: VectorId,
) -> InsertEvent {
    let node = graph.push_node();
    debug_assert_eq!(node, id, "graph and storage ids diverged");

    let mut event = InsertEvent {
        id,
        attribute: ctx.metadata.get(id).unwrap_or_default(),
        candidates: 0,
        base_degree: 0,
        augmented_degree: 0,
        back_edge_prunes: 0,
    };

    let vector = match ctx.storage.get(id) {
        Some(v) => v,
        None => return event,
    };
    if graph.len() == 1 {
        return event;
    }

    let (pool, _) = beam_search(
        graph,
        ctx,
        vector,
        config.candidate_pool_size(),
        None,
        None,
    );
    let pool: Vec<Scored> = pool.into_iter().filter(|s| s.id != id).collect();
    event.candidates = pool.len();

    for which in NeighborList::ALL {
        let budget = degree_bound(config, which);
        let selected = select_neighbors(ctx, id, &pool, budget, which);
        graph.set_neighbors(id, which, selected.iter().map(|s| s.id).collect());

        // Every reverse edge lands before any shrink reads the lists
        for neighbor in &selected {
            graph.push_directed(neighbor.id, id, which);
        }
        for neighbor in &selected {
            if graph.neighbors(neighbor.id, which).len() > budget {
                event.back_edge_prunes += shrink(graph, ctx, neighbor.id, budget, which);
            }
        }
    }

    event.base_degree = graph.neighbors(id, NeighborList::Base).len();
    event.augmented_degree = graph.neighbors(id, NeighborList::Augmented).len();
    event
}

/// How an edge `node - x` can leave `node`'s list
#[derive(Debug, Clone, Copy, PartialEq)]
enum Eviction {
    /// Another neighbor of `node` already links to `x`
    Covered,
    /// Replace the edge with `p - x`
    Bridge(VectorId),
    /// No local detour
    Unprotected,
}

/// Bring `node`'s list back under `budget`, cascading into bridged neighbors.
///
/// Returns the number of edges evicted.
fn shrink(
    graph: &mut NeighborGraph,
    ctx: &GraphContext<'_>,
    node: VectorId,
    budget: usize,
    which: NeighborList,
) -> usize {
    let mut evictions = 0;
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        while graph.neighbors(node, which).len() > budget {
            let scored: Vec<Scored> = graph
                .neighbors(node, which)
                .iter()
                .map(|&n| Scored {
                    distance: ctx.distance_between(node, n),
                    id: n,
                })
                .collect();
            let kept: Vec<VectorId> = select_neighbors(ctx, node, &scored, budget, which)
                .into_iter()
                .map(|s| s.id)
                .collect();

            // Farthest first: what the diversity rule drops, then what it keeps
            let mut order = scored;
            order.sort_by(|a, b| b.cmp(a));
            let (dropped, retained): (Vec<Scored>, Vec<Scored>) =
                order.into_iter().partition(|s| !kept.contains(&s.id));

            let choice = dropped
                .iter()
                .chain(retained.iter())
                .map(|x| (x.id, classify(graph, ctx, node, x, budget, which)))
                .find(|(_, eviction)| *eviction != Eviction::Unprotected);
            // Without a detour, at least avoid stripping a node of its last edge
            let fallback = || {
                dropped
                    .iter()
                    .chain(retained.iter())
                    .find(|x| graph.neighbors(x.id, which).len() > 1)
                    .or_else(|| dropped.first())
                    .or_else(|| retained.first())
                    .map(|x| (x.id, Eviction::Unprotected))
            };
            let (evicted, eviction) = match choice.or_else(fallback) {
                Some(choice) => choice,
                None => break,
            };

            graph.remove_edge(node, evicted, which);
            evictions += 1;
            if let Eviction::Bridge(p) = eviction {
                graph.add_edge(p, evicted, which);
                if graph.neighbors(p, which).len() > budget {
                    pending.push(p);
                }
            }
        }
    }
    evictions
}

/// Find a detour that keeps `x` connected to `node` once their edge is gone
fn classify(
    graph: &NeighborGraph,
    ctx: &GraphContext<'_>,
    node: VectorId,
    x: &Scored,
    budget: usize,
    which: NeighborList,
) -> Eviction {
    let others: Vec<VectorId> = graph
        .neighbors(node, which)
        .iter()
        .copied()
        .filter(|&p| p != x.id)
        .collect();
    if others.iter().any(|&p| graph.has_edge(p, x.id, which)) {
        return Eviction::Covered;
    }

    let mut detours: Vec<Scored> = others
        .iter()
        .map(|&p| Scored {
            distance: ctx.distance_between(p, x.id),
            id: p,
        })
        .collect();
    sort_scored(&mut detours);
    detours
        .into_iter()
        .find(|p| p.distance < x.distance || graph.neighbors(p.id, which).len() < budget)
        .map_or(Eviction::Unprotected, |p| Eviction::Bridge(p.id))
}
