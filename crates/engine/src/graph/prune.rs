//! Diversity-aware neighbor selection
//!
//! Candidates are considered closest-first. A candidate `c` is kept only if no
//! already-kept neighbor `p` dominates it, where `p` dominates `c` when
//! `dist(p, c) < dist(id, c)`. For the augmented list a kept neighbor never
//! dominates a candidate whose attribute differs from its own by less than
//! `metadata_margin`, so such edges survive even when they are redundant on
//! pure distance. A margin of 0 disables the override; a margin of 1 protects
//! same-attribute edges, which keeps the subgraph of an equality filter
//! navigable.
//!
//! Selection is a pure function of its inputs. Mutation belongs to `build`.

use acorn_core::VectorId;

use super::{sort_scored, GraphContext, NeighborList, Scored};

/// Select up to `budget` neighbors of `id` from `candidates`.
///
/// `candidates` carry their distance to `id`. Duplicates and `id` itself are
/// ignored. The result is ordered by distance to `id`, then by id.
pub fn select_neighbors(
    ctx: &GraphContext<'_>,
    id: VectorId,
    candidates: &[Scored],
    budget: usize,
    which: NeighborList,
) -> Vec<Scored> {
    if budget == 0 {
        return Vec::new();
    }

    let mut sorted: Vec<Scored> = candidates.iter().copied().filter(|c| c.id != id).collect();
    sort_scored(&mut sorted);
    sorted.dedup_by_key(|c| c.id);

    let mut selected: Vec<Scored> = Vec::with_capacity(budget);
    let mut discarded = Vec::new();
    for c in &sorted {
        if selected.len() >= budget {
            break;
        }
        if is_dominated(ctx, c, &selected, which) {
            discarded.push(*c);
        } else {
            selected.push(*c);
        }
    }

    if ctx.keep_pruned && selected.len() < budget {
        let room = budget - selected.len();
        selected.extend(discarded.into_iter().take(room));
    }

    sort_scored(&mut selected);
    selected
}

fn is_dominated(
    ctx: &GraphContext<'_>,
    candidate: &Scored,
    selected: &[Scored],
    which: NeighborList,
) -> bool {
    let candidate_attr = ctx.metadata.get(candidate.id);
    selected.iter().any(|kept| {
        if which == NeighborList::Augmented && protects(ctx, kept.id, candidate_attr) {
            return false;
        }
        ctx.distance_between(kept.id, candidate.id) < candidate.distance
    })
}

/// Attributes closer than the margin shield a candidate from `kept`
fn protects(ctx: &GraphContext<'_>, kept: VectorId, candidate_attr: Option<i32>) -> bool {
    match (ctx.metadata.get(kept), candidate_attr) {
        (Some(a), Some(b)) => (i64::from(a) - i64::from(b)).unsigned_abs() < u64::from(ctx.metadata_margin),
        _ => false,
    }
}
