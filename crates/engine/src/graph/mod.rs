//! Neighbor graph: two bounded, undirected adjacency lists per vector
//!
//! Nodes live in a flat arena indexed by `VectorId`; neighbor lists hold ids,
//! never references, so the cyclic edge structure has no ownership cycles.
//!
//! ## Lists
//!
//! - `Base`: up to `m_beta` neighbors chosen for proximity only
//! - `Augmented`: up to `m` neighbors chosen from a `gamma`-fold larger
//!   candidate pool with attribute-aware pruning; searches traverse this list
//!
//! ## Invariants
//!
//! - Symmetry: `b ∈ list(a)` iff `a ∈ list(b)`, per list kind, after every insert
//! - Degree: `|base| <= m_beta`, `|augmented| <= m`
//! - Entry point: the first inserted node, until the graph is reset
//!
//! Construction (`build`) is the only writer. Search (`search`) only reads.

pub mod build;
pub mod prune;
pub mod search;
pub(crate) mod visited;

use std::cmp::Ordering;

use acorn_core::VectorId;
use serde::{Deserialize, Serialize};

use crate::distance::Metric;
use crate::store::{MetadataTable, VectorStorage};

/// Which of a node's two neighbor lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeighborList {
    /// Proximity-only list bounded by `m_beta`
    Base,
    /// Attribute-aware list bounded by `m`
    Augmented,
}

impl NeighborList {
    /// Both list kinds, base first
    pub const ALL: [NeighborList; 2] = [NeighborList::Base, NeighborList::Augmented];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            NeighborList::Base => "base",
            NeighborList::Augmented => "augmented",
        }
    }
}

/// Graph-side representation of one vector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    base: Vec<VectorId>,
    augmented: Vec<VectorId>,
}

impl Node {
    fn list(&self, which: NeighborList) -> &Vec<VectorId> {
        match which {
            NeighborList::Base => &self.base,
            NeighborList::Augmented => &self.augmented,
        }
    }

    fn list_mut(&mut self, which: NeighborList) -> &mut Vec<VectorId> {
        match which {
            NeighborList::Base => &mut self.base,
            NeighborList::Augmented => &mut self.augmented,
        }
    }
}

/// Arena of nodes plus the search entry point
#[derive(Debug, Clone, Default)]
pub struct NeighborGraph {
    nodes: Vec<Node>,
    entry_point: Option<VectorId>,
}

impl NeighborGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node every traversal starts from
    pub fn entry_point(&self) -> Option<VectorId> {
        self.entry_point
    }

    /// Append a node with empty lists. The first node becomes the entry point.
    pub fn push_node(&mut self) -> VectorId {
        let id = VectorId::from(self.nodes.len());
        self.nodes.push(Node::default());
        if self.entry_point.is_none() {
            self.entry_point = Some(id);
        }
        id
    }

    /// Ordered neighbor list of `id` (empty for unknown ids)
    pub fn neighbors(&self, id: VectorId, which: NeighborList) -> &[VectorId] {
        self.nodes
            .get(id.as_usize())
            .map(|n| n.list(which).as_slice())
            .unwrap_or(&[])
    }

    /// Whether `b` is in `a`'s list
    pub fn has_edge(&self, a: VectorId, b: VectorId, which: NeighborList) -> bool {
        self.neighbors(a, which).contains(&b)
    }

    /// Add the undirected edge `a - b`. Idempotent; returns whether anything changed.
    pub fn add_edge(&mut self, a: VectorId, b: VectorId, which: NeighborList) -> bool {
        if a == b || a.as_usize() >= self.nodes.len() || b.as_usize() >= self.nodes.len() {
            return false;
        }
        let mut changed = false;
        for (from, to) in [(a, b), (b, a)] {
            let list = self.nodes[from.as_usize()].list_mut(which);
            if !list.contains(&to) {
                list.push(to);
                changed = true;
            }
        }
        changed
    }

    /// Remove the undirected edge `a - b`; returns whether anything changed.
    pub fn remove_edge(&mut self, a: VectorId, b: VectorId, which: NeighborList) -> bool {
        let first = self.remove_directed(a, b, which);
        let second = self.remove_directed(b, a, which);
        first || second
    }

    /// Replace `id`'s list without touching other nodes.
    ///
    /// Callers own symmetry; `build` follows this with `push_directed` on each listed node.
    pub(crate) fn set_neighbors(&mut self, id: VectorId, which: NeighborList, list: Vec<VectorId>) {
        if let Some(node) = self.nodes.get_mut(id.as_usize()) {
            *node.list_mut(which) = list;
        }
    }

    pub(crate) fn push_directed(&mut self, from: VectorId, to: VectorId, which: NeighborList) {
        if let Some(node) = self.nodes.get_mut(from.as_usize()) {
            let list = node.list_mut(which);
            if !list.contains(&to) {
                list.push(to);
            }
        }
    }

    pub(crate) fn remove_directed(&mut self, from: VectorId, to: VectorId, which: NeighborList) -> bool {
        match self.nodes.get_mut(from.as_usize()) {
            Some(node) => {
                let list = node.list_mut(which);
                let before = list.len();
                list.retain(|&n| n != to);
                list.len() != before
            }
            None => false,
        }
    }

    /// Undirected edges of one list kind, each reported once as `(low, high)`
    pub fn edges(&self, which: NeighborList) -> impl Iterator<Item = (VectorId, VectorId)> + '_ {
        self.nodes.iter().enumerate().flat_map(move |(i, node)| {
            let a = VectorId::from(i);
            node.list(which)
                .iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    /// Build a graph from raw adjacency lists (persistence payloads)
    pub(crate) fn from_lists(
        base: Vec<Vec<VectorId>>,
        augmented: Vec<Vec<VectorId>>,
        entry_point: Option<VectorId>,
    ) -> Self {
        let nodes = base
            .into_iter()
            .zip(augmented)
            .map(|(base, augmented)| Node { base, augmented })
            .collect();
        NeighborGraph { nodes, entry_point }
    }

    /// Drop every node; the entry point becomes undefined
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.entry_point = None;
    }
}

/// Read-only view of everything distance computations need
///
/// Storage and metric are injected capabilities; the graph never owns them.
pub struct GraphContext<'a> {
    /// Vector source
    pub storage: &'a dyn VectorStorage,
    /// Distance capability
    pub metric: &'a dyn Metric,
    /// Attribute column used by augmented pruning
    pub metadata: &'a MetadataTable,
    /// Attribute distance within which a kept neighbor may prune a candidate
    pub metadata_margin: u32,
    /// Fill under-full lists with the closest pruned candidates
    pub keep_pruned: bool,
}

impl GraphContext<'_> {
    /// Distance between two stored vectors (`+inf` if either is missing)
    pub(crate) fn distance_between(&self, a: VectorId, b: VectorId) -> f32 {
        match (self.storage.get(a), self.storage.get(b)) {
            (Some(x), Some(y)) => self.metric.distance(x, y),
            _ => f32::INFINITY,
        }
    }

    /// Distance from a query to a stored vector (`+inf` if missing)
    pub(crate) fn distance_to(&self, query: &[f32], id: VectorId) -> f32 {
        match self.storage.get(id) {
            Some(v) => self.metric.distance(query, v),
            None => f32::INFINITY,
        }
    }
}

/// Candidate with its internal distance
///
/// Ordered by (distance asc, VectorId asc): `BinaryHeap<Scored>` pops the
/// worst entry, `BinaryHeap<Reverse<Scored>>` pops the closest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    /// Internal distance (lower = closer)
    pub distance: f32,
    /// Candidate id
    pub id: VectorId,
}

impl Eq for Scored {}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            // Tie-break: lower VectorId ranks first
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Sort candidates by (distance asc, VectorId asc)
pub(crate) fn sort_scored(items: &mut [Scored]) {
    items.sort_by(|a, b| a.cmp(b));
}
