//! Graph introspection for operational debugging
//!
//! Nothing here affects search results. `GraphStats` summarizes degree
//! distributions per neighbor list and how much of the graph a traversal from
//! the entry point can reach, `filtered_stats` reports how well the
//! passing subset of a mask is connected to itself, and `check_invariants`
//! re-verifies the structural guarantees construction is meant to uphold.

use std::collections::VecDeque;
use std::fmt;

use acorn_core::{AcornConfig, FilterMask, VectorId};

use crate::graph::build::degree_bound;
use crate::graph::{NeighborGraph, NeighborList};

/// Degree distribution of one neighbor list kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DegreeStats {
    /// Undirected edge count
    pub edges: usize,
    /// Smallest list length
    pub min: usize,
    /// Largest list length
    pub max: usize,
    /// Mean list length
    pub mean: f64,
    /// `histogram[d]` = number of nodes with degree `d`
    pub histogram: Vec<usize>,
}

impl DegreeStats {
    fn compute(graph: &NeighborGraph, which: NeighborList) -> Self {
        let n = graph.len();
        if n == 0 {
            return DegreeStats::default();
        }
        let mut histogram = Vec::new();
        let mut total = 0usize;
        let mut min = usize::MAX;
        let mut max = 0usize;
        for i in 0..n {
            let degree = graph.neighbors(VectorId::from(i), which).len();
            if histogram.len() <= degree {
                histogram.resize(degree + 1, 0);
            }
            histogram[degree] += 1;
            total += degree;
            min = min.min(degree);
            max = max.max(degree);
        }
        DegreeStats {
            edges: total / 2,
            min,
            max,
            mean: total as f64 / n as f64,
            histogram,
        }
    }
}

/// Snapshot of graph shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStats {
    /// Number of nodes
    pub nodes: usize,
    /// Search entry point
    pub entry_point: Option<VectorId>,
    /// Base list degrees
    pub base: DegreeStats,
    /// Augmented list degrees
    pub augmented: DegreeStats,
    /// Nodes without any augmented neighbor
    pub isolated: usize,
    /// Nodes a search can reach from the entry point over augmented edges
    pub reachable: usize,
}

impl GraphStats {
    /// Compute stats for a graph
    pub fn compute(graph: &NeighborGraph) -> Self {
        let augmented = DegreeStats::compute(graph, NeighborList::Augmented);
        let isolated = if graph.len() > 1 {
            augmented.histogram.first().copied().unwrap_or(0)
        } else {
            0
        };
        GraphStats {
            nodes: graph.len(),
            entry_point: graph.entry_point(),
            base: DegreeStats::compute(graph, NeighborList::Base),
            augmented,
            isolated,
            reachable: reachable_from_entry(graph),
        }
    }

    /// Nodes no search can ever return
    pub fn unreachable(&self) -> usize {
        self.nodes - self.reachable
    }

    /// Stats of one list kind
    pub fn list(&self, which: NeighborList) -> &DegreeStats {
        match which {
            NeighborList::Base => &self.base,
            NeighborList::Augmented => &self.augmented,
        }
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nodes={}", self.nodes)?;
        if let Some(entry) = self.entry_point {
            write!(f, " entry={}", entry)?;
        }
        for which in NeighborList::ALL {
            let s = self.list(which);
            write!(
                f,
                " {}[edges={} degree min/mean/max={}/{:.2}/{}]",
                which.name(),
                s.edges,
                s.min,
                s.mean,
                s.max
            )?;
        }
        write!(f, " isolated={} reachable={}", self.isolated, self.reachable)
    }
}

/// Breadth-first count of nodes reachable from the entry point over augmented edges
pub fn reachable_from_entry(graph: &NeighborGraph) -> usize {
    let entry = match graph.entry_point() {
        Some(e) if e.as_usize() < graph.len() => e,
        _ => return 0,
    };
    let mut seen = vec![false; graph.len()];
    let mut queue = VecDeque::new();
    seen[entry.as_usize()] = true;
    queue.push_back(entry);
    let mut count = 1;
    while let Some(id) = queue.pop_front() {
        for &n in graph.neighbors(id, NeighborList::Augmented) {
            if let Some(slot) = seen.get_mut(n.as_usize()) {
                if !*slot {
                    *slot = true;
                    count += 1;
                    queue.push_back(n);
                }
            }
        }
    }
    count
}

/// Connectivity of the passing subset of a mask
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredGraphStats {
    /// Passing nodes
    pub passing: usize,
    /// Augmented edges from passing nodes (directed count)
    pub edges_from_passing: usize,
    /// Of those, edges whose other endpoint also passes
    pub edges_within_passing: usize,
    /// Passing nodes with no passing augmented neighbor
    pub stranded: usize,
}

impl FilteredGraphStats {
    /// Fraction of a passing node's edges that stay inside the passing set
    pub fn within_ratio(&self) -> f64 {
        if self.edges_from_passing == 0 {
            0.0
        } else {
            self.edges_within_passing as f64 / self.edges_from_passing as f64
        }
    }
}

/// Report how the passing nodes of `mask` connect to each other
pub fn filtered_stats(graph: &NeighborGraph, mask: &FilterMask) -> FilteredGraphStats {
    let mut stats = FilteredGraphStats::default();
    for id in mask.passing_ids().filter(|id| id.as_usize() < graph.len()) {
        stats.passing += 1;
        let neighbors = graph.neighbors(id, NeighborList::Augmented);
        let within = neighbors.iter().filter(|&&n| mask.passes(n)).count();
        stats.edges_from_passing += neighbors.len();
        stats.edges_within_passing += within;
        if within == 0 {
            stats.stranded += 1;
        }
    }
    stats
}

/// A broken structural guarantee
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `to` is in `from`'s list but not the reverse
    Asymmetric {
        /// List kind
        which: NeighborList,
        /// Node holding the edge
        from: VectorId,
        /// Node missing the reverse edge
        to: VectorId,
    },
    /// A list is longer than its bound
    DegreeExceeded {
        /// List kind
        which: NeighborList,
        /// Offending node
        id: VectorId,
        /// Actual length
        degree: usize,
        /// Configured bound
        bound: usize,
    },
    /// A node lists itself
    SelfLoop {
        /// List kind
        which: NeighborList,
        /// Offending node
        id: VectorId,
    },
    /// A node lists the same neighbor twice
    DuplicateEdge {
        /// List kind
        which: NeighborList,
        /// Offending node
        id: VectorId,
        /// Repeated neighbor
        neighbor: VectorId,
    },
    /// A neighbor id beyond the graph
    DanglingEdge {
        /// List kind
        which: NeighborList,
        /// Offending node
        id: VectorId,
        /// Unknown neighbor
        neighbor: VectorId,
    },
    /// Entry point missing on a non-empty graph, or set on an empty one
    EntryPoint {
        /// Recorded entry point
        entry_point: Option<VectorId>,
        /// Node count
        nodes: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::Asymmetric { which, from, to } => {
                write!(f, "{} edge {} -> {} has no reverse edge", which.name(), from, to)
            }
            InvariantViolation::DegreeExceeded {
                which,
                id,
                degree,
                bound,
            } => write!(f, "{} degree of {} is {} (bound {})", which.name(), id, degree, bound),
            InvariantViolation::SelfLoop { which, id } => {
                write!(f, "{} list of {} contains itself", which.name(), id)
            }
            InvariantViolation::DuplicateEdge { which, id, neighbor } => {
                write!(f, "{} list of {} repeats {}", which.name(), id, neighbor)
            }
            InvariantViolation::DanglingEdge { which, id, neighbor } => {
                write!(f, "{} list of {} references unknown {}", which.name(), id, neighbor)
            }
            InvariantViolation::EntryPoint { entry_point, nodes } => {
                write!(f, "entry point {:?} invalid for {} nodes", entry_point, nodes)
            }
        }
    }
}

/// Verify symmetry, degree bounds and entry point; empty when healthy
pub fn check_invariants(graph: &NeighborGraph, config: &AcornConfig) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let n = graph.len();

    let entry_ok = match graph.entry_point() {
        None => n == 0,
        Some(entry) => n > 0 && entry.as_usize() < n,
    };
    if !entry_ok {
        violations.push(InvariantViolation::EntryPoint {
            entry_point: graph.entry_point(),
            nodes: n,
        });
    }

    for which in NeighborList::ALL {
        let bound = degree_bound(config, which);
        for i in 0..n {
            let id = VectorId::from(i);
            let list = graph.neighbors(id, which);
            if list.len() > bound {
                violations.push(InvariantViolation::DegreeExceeded {
                    which,
                    id,
                    degree: list.len(),
                    bound,
                });
            }
            for (pos, &neighbor) in list.iter().enumerate() {
                if neighbor == id {
                    violations.push(InvariantViolation::SelfLoop { which, id });
                } else if neighbor.as_usize() >= n {
                    violations.push(InvariantViolation::DanglingEdge { which, id, neighbor });
                } else if list[..pos].contains(&neighbor) {
                    violations.push(InvariantViolation::DuplicateEdge { which, id, neighbor });
                } else if !graph.has_edge(neighbor, id, which) {
                    violations.push(InvariantViolation::Asymmetric {
                        which,
                        from: id,
                        to: neighbor,
                    });
                }
            }
        }
    }
    violations
}
