//! Observability hooks
//!
//! The index reports per-insertion and per-search events to an injected
//! [`IndexObserver`]. Observers are called synchronously on the thread doing
//! the work, so implementations must be cheap and `Send + Sync` (searches run
//! in parallel).
//!
//! Logging itself goes through `tracing` with target `acorn::index`; the
//! [`TracingObserver`] additionally emits one `trace!` event per callback.

use std::sync::atomic::{AtomicU64, Ordering};

use acorn_core::VectorId;
use tracing::trace;

/// Work done by one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose distance to the query was evaluated during traversal
    pub visited: usize,
    /// Distance computations performed
    pub distance_computations: usize,
    /// Filter-passing results returned
    pub accepted: usize,
    /// Whether the passing ids were scanned exactly instead of traversed
    pub exhaustive: bool,
    /// Whether the visited-node cap stopped the traversal early
    pub capped: bool,
}

impl SearchStats {
    /// Accumulate another search's counters
    pub fn merge(&mut self, other: &SearchStats) {
        self.visited += other.visited;
        self.distance_computations += other.distance_computations;
        self.accepted += other.accepted;
        self.exhaustive |= other.exhaustive;
        self.capped |= other.capped;
    }
}

/// Outcome of inserting one vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertEvent {
    /// Id assigned to the vector
    pub id: VectorId,
    /// Attribute recorded for it
    pub attribute: i32,
    /// Size of the candidate pool gathered before pruning
    pub candidates: usize,
    /// Final base-list degree of the new node
    pub base_degree: usize,
    /// Final augmented-list degree of the new node
    pub augmented_degree: usize,
    /// Edges evicted from neighbor lists that a back-edge overflowed
    pub back_edge_prunes: usize,
}

/// Receives index events
pub trait IndexObserver: Send + Sync {
    /// Called after each vector is linked into the graph
    fn on_insert(&self, _event: &InsertEvent) {}

    /// Called after each query completes
    fn on_search(&self, _stats: &SearchStats) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl IndexObserver for NoopObserver {}

/// Observer that aggregates counters
#[derive(Debug, Default)]
pub struct CountingObserver {
    inserts: AtomicU64,
    searches: AtomicU64,
    visited: AtomicU64,
    distance_computations: AtomicU64,
    exhaustive: AtomicU64,
    capped: AtomicU64,
    back_edge_prunes: AtomicU64,
}

impl CountingObserver {
    /// Create a zeroed counter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Vectors inserted
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Queries answered
    pub fn searches(&self) -> u64 {
        self.searches.load(Ordering::Relaxed)
    }

    /// Nodes visited across all searches
    pub fn visited(&self) -> u64 {
        self.visited.load(Ordering::Relaxed)
    }

    /// Distance computations across all searches
    pub fn distance_computations(&self) -> u64 {
        self.distance_computations.load(Ordering::Relaxed)
    }

    /// Searches answered by the exhaustive path
    pub fn exhaustive_searches(&self) -> u64 {
        self.exhaustive.load(Ordering::Relaxed)
    }

    /// Searches stopped by the visit cap
    pub fn capped_searches(&self) -> u64 {
        self.capped.load(Ordering::Relaxed)
    }

    /// Back-edge re-prunes across all inserts
    pub fn back_edge_prunes(&self) -> u64 {
        self.back_edge_prunes.load(Ordering::Relaxed)
    }
}

impl IndexObserver for CountingObserver {
    fn on_insert(&self, event: &InsertEvent) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.back_edge_prunes
            .fetch_add(event.back_edge_prunes as u64, Ordering::Relaxed);
    }

    fn on_search(&self, stats: &SearchStats) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        self.visited.fetch_add(stats.visited as u64, Ordering::Relaxed);
        self.distance_computations
            .fetch_add(stats.distance_computations as u64, Ordering::Relaxed);
        if stats.exhaustive {
            self.exhaustive.fetch_add(1, Ordering::Relaxed);
        }
        if stats.capped {
            self.capped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Observer that emits a `trace!` event per callback
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl IndexObserver for TracingObserver {
    fn on_insert(&self, event: &InsertEvent) {
        trace!(
            target: "acorn::index",
            id = event.id.as_u64(),
            attribute = event.attribute,
            candidates = event.candidates,
            base_degree = event.base_degree,
            augmented_degree = event.augmented_degree,
            back_edge_prunes = event.back_edge_prunes,
            "Inserted vector"
        );
    }

    fn on_search(&self, stats: &SearchStats) {
        trace!(
            target: "acorn::index",
            visited = stats.visited,
            distance_computations = stats.distance_computations,
            accepted = stats.accepted,
            exhaustive = stats.exhaustive,
            capped = stats.capped,
            "Search completed"
        );
    }
}
