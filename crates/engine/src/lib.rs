//! Filtered ANN engine for acorn
//!
//! This crate builds and searches the predicate-agnostic neighbor graph:
//! - Storage: vector storage capability, flat store, metadata table
//! - Distance: metric capability and kernels
//! - Graph: neighbor lists, pruning, construction, filtered search
//! - AcornIndex: the facade owning storage, metadata and graph
//! - SharedIndex: readers-writer handle for concurrent use
//! - Diagnostics, recall evaluation, observer hooks
//!
//! The index is the only component that mutates the graph. Search reads it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod brute_force;
pub mod diagnostics;
pub mod distance;
pub mod eval;
pub mod graph;
pub mod index;
pub mod observe;
pub mod parts;
pub mod shared;
pub mod store;

pub use diagnostics::{DegreeStats, FilteredGraphStats, GraphStats, InvariantViolation};
pub use distance::{metric_for, InnerProduct, Metric, L2};
pub use graph::{NeighborGraph, NeighborList};
pub use index::AcornIndex;
pub use observe::{
    CountingObserver, IndexObserver, InsertEvent, NoopObserver, SearchStats, TracingObserver,
};
pub use parts::IndexParts;
pub use shared::SharedIndex;
pub use store::{FlatStorage, MetadataTable, VectorStorage};
