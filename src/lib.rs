//! acorn - predicate-robust approximate nearest neighbor search
//!
//! acorn indexes dense `f32` vectors, each tagged with one integer
//! attribute, and answers top-k queries restricted to the vectors a
//! per-query filter mask lets through. The graph is built without knowing
//! future predicates, so the same index serves any filter.
//!
//! # Quick Start
//!
//! ```
//! use acorn::{AcornConfig, AcornIndex, FilterMask, MetricKind, VectorId};
//!
//! let config = AcornConfig::new(2, 4, 2, 2, MetricKind::L2)?;
//! let mut index = AcornIndex::new(config)?;
//! index.add(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 5.0, 5.0], &[1, 2, 1, 2])?;
//!
//! // Exclude the two closest vectors
//! let mask = FilterMask::from_ids(4, [VectorId::new(2), VectorId::new(3)]);
//! let results = index.search(&[0.1, 0.1], 2, Some(&[mask]))?;
//! assert_eq!(results.row(0).1, &[2, 3]);
//! # Ok::<(), acorn::AcornError>(())
//! ```
//!
//! # Architecture
//!
//! - `acorn-core`: ids, config, masks, predicates, errors, result layout
//! - `acorn-engine`: storage, metrics, the neighbor graph and the index facade
//!
//! Everything callers need is re-exported here.

pub use acorn_core::*;
pub use acorn_engine::*;
