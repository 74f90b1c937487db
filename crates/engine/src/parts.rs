//! Persistence payload
//!
//! `IndexParts` is the complete state of an index in plain data: config,
//! vectors, attributes and both adjacency lists. Serializers at the boundary
//! decide the on-disk format; this module only validates a payload before it
//! is turned back into an index.

use acorn_core::{AcornConfig, AcornError, AcornResult, VectorId};
use serde::{Deserialize, Serialize};

use crate::diagnostics::check_invariants;
use crate::graph::NeighborGraph;

/// Plain-data snapshot of an index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexParts {
    /// Construction parameters
    pub config: AcornConfig,
    /// Vectors, flattened row-major
    pub vectors: Vec<f32>,
    /// One attribute per vector
    pub attributes: Vec<i32>,
    /// Base neighbor list per vector
    pub base: Vec<Vec<VectorId>>,
    /// Augmented neighbor list per vector
    pub augmented: Vec<Vec<VectorId>>,
    /// Search entry point (`None` only for an empty index)
    pub entry_point: Option<VectorId>,
}

impl IndexParts {
    /// Number of vectors described by the attribute column
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the payload holds no vectors
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Check lengths, id ranges, degree bounds and symmetry, then rebuild
    /// the graph.
    ///
    /// # Errors
    ///
    /// `InvalidParts` describing the first problem found.
    pub(crate) fn validate_graph(&self) -> AcornResult<NeighborGraph> {
        self.config
            .validate()
            .map_err(|e| AcornError::InvalidParts(format!("config: {}", e)))?;

        let n = self.attributes.len();
        let dimension = self.config.dimension;
        if self.vectors.len() != n * dimension {
            return Err(AcornError::InvalidParts(format!(
                "{} floats for {} vectors of dimension {}",
                self.vectors.len(),
                n,
                dimension
            )));
        }
        if self.base.len() != n || self.augmented.len() != n {
            return Err(AcornError::InvalidParts(format!(
                "{} vectors but {} base and {} augmented lists",
                n,
                self.base.len(),
                self.augmented.len()
            )));
        }

        let graph = NeighborGraph::from_lists(
            self.base.clone(),
            self.augmented.clone(),
            self.entry_point,
        );
        if let Some(violation) = check_invariants(&graph, &self.config).into_iter().next() {
            return Err(AcornError::InvalidParts(violation.to_string()));
        }
        Ok(graph)
    }
}
