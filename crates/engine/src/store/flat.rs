//! Flat Storage - Contiguous full-precision vector storage
//!
//! Vectors live back to back in a single `Vec<f32>`; the offset of vector `id`
//! is `id * dimension`. Ids are never reused and there is no deletion, so no
//! offset map or free list is needed.

use acorn_core::{AcornError, AcornResult, VectorId};

use super::VectorStorage;

/// Contiguous full-precision vector arena
#[derive(Debug, Clone)]
pub struct FlatStorage {
    dimension: usize,
    /// Layout: [v0_dim0, v0_dim1, ..., v0_dimN, v1_dim0, v1_dim1, ...]
    data: Vec<f32>,
}

impl FlatStorage {
    /// Create an empty store for vectors of the given dimension
    pub fn new(dimension: usize) -> Self {
        FlatStorage {
            dimension,
            data: Vec::new(),
        }
    }

    /// Create from a flattened row-major buffer
    ///
    /// # Errors
    ///
    /// Returns `MalformedBatch` if `data` is not a whole number of vectors.
    pub fn from_flat(dimension: usize, data: Vec<f32>) -> AcornResult<Self> {
        if dimension == 0 {
            return Err(AcornError::InvalidDimension { dimension });
        }
        if data.len() % dimension != 0 {
            return Err(AcornError::MalformedBatch {
                len: data.len(),
                dimension,
            });
        }
        Ok(FlatStorage { dimension, data })
    }

    /// Raw flattened data
    pub fn as_flat(&self) -> &[f32] {
        &self.data
    }

    /// Iterate all vectors in id order
    pub fn iter(&self) -> impl Iterator<Item = (VectorId, &[f32])> {
        self.data
            .chunks_exact(self.dimension.max(1))
            .enumerate()
            .map(|(i, v)| (VectorId::from(i), v))
    }
}

impl VectorStorage for FlatStorage {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    fn append(&mut self, vector: &[f32]) -> AcornResult<VectorId> {
        if vector.len() != self.dimension {
            return Err(AcornError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        let id = VectorId::from(self.len());
        self.data.extend_from_slice(vector);
        Ok(id)
    }

    fn get(&self, id: VectorId) -> Option<&[f32]> {
        let start = id.as_usize().checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.data.get(start..end)
    }

    fn reset(&mut self) {
        self.data.clear();
    }
}
