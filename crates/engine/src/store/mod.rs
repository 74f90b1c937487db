//! Vector and metadata storage
//!
//! The graph never assumes a storage layout. It consumes vectors only through
//! the [`VectorStorage`] capability: append, random-access get, train, size.
//! - **FlatStorage**: contiguous full-precision arena
//! - **MetadataTable**: one integer attribute per vector

pub mod flat;
pub mod metadata;

pub use flat::FlatStorage;
pub use metadata::MetadataTable;

use acorn_core::{AcornResult, VectorId};

/// Storage capability consumed by the index
///
/// Ids are dense and sequential: the `n`-th appended vector gets id `n - 1`.
pub trait VectorStorage: Send + Sync {
    /// Dimension of stored vectors
    fn dimension(&self) -> usize;

    /// Number of stored vectors
    fn len(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a vector, returning its id
    fn append(&mut self, vector: &[f32]) -> AcornResult<VectorId>;

    /// Stored vector for `id`, or `None` if out of range
    fn get(&self, id: VectorId) -> Option<&[f32]>;

    /// Train an underlying quantizer on `vectors` (flattened, row-major).
    ///
    /// Full-precision storage has nothing to train.
    fn train(&mut self, _vectors: &[f32]) -> AcornResult<()> {
        Ok(())
    }

    /// Whether the storage is ready to accept vectors
    fn is_trained(&self) -> bool {
        true
    }

    /// Drop every stored vector
    fn reset(&mut self);
}
