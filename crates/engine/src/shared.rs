//! Readers-writer handle around an index
//!
//! Many searches may run at once; an insert, train or reset waits for them
//! to drain and blocks new ones until it finishes. The handle is cheap to
//! clone and can be sent to worker threads.

use std::sync::Arc;

use acorn_core::{
    AcornConfig, AcornResult, FilterMask, Predicate, SearchHit, SearchParams, SearchResults,
    VectorId,
};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::index::AcornIndex;
use crate::store::{FlatStorage, VectorStorage};

/// Clone-able, thread-safe index handle
pub struct SharedIndex<S: VectorStorage = FlatStorage> {
    inner: Arc<RwLock<AcornIndex<S>>>,
}

impl<S: VectorStorage> Clone for SharedIndex<S> {
    fn clone(&self) -> Self {
        SharedIndex {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedIndex<FlatStorage> {
    /// Create an empty shared index over full-precision storage
    pub fn with_config(config: AcornConfig) -> AcornResult<Self> {
        Ok(Self::new(AcornIndex::new(config)?))
    }
}

impl<S: VectorStorage> SharedIndex<S> {
    /// Wrap an index
    pub fn new(index: AcornIndex<S>) -> Self {
        SharedIndex {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Insert a batch under the write lock
    pub fn add(&self, vectors: &[f32], attributes: &[i32]) -> AcornResult<Vec<VectorId>> {
        self.inner.write().add(vectors, attributes)
    }

    /// Insert one vector under the write lock
    pub fn add_one(&self, vector: &[f32], attribute: i32) -> AcornResult<VectorId> {
        self.inner.write().add_one(vector, attribute)
    }

    /// Train the storage under the write lock
    pub fn train(&self, vectors: &[f32]) -> AcornResult<()> {
        self.inner.write().train(vectors)
    }

    /// Clear the index under the write lock
    pub fn reset(&self) {
        self.inner.write().reset();
    }

    /// Batch search under a read lock
    pub fn search(
        &self,
        queries: &[f32],
        k: usize,
        masks: Option<&[FilterMask]>,
    ) -> AcornResult<SearchResults> {
        self.inner.read().search(queries, k, masks)
    }

    /// Batch search with explicit knobs under a read lock
    pub fn search_with_params(
        &self,
        queries: &[f32],
        k: usize,
        masks: Option<&[FilterMask]>,
        params: &SearchParams,
    ) -> AcornResult<SearchResults> {
        self.inner.read().search_with_params(queries, k, masks, params)
    }

    /// Single-query search under a read lock
    pub fn search_one(
        &self,
        query: &[f32],
        k: usize,
        mask: Option<&FilterMask>,
        params: &SearchParams,
    ) -> AcornResult<Vec<SearchHit>> {
        self.inner.read().search_one(query, k, mask, params)
    }

    /// Predicate search under a read lock
    pub fn search_with_predicate(
        &self,
        query: &[f32],
        k: usize,
        predicate: &Predicate,
    ) -> AcornResult<Vec<SearchHit>> {
        self.inner.read().search_with_predicate(query, k, predicate)
    }

    /// Stored vector for `id`
    pub fn reconstruct(&self, id: VectorId) -> AcornResult<Vec<f32>> {
        self.inner.read().reconstruct(id)
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Hold a read guard across several calls
    pub fn read(&self) -> RwLockReadGuard<'_, AcornIndex<S>> {
        self.inner.read()
    }

    /// Hold the write guard across several calls
    pub fn write(&self) -> RwLockWriteGuard<'_, AcornIndex<S>> {
        self.inner.write()
    }
}
