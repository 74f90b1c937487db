//! AcornIndex: the filtered ANN index facade
//!
//! Owns the vector storage, the metadata table and the neighbor graph, and
//! is the only thing callers touch. All inputs are validated before anything
//! is mutated, so a rejected call leaves the index unchanged.
//!
//! ## Determinism
//!
//! Insertion order defines topology: later vectors are linked against a graph
//! that already contains earlier ones. Identical add sequences produce
//! identical graphs, and identical (index, query, k, mask, params) produce
//! identical results, regardless of how batch queries are parallelized.
//!
//! ## Concurrency
//!
//! `search*` take `&self` and may run from many threads at once. `add`,
//! `train` and `reset` take `&mut self`. See `SharedIndex` for a
//! readers-writer handle.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use acorn_core::{
    AcornConfig, AcornError, AcornResult, FilterMask, MetricKind, Predicate, SearchHit,
    SearchParams, SearchResults, VectorId,
};
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::diagnostics::{self, FilteredGraphStats, GraphStats, InvariantViolation};
use crate::distance::{metric_for, Metric};
use crate::graph::{build, search, GraphContext, NeighborGraph, NeighborList};
use crate::observe::{IndexObserver, NoopObserver, SearchStats};
use crate::parts::IndexParts;
use crate::store::{FlatStorage, MetadataTable, VectorStorage};

/// Filtered approximate nearest neighbor index
pub struct AcornIndex<S: VectorStorage = FlatStorage> {
    config: AcornConfig,
    storage: S,
    metadata: MetadataTable,
    graph: NeighborGraph,
    metric: Box<dyn Metric>,
    observer: Arc<dyn IndexObserver>,
}

impl AcornIndex<FlatStorage> {
    /// Create an empty index over full-precision storage
    pub fn new(config: AcornConfig) -> AcornResult<Self> {
        let storage = FlatStorage::new(config.dimension);
        Self::with_storage(config, storage)
    }

    /// Rebuild an index from a persistence payload
    ///
    /// # Errors
    ///
    /// `InvalidParts` if the payload is inconsistent.
    pub fn from_parts(parts: IndexParts) -> AcornResult<Self> {
        let graph = parts.validate_graph()?;
        let storage = FlatStorage::from_flat(parts.config.dimension, parts.vectors)
            .map_err(|e| AcornError::InvalidParts(format!("vectors: {}", e)))?;
        let metric = metric_for(parts.config.metric);

        info!(
            target: "acorn::index",
            vectors = storage.len(),
            dimension = parts.config.dimension,
            "Index restored from parts"
        );

        Ok(AcornIndex {
            config: parts.config,
            storage,
            metadata: MetadataTable::from_vec(parts.attributes),
            graph,
            metric,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Flattened view of every stored vector
    pub fn vectors(&self) -> &[f32] {
        self.storage.as_flat()
    }
}

impl<S: VectorStorage> AcornIndex<S> {
    /// Create an empty index over caller-supplied storage
    ///
    /// # Errors
    ///
    /// - Invalid config
    /// - `DimensionMismatch` if the storage dimension differs from the config
    /// - `InvalidParameter` if the storage already holds vectors
    pub fn with_storage(config: AcornConfig, storage: S) -> AcornResult<Self> {
        config.validate()?;
        if storage.dimension() != config.dimension {
            return Err(AcornError::DimensionMismatch {
                expected: config.dimension,
                got: storage.dimension(),
            });
        }
        if !storage.is_empty() {
            return Err(AcornError::InvalidParameter {
                name: "storage",
                reason: format!("must be empty, holds {} vectors", storage.len()),
            });
        }

        info!(
            target: "acorn::index",
            dimension = config.dimension,
            m = config.m,
            m_beta = config.m_beta,
            gamma = config.gamma,
            metric = %config.metric,
            "Index created"
        );

        Ok(AcornIndex {
            metric: metric_for(config.metric),
            config,
            storage,
            metadata: MetadataTable::new(),
            graph: NeighborGraph::new(),
            observer: Arc::new(NoopObserver),
        })
    }

    /// Route insert and search events to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn IndexObserver>) -> Self {
        self.observer = observer;
        self
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a batch of flattened vectors with one attribute each.
    ///
    /// Vectors are linked in order; returns their ids.
    ///
    /// # Errors
    ///
    /// - `MalformedBatch` if `vectors.len()` is not a multiple of the dimension
    /// - `MetadataLengthMismatch` if the attribute count differs from the vector count
    /// - `InvalidParameter` if the storage is not trained
    pub fn add(&mut self, vectors: &[f32], attributes: &[i32]) -> AcornResult<Vec<VectorId>> {
        let count = self.batch_len(vectors)?;
        if attributes.len() != count {
            return Err(AcornError::MetadataLengthMismatch {
                vectors: count,
                attributes: attributes.len(),
            });
        }
        self.ensure_trained()?;

        let start = Instant::now();
        let mut ids = Vec::with_capacity(count);
        for (vector, &attribute) in vectors.chunks(self.config.dimension).zip(attributes) {
            ids.push(self.insert(vector, attribute)?);
        }

        debug!(
            target: "acorn::index",
            count,
            total = self.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Added vectors"
        );
        Ok(ids)
    }

    /// Insert one vector
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the vector has the wrong length.
    pub fn add_one(&mut self, vector: &[f32], attribute: i32) -> AcornResult<VectorId> {
        self.check_dimension(vector)?;
        self.ensure_trained()?;
        self.insert(vector, attribute)
    }

    fn insert(&mut self, vector: &[f32], attribute: i32) -> AcornResult<VectorId> {
        let id = self.storage.append(vector)?;
        self.metadata.append(id, attribute)?;

        let ctx = context(&self.storage, self.metric.as_ref(), &self.metadata, &self.config);
        let event = build::insert(&mut self.graph, &ctx, &self.config, id);

        trace!(
            target: "acorn::index",
            id = id.as_u64(),
            candidates = event.candidates,
            back_edge_prunes = event.back_edge_prunes,
            "Linked vector"
        );
        self.observer.on_insert(&event);
        Ok(id)
    }

    /// Train the storage's quantizer. A no-op for full-precision storage.
    ///
    /// # Errors
    ///
    /// `MalformedBatch` if `vectors.len()` is not a multiple of the dimension.
    pub fn train(&mut self, vectors: &[f32]) -> AcornResult<()> {
        self.batch_len(vectors)?;
        self.storage.train(vectors)
    }

    /// Whether the storage can accept vectors
    pub fn is_trained(&self) -> bool {
        self.storage.is_trained()
    }

    /// Drop every vector, attribute and edge. The config is kept.
    pub fn reset(&mut self) {
        let dropped = self.len();
        self.storage.reset();
        self.metadata.reset();
        self.graph.reset();
        info!(target: "acorn::index", dropped, "Index reset");
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Batch search with the config's default search knobs
    ///
    /// `queries` is flattened row-major. `masks`, when given, holds one mask
    /// per query, each as long as the index.
    pub fn search(
        &self,
        queries: &[f32],
        k: usize,
        masks: Option<&[FilterMask]>,
    ) -> AcornResult<SearchResults> {
        self.search_with_params(queries, k, masks, &SearchParams::from_config(&self.config))
    }

    /// Batch search with explicit knobs. Queries run in parallel.
    ///
    /// # Errors
    ///
    /// - `MalformedBatch` if `queries.len()` is not a multiple of the dimension
    /// - `MaskCountMismatch` if the mask count differs from the query count
    /// - `MaskLengthMismatch` if any mask is not as long as the index
    pub fn search_with_params(
        &self,
        queries: &[f32],
        k: usize,
        masks: Option<&[FilterMask]>,
        params: &SearchParams,
    ) -> AcornResult<SearchResults> {
        let num_queries = self.batch_len(queries)?;
        if let Some(masks) = masks {
            if masks.len() != num_queries {
                return Err(AcornError::MaskCountMismatch {
                    queries: num_queries,
                    masks: masks.len(),
                });
            }
            for mask in masks {
                self.check_mask(mask)?;
            }
        }

        let start = Instant::now();
        let dimension = self.config.dimension;
        let rows: Vec<(Vec<SearchHit>, SearchStats)> = (0..num_queries)
            .into_par_iter()
            .map(|i| {
                let query = &queries[i * dimension..(i + 1) * dimension];
                let mask = masks.map(|m| &m[i]);
                self.search_unchecked(query, k, mask, params)
            })
            .collect();

        let mut total = SearchStats::default();
        let rows: Vec<Vec<SearchHit>> = rows
            .into_iter()
            .map(|(hits, stats)| {
                total.merge(&stats);
                hits
            })
            .collect();

        debug!(
            target: "acorn::index",
            queries = num_queries,
            k,
            filtered = masks.is_some(),
            visited = total.visited,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Search batch completed"
        );
        Ok(SearchResults::from_rows(k, rows, self.config.metric))
    }

    /// Search a single query; at most `k` hits, closest first
    pub fn search_one(
        &self,
        query: &[f32],
        k: usize,
        mask: Option<&FilterMask>,
        params: &SearchParams,
    ) -> AcornResult<Vec<SearchHit>> {
        self.check_dimension(query)?;
        if let Some(mask) = mask {
            self.check_mask(mask)?;
        }
        Ok(self.search_unchecked(query, k, mask, params).0)
    }

    /// Search a single query restricted to vectors whose attribute matches
    pub fn search_with_predicate(
        &self,
        query: &[f32],
        k: usize,
        predicate: &Predicate,
    ) -> AcornResult<Vec<SearchHit>> {
        let mask = self.mask_for(predicate);
        self.search_one(query, k, Some(&mask), &SearchParams::from_config(&self.config))
    }

    /// Evaluate a predicate over the stored attributes
    pub fn mask_for(&self, predicate: &Predicate) -> FilterMask {
        predicate.to_mask(self.metadata.as_slice())
    }

    fn search_unchecked(
        &self,
        query: &[f32],
        k: usize,
        mask: Option<&FilterMask>,
        params: &SearchParams,
    ) -> (Vec<SearchHit>, SearchStats) {
        let ctx = context(&self.storage, self.metric.as_ref(), &self.metadata, &self.config);
        let (scored, stats) = search::filtered_search(&self.graph, &ctx, query, k, mask, params);
        self.observer.on_search(&stats);
        let hits = scored
            .into_iter()
            .map(|s| SearchHit {
                id: s.id,
                distance: self.metric.report(s.distance),
            })
            .collect();
        (hits, stats)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Stored vector for `id`
    ///
    /// # Errors
    ///
    /// - `EmptyIndex` if nothing has been added
    /// - `NotFound` if `id` is out of range
    pub fn reconstruct(&self, id: VectorId) -> AcornResult<Vec<f32>> {
        if self.is_empty() {
            return Err(AcornError::EmptyIndex);
        }
        self.storage
            .get(id)
            .map(|v| v.to_vec())
            .ok_or(AcornError::NotFound { id })
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Vector dimension
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Distance function
    pub fn metric(&self) -> MetricKind {
        self.config.metric
    }

    /// Construction parameters
    pub fn config(&self) -> &AcornConfig {
        &self.config
    }

    /// Underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Attribute of `id`
    pub fn attribute(&self, id: VectorId) -> Option<i32> {
        self.metadata.get(id)
    }

    /// Every stored attribute, indexed by id
    pub fn attributes(&self) -> &[i32] {
        self.metadata.as_slice()
    }

    /// Neighbor list of `id` (empty for unknown ids)
    pub fn neighbors(&self, id: VectorId, which: NeighborList) -> &[VectorId] {
        self.graph.neighbors(id, which)
    }

    /// Search entry point (`None` while empty)
    pub fn entry_point(&self) -> Option<VectorId> {
        self.graph.entry_point()
    }

    /// Degree distribution summary
    pub fn graph_stats(&self) -> GraphStats {
        GraphStats::compute(&self.graph)
    }

    /// Connectivity of the vectors passing `mask`
    pub fn filtered_stats(&self, mask: &FilterMask) -> FilteredGraphStats {
        diagnostics::filtered_stats(&self.graph, mask)
    }

    /// Structural violations; empty when the graph is healthy
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        diagnostics::check_invariants(&self.graph, &self.config)
    }

    /// Plain-data snapshot for serialization
    pub fn to_parts(&self) -> IndexParts {
        let n = self.len();
        let mut vectors = Vec::with_capacity(n * self.config.dimension);
        let mut base = Vec::with_capacity(n);
        let mut augmented = Vec::with_capacity(n);
        for i in 0..n {
            let id = VectorId::from(i);
            if let Some(v) = self.storage.get(id) {
                vectors.extend_from_slice(v);
            }
            base.push(self.graph.neighbors(id, NeighborList::Base).to_vec());
            augmented.push(self.graph.neighbors(id, NeighborList::Augmented).to_vec());
        }
        IndexParts {
            config: self.config.clone(),
            vectors,
            attributes: self.metadata.as_slice().to_vec(),
            base,
            augmented,
            entry_point: self.graph.entry_point(),
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn check_dimension(&self, vector: &[f32]) -> AcornResult<()> {
        if vector.len() != self.config.dimension {
            return Err(AcornError::DimensionMismatch {
                expected: self.config.dimension,
                got: vector.len(),
            });
        }
        Ok(())
    }

    fn batch_len(&self, flat: &[f32]) -> AcornResult<usize> {
        let dimension = self.config.dimension;
        if flat.len() % dimension != 0 {
            return Err(AcornError::MalformedBatch {
                len: flat.len(),
                dimension,
            });
        }
        Ok(flat.len() / dimension)
    }

    fn check_mask(&self, mask: &FilterMask) -> AcornResult<()> {
        if mask.len() != self.len() {
            return Err(AcornError::MaskLengthMismatch {
                expected: self.len(),
                got: mask.len(),
            });
        }
        Ok(())
    }

    fn ensure_trained(&self) -> AcornResult<()> {
        if !self.storage.is_trained() {
            return Err(AcornError::InvalidParameter {
                name: "storage",
                reason: "must be trained before vectors are added".to_string(),
            });
        }
        Ok(())
    }
}

impl<S: VectorStorage> fmt::Debug for AcornIndex<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcornIndex")
            .field("config", &self.config)
            .field("len", &self.len())
            .field("entry_point", &self.graph.entry_point())
            .finish()
    }
}

fn context<'a, S: VectorStorage>(
    storage: &'a S,
    metric: &'a dyn Metric,
    metadata: &'a MetadataTable,
    config: &AcornConfig,
) -> GraphContext<'a> {
    GraphContext {
        storage,
        metric,
        metadata,
        metadata_margin: config.metadata_margin,
        keep_pruned: config.keep_pruned,
    }
}
