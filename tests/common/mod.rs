//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Once;

pub use acorn::{
    brute_force, eval, metric_for, AcornConfig, AcornError, AcornIndex, CountingObserver,
    FilterMask, IndexObserver, IndexParts, MetricKind, NeighborList, Predicate, SearchHit,
    SearchParams, SearchResults, SharedIndex, TracingObserver, VectorId, NO_RESULT_LABEL,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::filter::LevelFilter;

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output to the test harness (captured unless --nocapture).
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Data generators
// ============================================================================

/// Deterministic RNG for a test
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `n` vectors of dimension `dim`, components uniform in [0, 1), flattened
pub fn random_vectors(rng: &mut StdRng, n: usize, dim: usize) -> Vec<f32> {
    (0..n * dim).map(|_| rng.gen::<f32>()).collect()
}

/// `n` attributes uniform in `0..cardinality`
pub fn random_attributes(rng: &mut StdRng, n: usize, cardinality: i32) -> Vec<i32> {
    (0..n).map(|_| rng.gen_range(0..cardinality)).collect()
}

/// Random mask with roughly `selectivity` of `n` vectors passing
pub fn random_mask(rng: &mut StdRng, n: usize, selectivity: f64) -> FilterMask {
    FilterMask::from_bools((0..n).map(|_| rng.gen_bool(selectivity)).collect())
}

// ============================================================================
// Index helpers
// ============================================================================

/// Config used by the scenario tests: d=2, M=4, M_beta=2, gamma=2
pub fn small_config() -> AcornConfig {
    AcornConfig::new(2, 4, 2, 2, MetricKind::L2).unwrap()
}

/// Config for the recall suites
pub fn recall_config(dim: usize) -> AcornConfig {
    AcornConfig::new(dim, 16, 8, 4, MetricKind::L2)
        .unwrap()
        .with_ef_search(100)
}

/// The four-point fixture: (0,0), (1,0), (0,1), (5,5)
pub fn four_point_index() -> AcornIndex {
    let mut index = AcornIndex::new(small_config()).unwrap();
    index
        .add(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 5.0, 5.0], &[1, 2, 1, 2])
        .unwrap();
    index
}

/// Build an index over `n` seeded random vectors with attributes in `0..cardinality`
pub fn random_index(config: AcornConfig, n: usize, cardinality: i32, seed: u64) -> AcornIndex {
    let mut rng = seeded_rng(seed);
    let vectors = random_vectors(&mut rng, n, config.dimension);
    let attributes = random_attributes(&mut rng, n, cardinality);
    let mut index = AcornIndex::new(config).unwrap();
    index.add(&vectors, &attributes).unwrap();
    index
}

/// Force graph traversal regardless of filter size
pub fn graph_only(index: &AcornIndex) -> SearchParams {
    SearchParams::from_config(index.config()).with_exhaustive_threshold(0)
}

/// Exact results for a batch of queries
pub fn exact(
    index: &AcornIndex,
    queries: &[f32],
    k: usize,
    masks: Option<&[FilterMask]>,
) -> SearchResults {
    let metric = metric_for(index.metric());
    brute_force::ground_truth(index.storage(), metric.as_ref(), queries, k, masks)
}

/// Ids of row `i`, sentinels dropped
pub fn row_ids(results: &SearchResults, i: usize) -> Vec<u64> {
    results.hits(i).iter().map(|h| h.id.as_u64()).collect()
}

/// Ids of a hit list
pub fn hit_ids(hits: &[SearchHit]) -> Vec<u64> {
    hits.iter().map(|h| h.id.as_u64()).collect()
}
