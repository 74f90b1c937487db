//! Distance functions and the `Metric` capability
//!
//! Every traversal and pruning step ranks by `Metric::distance`, which is
//! always "lower = closer". `Metric::report` converts an internal distance to
//! the value handed back to callers.
//!
//! Functions are single-threaded and never normalize their inputs.

use acorn_core::MetricKind;

/// Distance capability injected into the graph
pub trait Metric: Send + Sync {
    /// Which metric this is
    fn kind(&self) -> MetricKind;

    /// Internal distance between two vectors (lower = closer)
    fn distance(&self, a: &[f32], b: &[f32]) -> f32;

    /// Convert an internal distance into the reported value
    fn report(&self, distance: f32) -> f32;

    /// Reported value for an empty result slot
    fn worst(&self) -> f32 {
        self.kind().worst_reported()
    }
}

/// Squared Euclidean distance
#[derive(Debug, Clone, Copy, Default)]
pub struct L2;

impl Metric for L2 {
    fn kind(&self) -> MetricKind {
        MetricKind::L2
    }

    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        l2_squared(a, b)
    }

    fn report(&self, distance: f32) -> f32 {
        distance
    }
}

/// Inner product, ranked by its negation
#[derive(Debug, Clone, Copy, Default)]
pub struct InnerProduct;

impl Metric for InnerProduct {
    fn kind(&self) -> MetricKind {
        MetricKind::InnerProduct
    }

    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        -inner_product(a, b)
    }

    fn report(&self, distance: f32) -> f32 {
        -distance
    }
}

/// Metric implementation for a metric identifier
pub fn metric_for(kind: MetricKind) -> Box<dyn Metric> {
    match kind {
        MetricKind::L2 => Box::new(L2),
        MetricKind::InnerProduct => Box::new(InnerProduct),
    }
}

/// Squared L2 distance: sum((a_i - b_i)^2)
#[inline]
pub fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Dimension mismatch in distance computation");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Inner product: sum(a_i * b_i)
#[inline]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Dimension mismatch in distance computation");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
