//! Identifier, metric and result types shared by every layer
//!
//! - `VectorId`: dense insertion-order identifier
//! - `MetricKind`: distance function identifier (L2, inner product)
//! - `SearchHit`: a single ranked result
//! - `SearchResults`: row-major batch output with sentinel padding

use serde::{Deserialize, Serialize};

/// Label written into padded result slots when a query has fewer than `k`
/// filter-passing vectors.
pub const NO_RESULT_LABEL: i64 = -1;

/// Dense vector identifier
///
/// Assigned sequentially at insertion starting from 0 and stable for the
/// lifetime of the index. Ids double as offsets into the vector store, the
/// metadata table and the neighbor graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VectorId(pub u64);

impl VectorId {
    /// Create a new VectorId
    pub fn new(id: u64) -> Self {
        VectorId(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Offset of this id into dense per-vector tables
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for VectorId {
    fn from(offset: usize) -> Self {
        VectorId(offset as u64)
    }
}

impl std::fmt::Display for VectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Distance function identifier
///
/// Traversal code always ranks "lower = closer". Reported values follow the
/// usual conventions of each metric:
/// - `L2`: squared Euclidean distance, lower = closer
/// - `InnerProduct`: raw inner product, higher = closer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Squared Euclidean distance
    #[default]
    L2,
    /// Inner product (maximum inner product search)
    InnerProduct,
}

impl MetricKind {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::L2 => "l2",
            MetricKind::InnerProduct => "inner_product",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "l2" | "euclidean" => Some(MetricKind::L2),
            "ip" | "inner_product" | "dot" | "dot_product" => Some(MetricKind::InnerProduct),
            _ => None,
        }
    }

    /// Reported value used to pad result rows that have no hit
    pub fn worst_reported(&self) -> f32 {
        match self {
            MetricKind::L2 => f32::INFINITY,
            MetricKind::InnerProduct => f32::NEG_INFINITY,
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single search result: id and reported distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Matching vector
    pub id: VectorId,
    /// Reported distance (see [`MetricKind`] for the convention)
    pub distance: f32,
}

/// Batch search output
///
/// `distances` and `labels` are parallel arrays of length `k * num_queries`,
/// row-major per query. Rows with fewer than `k` hits are padded with
/// [`NO_RESULT_LABEL`] and the metric's worst reported value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Requested results per query
    pub k: usize,
    /// Reported distances, row-major
    pub distances: Vec<f32>,
    /// Vector ids as signed labels, row-major
    pub labels: Vec<i64>,
}

impl SearchResults {
    /// Assemble a batch from per-query hit lists, padding short rows.
    pub fn from_rows(k: usize, rows: Vec<Vec<SearchHit>>, metric: MetricKind) -> Self {
        let mut distances = Vec::with_capacity(k * rows.len());
        let mut labels = Vec::with_capacity(k * rows.len());
        for row in rows {
            let filled = row.len().min(k);
            for hit in row.into_iter().take(k) {
                distances.push(hit.distance);
                labels.push(hit.id.as_u64() as i64);
            }
            for _ in filled..k {
                distances.push(metric.worst_reported());
                labels.push(NO_RESULT_LABEL);
            }
        }
        SearchResults {
            k,
            distances,
            labels,
        }
    }

    /// Number of query rows in this batch
    pub fn num_queries(&self) -> usize {
        if self.k == 0 {
            0
        } else {
            self.labels.len() / self.k
        }
    }

    /// Raw row `i` including sentinel padding
    pub fn row(&self, i: usize) -> (&[f32], &[i64]) {
        let start = i * self.k;
        let end = start + self.k;
        (&self.distances[start..end], &self.labels[start..end])
    }

    /// Hits of row `i` with sentinel padding dropped
    pub fn hits(&self, i: usize) -> Vec<SearchHit> {
        let (distances, labels) = self.row(i);
        labels
            .iter()
            .zip(distances.iter())
            .filter(|(&label, _)| label != NO_RESULT_LABEL)
            .map(|(&label, &distance)| SearchHit {
                id: VectorId::new(label as u64),
                distance,
            })
            .collect()
    }
}
