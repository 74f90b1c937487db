//! Per-query filter masks
//!
//! A mask is a dense boolean array index-aligned with `VectorId`: entry `i`
//! says whether vector `i` satisfies the caller's predicate for one query.
//! Masks are owned by the caller and only read for the duration of a search.
//!
//! Sparse masks (at most one passing vector in eight) also keep their passing
//! ids, so the exact-scan path for selective filters does not walk every bit.

use crate::error::{AcornError, AcornResult};
use crate::types::VectorId;

/// A mask keeps its passing ids when `count * SPARSE_RATIO <= len`
const SPARSE_RATIO: usize = 8;

/// Dense per-vector pass/fail mask for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMask {
    bits: Vec<bool>,
    count: usize,
    sparse_ids: Option<Vec<VectorId>>,
}

impl FilterMask {
    /// Mask where every one of `len` vectors passes
    pub fn all_pass(len: usize) -> Self {
        Self::from_bools(vec![true; len])
    }

    /// Mask from booleans
    pub fn from_bools(bits: Vec<bool>) -> Self {
        let count = bits.iter().filter(|&&b| b).count();
        let sparse_ids = (count.saturating_mul(SPARSE_RATIO) <= bits.len()).then(|| {
            bits.iter()
                .enumerate()
                .filter(|(_, &b)| b)
                .map(|(i, _)| VectorId::from(i))
                .collect()
        });
        FilterMask {
            bits,
            count,
            sparse_ids,
        }
    }

    /// Mask from a byte map where any non-zero byte passes.
    ///
    /// This is the `char` bitmap layout used across language bindings.
    pub fn from_bytes<B: Copy + Into<i16>>(bytes: &[B]) -> Self {
        Self::from_bools(bytes.iter().map(|&b| b.into() != 0).collect())
    }

    /// Mask with exactly the given ids passing
    pub fn from_ids(len: usize, ids: impl IntoIterator<Item = VectorId>) -> Self {
        let mut bits = vec![false; len];
        for id in ids {
            if let Some(bit) = bits.get_mut(id.as_usize()) {
                *bit = true;
            }
        }
        Self::from_bools(bits)
    }

    /// Whether `id` passes. Ids beyond the mask never pass.
    #[inline]
    pub fn passes(&self, id: VectorId) -> bool {
        self.bits.get(id.as_usize()).copied().unwrap_or(false)
    }

    /// Number of entries (should equal the number of stored vectors)
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the mask has no entries
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of passing vectors
    pub fn count(&self) -> usize {
        self.count
    }

    /// Fraction of vectors passing (0.0 for an empty mask)
    pub fn selectivity(&self) -> f64 {
        if self.bits.is_empty() {
            0.0
        } else {
            self.count as f64 / self.bits.len() as f64
        }
    }

    /// Passing ids in ascending order
    pub fn passing_ids(&self) -> impl Iterator<Item = VectorId> + '_ {
        let cached = self.sparse_ids.as_deref().map(|ids| ids.iter().copied());
        let scanned = match self.sparse_ids {
            Some(_) => None,
            None => Some(
                self.bits
                    .iter()
                    .enumerate()
                    .filter(|(_, &b)| b)
                    .map(|(i, _)| VectorId::from(i)),
            ),
        };
        cached.into_iter().flatten().chain(scanned.into_iter().flatten())
    }

    /// Jaccard similarity of the passing sets (1.0 when both are empty)
    pub fn jaccard_similarity(&self, other: &FilterMask) -> f64 {
        let len = self.bits.len().max(other.bits.len());
        let mut intersection = 0usize;
        let mut union = 0usize;
        for i in 0..len {
            let a = self.bits.get(i).copied().unwrap_or(false);
            let b = other.bits.get(i).copied().unwrap_or(false);
            if a && b {
                intersection += 1;
            }
            if a || b {
                union += 1;
            }
        }
        if union == 0 {
            1.0
        } else {
            intersection as f64 / union as f64
        }
    }

    /// Raw booleans
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }
}

impl From<Vec<bool>> for FilterMask {
    fn from(bits: Vec<bool>) -> Self {
        FilterMask::from_bools(bits)
    }
}

/// Split an `n_queries * n_vectors` flattened byte map into per-query masks.
///
/// # Errors
///
/// Returns `MaskLengthMismatch` if `bytes.len() != n_queries * n_vectors`.
pub fn split_batch_bytes<B: Copy + Into<i16>>(
    bytes: &[B],
    n_queries: usize,
    n_vectors: usize,
) -> AcornResult<Vec<FilterMask>> {
    let expected = n_queries * n_vectors;
    if bytes.len() != expected {
        return Err(AcornError::MaskLengthMismatch {
            expected,
            got: bytes.len(),
        });
    }
    if n_vectors == 0 {
        return Ok(vec![FilterMask::all_pass(0); n_queries]);
    }
    Ok(bytes
        .chunks(n_vectors)
        .map(FilterMask::from_bytes)
        .collect())
}
