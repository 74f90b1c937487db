//! Error types for the acorn index
//!
//! All errors are local and deterministic: the index performs no I/O in its
//! graph or store, so nothing here is retryable. Configuration errors are
//! raised before any mutation is committed.

use thiserror::Error;

use crate::types::VectorId;

/// Errors returned by index operations
#[derive(Debug, Error, PartialEq)]
pub enum AcornError {
    /// Vector dimension doesn't match the index configuration
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Configured dimension
        expected: usize,
        /// Actual dimension of the provided vector
        got: usize,
    },

    /// Invalid dimension specified (must be > 0)
    #[error("Invalid dimension: {dimension} (must be > 0)")]
    InvalidDimension {
        /// The invalid dimension value
        dimension: usize,
    },

    /// A construction or search parameter is out of range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Flattened vector input is not a whole number of vectors
    #[error("Malformed batch: {len} floats is not a multiple of dimension {dimension}")]
    MalformedBatch {
        /// Number of floats supplied
        len: usize,
        /// Configured dimension
        dimension: usize,
    },

    /// Attribute count doesn't match vector count
    #[error("Metadata length mismatch: {vectors} vectors, {attributes} attributes")]
    MetadataLengthMismatch {
        /// Vectors in the batch
        vectors: usize,
        /// Attributes supplied
        attributes: usize,
    },

    /// Filter mask isn't aligned with the stored vectors
    #[error("Filter mask length mismatch: expected {expected}, got {got}")]
    MaskLengthMismatch {
        /// Number of stored vectors
        expected: usize,
        /// Mask length
        got: usize,
    },

    /// Number of masks doesn't match number of queries
    #[error("Filter mask count mismatch: {queries} queries, {masks} masks")]
    MaskCountMismatch {
        /// Queries in the batch
        queries: usize,
        /// Masks supplied
        masks: usize,
    },

    /// Vector with given id was not found
    #[error("Vector not found: {id}")]
    NotFound {
        /// Requested id
        id: VectorId,
    },

    /// Operation requires at least one stored vector
    #[error("Index is empty")]
    EmptyIndex,

    /// Configuration file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Persistence payload failed validation
    #[error("Invalid index parts: {0}")]
    InvalidParts(String),
}

impl AcornError {
    /// Check if this error was caused by invalid configuration or input shape
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AcornError::DimensionMismatch { .. }
                | AcornError::InvalidDimension { .. }
                | AcornError::InvalidParameter { .. }
                | AcornError::MalformedBatch { .. }
                | AcornError::MetadataLengthMismatch { .. }
                | AcornError::MaskLengthMismatch { .. }
                | AcornError::MaskCountMismatch { .. }
        )
    }

    /// Check if this error indicates the vector was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, AcornError::NotFound { .. } | AcornError::EmptyIndex)
    }

    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        AcornError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type alias for index operations
pub type AcornResult<T> = Result<T, AcornError>;
