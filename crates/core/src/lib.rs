//! Core types for the acorn index
//!
//! This crate defines the foundational types used throughout the system:
//! - VectorId: dense insertion-order identifier
//! - MetricKind: distance function identifier (L2, inner product)
//! - AcornConfig / SearchParams: construction parameters and search knobs
//! - FilterMask: per-query pass/fail bitmap aligned with VectorId
//! - Predicate: attribute conditions that evaluate into masks
//! - SearchHit / SearchResults: ranked output and the row-major batch layout
//! - AcornError: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod filter;
pub mod predicate;
pub mod types;

pub use config::{AcornConfig, SearchParams, CONFIG_FILE_NAME};
pub use error::{AcornError, AcornResult};
pub use filter::{split_batch_bytes, FilterMask};
pub use predicate::Predicate;
pub use types::{MetricKind, SearchHit, SearchResults, VectorId, NO_RESULT_LABEL};
