//! Index Integration Tests
//!
//! End-to-end behavior of the filtered ANN index through the public API:
//! - Scenarios: small hand-checked fixtures
//! - Invariants: graph symmetry, degree bounds, reconstruct identity
//! - Recall: unfiltered and filtered agreement with exhaustive search
//! - Filtered: mask semantics, padding, predicates
//! - Determinism and concurrency
//! - Config files and persistence payloads

#[path = "../common/mod.rs"]
mod common;

mod concurrency;
mod determinism;
mod invariants;
mod parts;
mod recall;
mod scenarios;
