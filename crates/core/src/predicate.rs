//! Predicates over the integer attribute
//!
//! The index never stores predicates. These helpers turn a predicate into a
//! [`FilterMask`] by evaluating it against a metadata column, which is the
//! usual way callers derive per-query masks.

use serde::{Deserialize, Serialize};

use crate::filter::FilterMask;

/// Condition over a single integer attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Attribute equals the value
    Equals(i32),
    /// Attribute differs from the value
    NotEquals(i32),
    /// Attribute lies in `[min, max]` (inclusive)
    Range {
        /// Lower bound
        min: i32,
        /// Upper bound
        max: i32,
    },
    /// Attribute is one of the values
    AnyOf(Vec<i32>),
}

impl Predicate {
    /// Evaluate against one attribute value
    pub fn matches(&self, attribute: i32) -> bool {
        match self {
            Predicate::Equals(v) => attribute == *v,
            Predicate::NotEquals(v) => attribute != *v,
            Predicate::Range { min, max } => *min <= attribute && attribute <= *max,
            Predicate::AnyOf(values) => values.contains(&attribute),
        }
    }

    /// Evaluate against a metadata column, producing an id-aligned mask
    pub fn to_mask(&self, attributes: &[i32]) -> FilterMask {
        FilterMask::from_bools(attributes.iter().map(|&a| self.matches(a)).collect())
    }
}
