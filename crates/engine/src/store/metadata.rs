//! Metadata Table - one integer attribute per vector
//!
//! Attributes are set once at insertion and never mutated. The graph treats
//! them as opaque integers used only by augmented-list pruning.

use acorn_core::{AcornError, AcornResult, VectorId};

/// Dense attribute column aligned with VectorId
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTable {
    attributes: Vec<i32>,
}

impl MetadataTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing column
    pub fn from_vec(attributes: Vec<i32>) -> Self {
        MetadataTable { attributes }
    }

    /// Record the attribute of `id`, which must be the next dense id
    pub fn append(&mut self, id: VectorId, attribute: i32) -> AcornResult<()> {
        if id.as_usize() != self.attributes.len() {
            return Err(AcornError::InvalidParameter {
                name: "id",
                reason: format!(
                    "metadata must be appended in id order (expected {}, got {})",
                    self.attributes.len(),
                    id
                ),
            });
        }
        self.attributes.push(attribute);
        Ok(())
    }

    /// Attribute of `id`
    pub fn get(&self, id: VectorId) -> Option<i32> {
        self.attributes.get(id.as_usize()).copied()
    }

    /// Number of recorded attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The whole column
    pub fn as_slice(&self) -> &[i32] {
        &self.attributes
    }

    /// Drop all attributes
    pub fn reset(&mut self) {
        self.attributes.clear();
    }
}
