//! Index configuration via `acorn.toml`
//!
//! Construction parameters (`dimension`, `m`, `m_beta`, `gamma`, `metric`,
//! pruning knobs) are fixed when an index is created. The search knobs stored
//! here are defaults; callers override them per query with [`SearchParams`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AcornError, AcornResult};
use crate::types::MetricKind;

/// Config file name conventionally placed next to index data.
pub const CONFIG_FILE_NAME: &str = "acorn.toml";

fn default_m() -> usize {
    32
}

fn default_m_beta() -> usize {
    16
}

fn default_gamma() -> usize {
    4
}

fn default_metadata_margin() -> u32 {
    0
}

fn default_keep_pruned() -> bool {
    true
}

fn default_ef_search() -> usize {
    64
}

fn default_exhaustive_threshold() -> usize {
    32
}

/// Index configuration loaded from `acorn.toml` or built in code.
///
/// # Example
///
/// ```toml
/// dimension = 128
/// m = 32
/// m_beta = 16
/// gamma = 4
/// metric = "l2"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcornConfig {
    /// Vector dimensionality `d`.
    pub dimension: usize,
    /// Bound on the augmented neighbor list (`M`).
    #[serde(default = "default_m")]
    pub m: usize,
    /// Bound on the base neighbor list (`M_beta`, at most `m`).
    #[serde(default = "default_m_beta")]
    pub m_beta: usize,
    /// Candidate pool over-provisioning factor; the construction beam is `gamma * m`.
    #[serde(default = "default_gamma")]
    pub gamma: usize,
    /// Distance function.
    #[serde(default)]
    pub metric: MetricKind,
    /// Augmented-list pruning override: a kept neighbor never prunes a
    /// candidate whose attribute differs from its own by less than this.
    /// `0` (the default) disables the override; `1` protects same-attribute
    /// edges at the cost of spending small budgets on them.
    #[serde(default = "default_metadata_margin")]
    pub metadata_margin: u32,
    /// Fill under-full neighbor lists with the closest discarded candidates.
    #[serde(default = "default_keep_pruned")]
    pub keep_pruned: bool,
    /// Default search beam width.
    #[serde(default = "default_ef_search")]
    pub ef_search: usize,
    /// Default cap on nodes visited per search (`None` = unbounded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_visited: Option<usize>,
    /// Filters passing at most this many vectors are answered by an exact
    /// scan over the passing ids instead of a graph traversal.
    #[serde(default = "default_exhaustive_threshold")]
    pub exhaustive_threshold: usize,
}

impl AcornConfig {
    /// Create a validated config with default pruning and search knobs.
    pub fn new(
        dimension: usize,
        m: usize,
        m_beta: usize,
        gamma: usize,
        metric: MetricKind,
    ) -> AcornResult<Self> {
        let config = AcornConfig {
            dimension,
            m,
            m_beta,
            gamma,
            metric,
            metadata_margin: default_metadata_margin(),
            keep_pruned: default_keep_pruned(),
            ef_search: default_ef_search(),
            max_visited: None,
            exhaustive_threshold: default_exhaustive_threshold(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Default construction parameters for the given dimension.
    pub fn with_dimension(dimension: usize) -> AcornResult<Self> {
        Self::new(
            dimension,
            default_m(),
            default_m_beta(),
            default_gamma(),
            MetricKind::L2,
        )
    }

    /// Set the default search beam width
    pub fn with_ef_search(mut self, ef_search: usize) -> Self {
        self.ef_search = ef_search;
        self
    }

    /// Set the attribute margin used by augmented-list pruning
    pub fn with_metadata_margin(mut self, margin: u32) -> Self {
        self.metadata_margin = margin;
        self
    }

    /// Enable or disable filling under-full lists with pruned candidates
    pub fn with_keep_pruned(mut self, keep_pruned: bool) -> Self {
        self.keep_pruned = keep_pruned;
        self
    }

    /// Set the default visit cap
    pub fn with_max_visited(mut self, max_visited: Option<usize>) -> Self {
        self.max_visited = max_visited;
        self
    }

    /// Set the exact-scan threshold for selective filters
    pub fn with_exhaustive_threshold(mut self, threshold: usize) -> Self {
        self.exhaustive_threshold = threshold;
        self
    }

    /// Construction beam width (`gamma * m`)
    pub fn candidate_pool_size(&self) -> usize {
        self.gamma.saturating_mul(self.m)
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `dimension == 0`, `m == 0`,
    /// `m_beta == 0`, `m_beta > m`, `gamma < 1` or `ef_search == 0`.
    pub fn validate(&self) -> AcornResult<()> {
        if self.dimension == 0 {
            return Err(AcornError::InvalidDimension {
                dimension: self.dimension,
            });
        }
        if self.m == 0 {
            return Err(AcornError::invalid_parameter("m", "must be > 0"));
        }
        if self.m_beta == 0 {
            return Err(AcornError::invalid_parameter("m_beta", "must be > 0"));
        }
        if self.m_beta > self.m {
            return Err(AcornError::invalid_parameter(
                "m_beta",
                format!("must not exceed m ({} > {})", self.m_beta, self.m),
            ));
        }
        if self.gamma < 1 {
            return Err(AcornError::invalid_parameter("gamma", "must be >= 1"));
        }
        if self.ef_search == 0 {
            return Err(AcornError::invalid_parameter("ef_search", "must be > 0"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Acorn index configuration
#
# Vector dimensionality (required)
dimension = 128

# Augmented neighbor list bound (M)
m = 32

# Base neighbor list bound (M_beta, at most m)
m_beta = 16

# Candidate pool over-provisioning; construction beam is gamma * m
gamma = 4

# Distance function: "l2" or "inner_product"
metric = "l2"

# Augmented lists: a kept neighbor never prunes a candidate whose attribute
# differs from its own by less than this (0 = distance-only pruning,
# 1 = protect same-attribute edges)
metadata_margin = 0

# Fill under-full neighbor lists with the closest pruned candidates
keep_pruned = true

# Default search beam width
ef_search = 64

# Optional cap on visited nodes per search
# max_visited = 10000

# Filters passing at most this many vectors use an exact scan
exhaustive_threshold = 32
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> AcornResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AcornError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: AcornConfig = toml::from_str(&content).map_err(|e| {
            AcornError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> AcornResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                AcornError::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> AcornResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AcornError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            AcornError::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Per-query search knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Beam width; the effective beam is `max(ef, k)`.
    pub ef: usize,
    /// Stop after visiting this many nodes (`None` = unbounded).
    pub max_visited: Option<usize>,
    /// Answer filters passing at most this many vectors with an exact scan.
    pub exhaustive_threshold: usize,
}

impl SearchParams {
    /// Search defaults taken from an index config
    pub fn from_config(config: &AcornConfig) -> Self {
        SearchParams {
            ef: config.ef_search,
            max_visited: config.max_visited,
            exhaustive_threshold: config.exhaustive_threshold,
        }
    }

    /// Override the beam width
    pub fn with_ef(mut self, ef: usize) -> Self {
        self.ef = ef;
        self
    }

    /// Override the visit cap
    pub fn with_max_visited(mut self, max_visited: Option<usize>) -> Self {
        self.max_visited = max_visited;
        self
    }

    /// Override the exact-scan threshold
    pub fn with_exhaustive_threshold(mut self, threshold: usize) -> Self {
        self.exhaustive_threshold = threshold;
        self
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            ef: default_ef_search(),
            max_visited: None,
            exhaustive_threshold: default_exhaustive_threshold(),
        }
    }
}
