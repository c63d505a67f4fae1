//! Configuration value objects.
//!
//! Defaults live in [`crate::constants`]; the infrastructure layer merges
//! file and environment overrides on top and validates the result.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONSOLIDATION_SCAN_LIMIT, DUP_SIMILARITY_THRESHOLD, EMBEDDING_DIMENSION_DEFAULT,
    LOW_QUALITY_THRESHOLD, MIN_RETRIEVALS_FOR_PRUNE, STALE_DAYS,
};

/// Thresholds steering the consolidation passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Success rate below which a well-exercised record is pruned
    pub low_quality_threshold: f64,
    /// Retrievals a record must have before it can be pruned
    pub min_retrievals_for_prune: u64,
    /// Cosine similarity at or above which two records are duplicates
    pub duplicate_similarity_threshold: f64,
    /// Days without a touch before a record is archived
    pub stale_days: i64,
    /// Practical cap on a full-store scan
    pub scan_limit: usize,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            low_quality_threshold: LOW_QUALITY_THRESHOLD,
            min_retrievals_for_prune: MIN_RETRIEVALS_FOR_PRUNE,
            duplicate_similarity_threshold: DUP_SIMILARITY_THRESHOLD,
            stale_days: STALE_DAYS,
            scan_limit: CONSOLIDATION_SCAN_LIMIT,
        }
    }
}

/// Feature gates and default sizes for the scaling strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MattsConfig {
    /// Gate for parallel self-contrast; false degrades to a single call
    pub parallel_enabled: bool,
    /// Gate for sequential self-refinement; false degrades to a single call
    pub sequential_enabled: bool,
    /// Default variant count for parallel scaling
    pub parallel_variants: usize,
    /// Default iteration cap for sequential scaling
    pub sequential_iterations: usize,
}

impl Default for MattsConfig {
    fn default() -> Self {
        Self {
            parallel_enabled: true,
            sequential_enabled: true,
            parallel_variants: 3,
            sequential_iterations: 3,
        }
    }
}

/// Sampling limits for extraction's generation calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Generation temperature; low for stable JSON output
    pub temperature: f32,
    /// Cap on generated output size
    pub max_tokens: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 2_048,
        }
    }
}

/// The deployment's fixed embedding dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Vector dimension D; validated on every insert
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: EMBEDDING_DIMENSION_DEFAULT,
        }
    }
}
