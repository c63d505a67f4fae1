//! Embedding vector value object.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::vector::cosine_similarity;

/// Fixed-dimension vector representation of text.
///
/// Wraps the raw component vector together with the producing model name
/// and the declared dimensionality. Stored vectors and query vectors must
/// share one dimension per deployment; [`Embedding::validate`] enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// Vector components
    pub vector: Vec<f32>,
    /// Name of the model that produced this embedding
    pub model: String,
    /// Declared dimensionality, must equal `vector.len()`
    pub dimensions: usize,
}

impl Embedding {
    /// Create an embedding from raw components, deriving `dimensions`.
    #[must_use]
    pub fn new<S: Into<String>>(vector: Vec<f32>, model: S) -> Self {
        let dimensions = vector.len();
        Self {
            vector,
            model: model.into(),
            dimensions,
        }
    }

    /// Validate against the deployment's fixed dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmbedding`] when the component count differs
    /// from `dimension`, the declared `dimensions` field disagrees with the
    /// actual length, or any component is not finite.
    pub fn validate(&self, dimension: usize) -> Result<()> {
        if self.vector.len() != dimension {
            return Err(Error::invalid_embedding(format!(
                "expected {dimension} components, got {}",
                self.vector.len()
            )));
        }
        if self.dimensions != self.vector.len() {
            return Err(Error::invalid_embedding(format!(
                "declared dimensions {} disagree with vector length {}",
                self.dimensions,
                self.vector.len()
            )));
        }
        if let Some(i) = self.vector.iter().position(|c| !c.is_finite()) {
            return Err(Error::invalid_embedding(format!(
                "component {i} is not finite"
            )));
        }
        Ok(())
    }

    /// Cosine similarity against another embedding.
    ///
    /// Unwraps both value objects to their raw vectors before delegating to
    /// [`cosine_similarity`], so the wrapped and unwrapped forms compare
    /// identically. Malformed or mismatched inputs yield `0.0`.
    #[must_use]
    pub fn cosine(&self, other: &Self) -> f64 {
        cosine_similarity(&self.vector, &other.vector)
    }

    /// Cosine similarity against a raw query vector.
    #[must_use]
    pub fn cosine_to_vector(&self, query: &[f32]) -> f64 {
        cosine_similarity(&self.vector, query)
    }
}
