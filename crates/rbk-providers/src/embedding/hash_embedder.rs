//! Deterministic hash-based embedder.
//!
//! Expands a SHA-256 stream over the input text into a unit vector of the
//! configured dimension. Not semantically meaningful, but stable: equal
//! text always embeds equally, which is exactly what offline runs and
//! repository tests need. Real deployments plug a model-backed adapter
//! into the same port.

use async_trait::async_trait;
use rbk_domain::error::Result;
use rbk_domain::ports::providers::{EmbeddingKind, EmbeddingProvider};
use rbk_domain::value_objects::Embedding;
use sha2::{Digest, Sha256};

/// Offline deterministic embedding provider.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create an embedder producing unit vectors of `dimension`.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn expand(&self, text: &str) -> Vec<f32> {
        let mut components = Vec::with_capacity(self.dimension);
        let mut counter: u64 = 0;
        while components.len() < self.dimension {
            let mut hasher = Sha256::new();
            hasher.update(text.as_bytes());
            hasher.update(counter.to_le_bytes());
            let digest = hasher.finalize();
            for byte in digest {
                if components.len() == self.dimension {
                    break;
                }
                // Map [0, 255] onto [-1.0, 1.0].
                components.push(f32::from(byte) / 127.5 - 1.0);
            }
            counter += 1;
        }

        let norm = components
            .iter()
            .map(|c| f64::from(*c) * f64::from(*c))
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for component in &mut components {
                #[allow(clippy::cast_possible_truncation)]
                {
                    *component = (f64::from(*component) / norm) as f32;
                }
            }
        }
        components
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    /// Document and query embeddings are intentionally identical here, so
    /// a query for stored text ranks that text first.
    async fn embed(&self, text: &str, _kind: EmbeddingKind) -> Result<Embedding> {
        Ok(Embedding::new(self.expand(text), "hash-embedder"))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
