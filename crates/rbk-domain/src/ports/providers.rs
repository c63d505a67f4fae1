//! External provider ports.
#![allow(missing_docs)]

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::Embedding;

/// What the embedding will be used for; some backends produce different
/// vectors for documents and queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingKind {
    RetrievalDocument,
    RetrievalQuery,
}

/// Text embedding generation service.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed `text` into the deployment's fixed dimension.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Embedding`] when the backend fails.
    async fn embed(&self, text: &str, kind: EmbeddingKind) -> Result<Embedding>;

    /// The fixed dimension this provider produces.
    fn dimension(&self) -> usize;
}

/// Sampling options for a generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Prompted text generation service; used only by extraction.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::TextGeneration`] when the backend fails.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}
