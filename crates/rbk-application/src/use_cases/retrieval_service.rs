//! Code-Generation Retrieval Use Case
//!
//! Retrieval tuned for code-generation callers: over-fetches, then prefers
//! build-related categories when enough of them rank, falling back to the
//! general result set otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use rbk_domain::entities::memory::{MemoryCategory, MemoryRecord};
use rbk_domain::error::Result;
use rbk_domain::ports::providers::{EmbeddingKind, EmbeddingProvider};
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::ports::services::CodeGenRetrievalInterface;
use rbk_domain::value_objects::RetrievalFilters;
use tracing::debug;

use crate::constants::{CODEGEN_MIN_BUILD_RESULTS, CODEGEN_OVERFETCH_MULTIPLIER};

/// Categories most useful while generating or repairing build-adjacent code.
const BUILD_RELATED: [MemoryCategory; 3] = [
    MemoryCategory::BuildFailure,
    MemoryCategory::ErrorPattern,
    MemoryCategory::FixStrategy,
];

/// Memory retrieval for code-generation callers.
pub struct CodeGenRetrievalImpl {
    repository: Arc<dyn MemoryRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl CodeGenRetrievalImpl {
    /// Create the service with its retrieval dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn MemoryRepository>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            repository,
            embedder,
        }
    }
}

#[async_trait]
impl CodeGenRetrievalInterface for CodeGenRetrievalImpl {
    /// # Errors
    ///
    /// Propagates embedder and store failures.
    async fn retrieve_for_code_generation(
        &self,
        task_description: &str,
        file_path: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<MemoryRecord>> {
        let query_text = match file_path {
            Some(path) => format!("{task_description}\n{path}"),
            None => task_description.to_owned(),
        };
        let query = self
            .embedder
            .embed(&query_text, EmbeddingKind::RetrievalQuery)
            .await?;

        let candidates = self
            .repository
            .retrieve_by_embedding(
                &query.vector,
                top_k * CODEGEN_OVERFETCH_MULTIPLIER,
                &RetrievalFilters::default(),
            )
            .await?;

        let build_related: Vec<MemoryRecord> = candidates
            .iter()
            .filter(|m| BUILD_RELATED.contains(&m.category))
            .cloned()
            .collect();

        let mut results = if build_related.len() >= CODEGEN_MIN_BUILD_RESULTS {
            debug!(
                build_related = build_related.len(),
                "preferring build-related memories"
            );
            build_related
        } else {
            candidates
        };
        results.truncate(top_k);
        Ok(results)
    }
}
