//! Failure-to-Memory Extraction Use Case
//!
//! # Overview
//! Turns upstream failures (rejected code changes, failed builds) into
//! validated, embedded, persisted reasoning memories by prompting the
//! text-generation capability for lesson candidates.
//!
//! # Failure containment
//! Learning must never break the path that triggered it: a malformed
//! candidate is skipped, and a top-level failure (generation call, JSON
//! parse) yields an empty list. Nothing here propagates an error.

use std::sync::Arc;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use rbk_domain::entities::extraction::{BuildFailure, MemoryCandidate, RejectedModification};
use rbk_domain::entities::memory::{MemoryCategory, MemoryRecord, MemorySource};
use rbk_domain::mask_id;
use rbk_domain::ports::providers::{
    EmbeddingKind, EmbeddingProvider, GenerationOptions, TextGenerator,
};
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::ports::services::ExtractionServiceInterface;
use rbk_domain::value_objects::ExtractionConfig;
use tracing::{debug, warn};

/// JSON array inside an optionally-labelled fenced code block.
static FENCED_JSON: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").ok());

/// Learns reasoning memories from rejections and build failures.
pub struct ExtractionServiceImpl {
    repository: Arc<dyn MemoryRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn TextGenerator>,
    config: ExtractionConfig,
}

impl ExtractionServiceImpl {
    /// Create the service with its persistence and generation dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn MemoryRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn TextGenerator>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            repository,
            embedder,
            generator,
            config,
        }
    }

    fn category_names() -> String {
        [
            MemoryCategory::CodeRejection,
            MemoryCategory::BuildFailure,
            MemoryCategory::ErrorPattern,
            MemoryCategory::FixStrategy,
            MemoryCategory::GenerationPattern,
            MemoryCategory::GeneralStrategy,
        ]
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    }

    fn render_rejection_prompt(modification: &RejectedModification, reason: &str) -> String {
        let diff = modification.diff_excerpt.as_deref().unwrap_or("(not available)");
        format!(
            "A proposed code modification was rejected.\n\
             File: {}\n\
             Change summary: {}\n\
             Rejection reason: {}\n\
             Diff excerpt:\n{}\n\n\
             Extract up to 3 reusable lessons that would prevent similar rejections.\n\
             Respond with a JSON array only. Each element must have the fields\n\
             \"title\" (max 80 chars), \"description\" (one sentence),\n\
             \"content\" (the full lesson), and \"category\" (one of: {}).",
            modification.file_path,
            modification.change_summary,
            reason,
            diff,
            Self::category_names(),
        )
    }

    fn render_build_failure_prompt(build: &BuildFailure) -> String {
        format!(
            "A build failed.\n\
             Build id: {}\n\
             Command: {}\n\
             Exit code: {}\n\
             Log tail:\n{}\n\n\
             Extract up to 3 reusable lessons that would prevent similar failures.\n\
             Respond with a JSON array only. Each element must have the fields\n\
             \"title\" (max 80 chars), \"description\" (one sentence),\n\
             \"content\" (the full lesson), and \"category\" (one of: {}).",
            build.build_id.as_deref().unwrap_or("(unknown)"),
            build.command.as_deref().unwrap_or("(unknown)"),
            build
                .exit_code
                .map_or_else(|| "(unknown)".to_owned(), |c| c.to_string()),
            build.log_excerpt,
            Self::category_names(),
        )
    }

    /// Pull a JSON array out of the model response: fenced block first,
    /// bare bracketed slice as fallback.
    fn extract_json_array(response: &str) -> Option<&str> {
        if let Some(re) = FENCED_JSON.as_ref() {
            if let Some(captures) = re.captures(response) {
                return captures.get(1).map(|m| m.as_str());
            }
        }
        let start = response.find('[')?;
        let end = response.rfind(']')?;
        (end > start).then(|| &response[start..=end])
    }

    fn parse_candidates(payload: &str) -> Vec<MemoryCandidate> {
        let values: Vec<serde_json::Value> = match serde_json::from_str(payload) {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "candidate array did not parse");
                return Vec::new();
            }
        };
        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    warn!(error = %e, "skipping malformed candidate");
                    None
                }
            })
            .collect()
    }

    /// Shared pipeline: generate, parse, validate, embed, persist.
    async fn extract(&self, prompt: String, source: MemorySource) -> Vec<MemoryRecord> {
        let options = GenerationOptions {
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let response = match self.generator.generate(&prompt, &options).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "extraction generation call failed");
                return Vec::new();
            }
        };
        let Some(payload) = Self::extract_json_array(&response) else {
            warn!("no JSON array found in extraction response");
            return Vec::new();
        };

        let candidates = Self::parse_candidates(payload);
        let mut accepted = Vec::new();
        for candidate in candidates {
            let embedding = match self
                .embedder
                .embed(&candidate.embedding_text(), EmbeddingKind::RetrievalDocument)
                .await
            {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!(error = %e, "candidate embedding failed, skipping");
                    continue;
                }
            };
            if let Err(e) = embedding.validate(self.embedder.dimension()) {
                warn!(error = %e, "candidate embedding invalid, skipping");
                continue;
            }
            let draft = match candidate.into_draft(source, embedding) {
                Ok(draft) => draft,
                Err(e) => {
                    warn!(error = %e, "candidate shape invalid, skipping");
                    continue;
                }
            };
            let id = match self.repository.add(draft).await {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "candidate persistence failed, skipping");
                    continue;
                }
            };
            match self.repository.get(&id).await {
                Ok(Some(record)) => {
                    debug!(id = %mask_id(&id), "extracted memory persisted");
                    accepted.push(record);
                }
                Ok(None) => warn!(id = %mask_id(&id), "persisted memory vanished"),
                Err(e) => warn!(id = %mask_id(&id), error = %e, "persisted memory fetch failed"),
            }
        }
        accepted
    }
}

#[async_trait]
impl ExtractionServiceInterface for ExtractionServiceImpl {
    async fn extract_from_rejection(
        &self,
        modification: &RejectedModification,
        reason: &str,
    ) -> Vec<MemoryRecord> {
        let prompt = Self::render_rejection_prompt(modification, reason);
        self.extract(prompt, MemorySource::BuildRejection).await
    }

    async fn extract_from_build_failure(&self, build: &BuildFailure) -> Vec<MemoryRecord> {
        let prompt = Self::render_build_failure_prompt(build);
        self.extract(prompt, MemorySource::BuildFailure).await
    }
}
