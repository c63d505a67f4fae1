//! Inputs to failure-to-memory extraction and the candidate shape the
//! text-generation capability is asked to produce.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::memory::{MemoryCategory, MemoryDraft, MemorySource};
use crate::error::{Error, Result};
use crate::value_objects::Embedding;

/// A code modification that was rejected upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedModification {
    /// File the modification targeted
    pub file_path: String,
    /// Short human summary of the attempted change
    pub change_summary: String,
    /// Excerpt of the rejected diff, when available
    pub diff_excerpt: Option<String>,
}

/// A failed build the system can learn from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildFailure {
    /// Build identifier, when the CI system provides one
    pub build_id: Option<String>,
    /// Command or target that failed
    pub command: Option<String>,
    /// Process exit code, when known
    pub exit_code: Option<i32>,
    /// Tail of the build log
    pub log_excerpt: String,
}

/// One memory item proposed by the text-generation capability.
///
/// Parsed leniently from the model's JSON array; [`MemoryCandidate::into_draft`]
/// is where shape validation happens, so malformed candidates are skipped
/// without failing the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCandidate {
    pub title: String,
    pub description: String,
    pub content: String,
    /// Category name as emitted by the model; validated against the enum
    pub category: String,
}

impl MemoryCandidate {
    /// Convert into an insertable draft, attaching provenance and embedding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] when the category is not a member
    /// of [`MemoryCategory`].
    pub fn into_draft(self, source: MemorySource, embedding: Embedding) -> Result<MemoryDraft> {
        let category = MemoryCategory::from_str(&self.category)
            .map_err(Error::invalid_record)?;
        Ok(MemoryDraft {
            title: self.title,
            description: self.description,
            content: self.content,
            category,
            source,
            embedding: Some(embedding),
        })
    }

    /// Text embedded for retrieval: title + description + content.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.description, self.content)
    }
}
