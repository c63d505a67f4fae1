use serde::{Deserialize, Serialize};

use super::record::{MemoryCategory, MemorySource, MemoryStatus, validate_text_fields};
use crate::error::Result;
use crate::utils::compute_content_hash;
use crate::value_objects::Embedding;

/// Insert shape for a memory record: everything but the repository-assigned
/// id, counters, and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    pub category: MemoryCategory,
    pub source: MemorySource,
    pub embedding: Option<Embedding>,
}

impl MemoryDraft {
    /// Validate the draft against the deployment's embedding dimension.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidRecord`] or
    /// [`crate::error::Error::InvalidEmbedding`] as in
    /// [`super::MemoryRecord::validate`].
    pub fn validate(&self, dimension: usize) -> Result<()> {
        validate_text_fields(&self.title, &self.description, &self.content)?;
        match &self.embedding {
            Some(embedding) => embedding.validate(dimension)?,
            None => {
                return Err(crate::error::Error::invalid_record(
                    "embedding is required at insert",
                ));
            }
        }
        Ok(())
    }

    /// Dedup key over the draft's text fields.
    #[must_use]
    pub fn content_hash(&self) -> String {
        compute_content_hash(&format!(
            "{}\n{}\n{}",
            self.title, self.description, self.content
        ))
    }
}

/// Partial update shape; absent fields are left unchanged.
///
/// When any outcome counter is patched the repository recomputes
/// `success_rate` from the resulting counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub category: Option<MemoryCategory>,
    pub source: Option<MemorySource>,
    pub embedding: Option<Embedding>,
    pub status: Option<MemoryStatus>,
    pub times_retrieved: Option<u64>,
    pub times_used_in_success: Option<u64>,
    pub times_used_in_failure: Option<u64>,
}

impl MemoryPatch {
    /// Whether the patch touches any outcome or retrieval counter.
    #[must_use]
    pub fn touches_counters(&self) -> bool {
        self.times_retrieved.is_some()
            || self.times_used_in_success.is_some()
            || self.times_used_in_failure.is_some()
    }
}
