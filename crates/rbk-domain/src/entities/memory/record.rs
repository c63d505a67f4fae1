use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value_objects::Embedding;

/// Maximum accepted title length.
pub const MAX_TITLE_LENGTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryCategory {
    CodeRejection,
    BuildFailure,
    ErrorPattern,
    FixStrategy,
    GenerationPattern,
    GeneralStrategy,
}

impl MemoryCategory {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CodeRejection => "code_rejection",
            Self::BuildFailure => "build_failure",
            Self::ErrorPattern => "error_pattern",
            Self::FixStrategy => "fix_strategy",
            Self::GenerationPattern => "generation_pattern",
            Self::GeneralStrategy => "general_strategy",
        }
    }
}

impl std::str::FromStr for MemoryCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "code_rejection" => Ok(Self::CodeRejection),
            "build_failure" => Ok(Self::BuildFailure),
            "error_pattern" => Ok(Self::ErrorPattern),
            "fix_strategy" => Ok(Self::FixStrategy),
            "generation_pattern" => Ok(Self::GenerationPattern),
            "general_strategy" => Ok(Self::GeneralStrategy),
            _ => Err(format!("Unknown memory category: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemorySource {
    BuildRejection,
    BuildFailure,
    TaskFailure,
    TaskSuccess,
    RepairSuccess,
}

impl MemorySource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuildRejection => "build_rejection",
            Self::BuildFailure => "build_failure",
            Self::TaskFailure => "task_failure",
            Self::TaskSuccess => "task_success",
            Self::RepairSuccess => "repair_success",
        }
    }
}

impl std::str::FromStr for MemorySource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "build_rejection" => Ok(Self::BuildRejection),
            "build_failure" => Ok(Self::BuildFailure),
            "task_failure" => Ok(Self::TaskFailure),
            "task_success" => Ok(Self::TaskSuccess),
            "repair_success" => Ok(Self::RepairSuccess),
            _ => Err(format!("Unknown memory source: {s}")),
        }
    }
}

/// Lifecycle status. The only legal transition is `Active -> Archived`;
/// deletion is independent of status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryStatus {
    Active,
    Archived,
}

impl MemoryStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

/// A reasoning memory: one lesson learned from a failed (or repaired)
/// code change or build, keyed by an embedding for similarity retrieval.
///
/// The repository exclusively owns the persistent representation; callers
/// receive value snapshots and route every mutation back through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub category: MemoryCategory,
    pub source: MemorySource,
    pub embedding: Option<Embedding>,
    pub times_retrieved: u64,
    pub times_used_in_success: u64,
    pub times_used_in_failure: u64,
    pub success_rate: Option<f64>,
    pub status: MemoryStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MemoryRecord {
    /// Recompute `success_rate` from the outcome counters.
    ///
    /// Stays `None` until at least one success or failure is recorded.
    #[allow(clippy::cast_precision_loss)]
    pub fn recompute_success_rate(&mut self) {
        let outcomes = self.times_used_in_success + self.times_used_in_failure;
        self.success_rate = if outcomes == 0 {
            None
        } else {
            Some(self.times_used_in_success as f64 / outcomes as f64)
        };
    }

    /// Validate the full record against the deployment's embedding dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] when a required text field is empty,
    /// the title exceeds [`MAX_TITLE_LENGTH`], the counters violate the
    /// retrieval invariant, or the rate is out of range;
    /// [`Error::InvalidEmbedding`] when the embedding fails validation.
    pub fn validate(&self, dimension: usize) -> Result<()> {
        validate_text_fields(&self.title, &self.description, &self.content)?;
        if self.times_used_in_success + self.times_used_in_failure > self.times_retrieved {
            return Err(Error::invalid_record(
                "outcome counters exceed retrieval count",
            ));
        }
        if let Some(rate) = self.success_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::invalid_record(format!(
                    "success_rate {rate} outside [0, 1]"
                )));
            }
        }
        if let Some(embedding) = &self.embedding {
            embedding.validate(dimension)?;
        }
        Ok(())
    }

    /// Most recent of the record's two timestamps, used for staleness.
    #[must_use]
    pub fn last_touched_at(&self) -> i64 {
        self.updated_at.max(self.created_at)
    }
}

pub(crate) fn validate_text_fields(title: &str, description: &str, content: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::invalid_record("title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(Error::invalid_record(format!(
            "title exceeds {MAX_TITLE_LENGTH} characters"
        )));
    }
    if description.trim().is_empty() {
        return Err(Error::invalid_record("description must not be empty"));
    }
    if content.trim().is_empty() {
        return Err(Error::invalid_record("content must not be empty"));
    }
    Ok(())
}
