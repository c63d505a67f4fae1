//! Core business entities with identity.

/// Consolidation run report
pub mod consolidation;
/// Extraction inputs and candidate shapes
pub mod extraction;
/// Reasoning memory records
pub mod memory;
/// Test-time scaling task and trajectory shapes
pub mod scaling;

pub use consolidation::ConsolidationStats;
pub use extraction::{BuildFailure, MemoryCandidate, RejectedModification};
pub use memory::{
    MemoryCategory, MemoryDraft, MemoryPatch, MemoryRecord, MemorySource, MemoryStatus,
};
pub use scaling::{ExecutionReport, Reflection, ScalingOutcome, TaskSpec};
