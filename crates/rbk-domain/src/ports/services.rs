//! Service interfaces the core exposes upward.

use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::consolidation::ConsolidationStats;
use crate::entities::extraction::{BuildFailure, RejectedModification};
use crate::entities::memory::MemoryRecord;
use crate::entities::scaling::{ScalingOutcome, TaskSpec};
use crate::error::Result;
use crate::ports::execution::{TaskExecutor, TaskReflector};

/// Periodic store maintenance: prune, merge, archive.
#[async_trait]
pub trait ConsolidationServiceInterface: Send + Sync {
    /// Run one full consolidation pass and report what changed.
    ///
    /// # Errors
    ///
    /// Only infrastructure-level failures propagate; a failed initial scan
    /// is reported through `success = false` on the stats.
    async fn consolidate(&self) -> Result<ConsolidationStats>;
}

/// Parallel self-contrast scaling: fan out N memory-seeded trajectories,
/// score them, pick the best.
#[async_trait]
pub trait ParallelScalingInterface: Send + Sync {
    /// Run up to `variants` concurrent trajectories of `task`.
    ///
    /// # Errors
    ///
    /// Embedder failures propagate; executor failures are contained per
    /// trajectory.
    async fn parallel_scaling(
        &self,
        task: &TaskSpec,
        executor: Arc<dyn TaskExecutor>,
        variants: usize,
    ) -> Result<ScalingOutcome>;
}

/// Sequential self-refinement scaling: iterate with reflection, tracking
/// the best result seen.
#[async_trait]
pub trait SequentialScalingInterface: Send + Sync {
    /// Run up to `max_iterations` refine-reflect iterations of `task`.
    ///
    /// # Errors
    ///
    /// Embedder failures propagate; executor and reflector failures are
    /// contained and terminate the loop with the best result so far.
    async fn sequential_scaling(
        &self,
        task: &TaskSpec,
        executor: Arc<dyn TaskExecutor>,
        reflector: Option<Arc<dyn TaskReflector>>,
        max_iterations: usize,
    ) -> Result<ScalingOutcome>;
}

/// Learns memories from upstream failures. Never fails the caller: both
/// operations return the memories that were persisted, possibly none.
#[async_trait]
pub trait ExtractionServiceInterface: Send + Sync {
    /// Extract and persist lessons from a rejected code modification.
    async fn extract_from_rejection(
        &self,
        modification: &RejectedModification,
        reason: &str,
    ) -> Vec<MemoryRecord>;

    /// Extract and persist lessons from a failed build.
    async fn extract_from_build_failure(&self, build: &BuildFailure) -> Vec<MemoryRecord>;
}

/// Retrieval tuned for code-generation callers.
#[async_trait]
pub trait CodeGenRetrievalInterface: Send + Sync {
    /// Up to `top_k` memories for `task_description`, preferring
    /// build-related categories when enough of them rank.
    ///
    /// # Errors
    ///
    /// Embedder and store failures propagate.
    async fn retrieve_for_code_generation(
        &self,
        task_description: &str,
        file_path: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<MemoryRecord>>;
}
