//! Caller-supplied execution capabilities.
//!
//! The scaling strategies wrap these; the core never inspects what an
//! executor actually does, only the [`ExecutionReport`] it returns.

use async_trait::async_trait;

use crate::entities::memory::MemoryRecord;
use crate::entities::scaling::{ExecutionReport, Reflection, TaskSpec};
use crate::error::Result;

/// One end-to-end task execution seeded with a memory subset.
///
/// Returning `Ok(None)` means the executor produced no result at all; the
/// scaling strategies score that as a failed trajectory.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Execute `task` with `memories` as context.
    ///
    /// # Errors
    ///
    /// Executor failures are contained by the calling strategy; they never
    /// abort a scaling run.
    async fn execute(
        &self,
        task: &TaskSpec,
        memories: &[MemoryRecord],
    ) -> Result<Option<ExecutionReport>>;
}

/// Produces a refinement verdict for the sequential strategy.
#[async_trait]
pub trait TaskReflector: Send + Sync {
    /// Reflect on `result` and decide whether (and how) to refine `task`.
    ///
    /// # Errors
    ///
    /// A reflector failure terminates the refinement loop; the best result
    /// so far is still returned.
    async fn reflect(
        &self,
        task: &TaskSpec,
        result: Option<&ExecutionReport>,
        memories: &[MemoryRecord],
    ) -> Result<Reflection>;
}
