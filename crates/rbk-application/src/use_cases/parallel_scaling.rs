//! Parallel Self-Contrast Scaling Use Case
//!
//! # Overview
//! Fans out N trajectories of one task, each seeded with a disjoint
//! round-robin subset of retrieved memories, scores every result, and
//! returns the best. Contrast between differently-seeded attempts is the
//! point: the memories a variant sees shape its approach.
//!
//! # Concurrency
//! Trajectories run concurrently on a [`tokio::task::JoinSet`]; the call
//! completes in time proportional to the slowest executor invocation, and
//! dropping the future aborts every in-flight trajectory.

use std::sync::Arc;

use async_trait::async_trait;
use rbk_domain::constants::{PARALLEL_MIN_SUCCESS_RATE, PARALLEL_RETRIEVAL_MULTIPLIER};
use rbk_domain::entities::memory::MemoryRecord;
use rbk_domain::entities::scaling::{ExecutionReport, ScalingOutcome, TaskSpec};
use rbk_domain::error::Result;
use rbk_domain::ports::execution::TaskExecutor;
use rbk_domain::ports::providers::{EmbeddingKind, EmbeddingProvider};
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::ports::services::ParallelScalingInterface;
use rbk_domain::value_objects::{MattsConfig, RetrievalFilters};
use tracing::{debug, warn};

use crate::use_cases::trajectory_scorer::score_trajectory;

/// Memory-aware parallel self-contrast over an opaque executor.
pub struct ParallelScalingImpl {
    repository: Arc<dyn MemoryRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: MattsConfig,
}

/// One finished trajectory, ready for selection.
struct ScoredTrajectory {
    index: usize,
    report: Option<ExecutionReport>,
    score: f64,
    memory_ids: Vec<String>,
}

impl ParallelScalingImpl {
    /// Create the strategy with its retrieval dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn MemoryRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: MattsConfig,
    ) -> Self {
        Self {
            repository,
            embedder,
            config,
        }
    }

    /// Plain single execution used whenever fan-out is not worthwhile.
    async fn execute_single(
        &self,
        task: &TaskSpec,
        executor: Arc<dyn TaskExecutor>,
    ) -> ScalingOutcome {
        let report = match executor.execute(task, &[]).await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "single execution failed");
                None
            }
        };
        let score = score_trajectory(report.as_ref());
        ScalingOutcome {
            report,
            score,
            winner_index: None,
            iterations: 0,
            memories_used: Vec::new(),
        }
    }

    /// Round-robin distribution: variant `i` gets memories at positions
    /// `i, i + n, i + 2n, …` — disjoint by construction.
    fn distribute(memories: Vec<MemoryRecord>, variants: usize) -> Vec<Vec<MemoryRecord>> {
        let mut subsets: Vec<Vec<MemoryRecord>> = (0..variants).map(|_| Vec::new()).collect();
        for (position, memory) in memories.into_iter().enumerate() {
            subsets[position % variants].push(memory);
        }
        subsets
    }
}

#[async_trait]
impl ParallelScalingInterface for ParallelScalingImpl {
    /// # Errors
    ///
    /// Propagates embedder and retrieval failures; executor failures are
    /// contained as zero-score trajectories.
    async fn parallel_scaling(
        &self,
        task: &TaskSpec,
        executor: Arc<dyn TaskExecutor>,
        variants: usize,
    ) -> Result<ScalingOutcome> {
        if !self.config.parallel_enabled || variants == 0 {
            debug!(variants, "parallel scaling disabled, single execution");
            return Ok(self.execute_single(task, executor).await);
        }

        // Without retrieval there is nothing to contrast on.
        let query = self
            .embedder
            .embed(&task.query_text(), EmbeddingKind::RetrievalQuery)
            .await?;
        let filters = RetrievalFilters {
            min_success_rate: Some(PARALLEL_MIN_SUCCESS_RATE),
            categories: None,
        };
        let memories = self
            .repository
            .retrieve_by_embedding(
                &query.vector,
                variants * PARALLEL_RETRIEVAL_MULTIPLIER,
                &filters,
            )
            .await?;
        if memories.is_empty() {
            debug!("no qualifying memories, single execution");
            return Ok(self.execute_single(task, executor).await);
        }

        let subsets = Self::distribute(memories, variants);

        let mut join_set = tokio::task::JoinSet::new();
        for (index, subset) in subsets.into_iter().enumerate() {
            let executor = Arc::clone(&executor);
            let task = task.clone();
            join_set.spawn(async move {
                let memory_ids: Vec<String> = subset.iter().map(|m| m.id.clone()).collect();
                let report = match executor.execute(&task, &subset).await {
                    Ok(report) => report,
                    Err(e) => {
                        warn!(variant = index, error = %e, "trajectory failed");
                        None
                    }
                };
                let score = score_trajectory(report.as_ref());
                ScoredTrajectory {
                    index,
                    report,
                    score,
                    memory_ids,
                }
            });
        }

        let mut trajectories: Vec<ScoredTrajectory> = Vec::with_capacity(variants);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(trajectory) => trajectories.push(trajectory),
                Err(e) => warn!(error = %e, "trajectory task panicked"),
            }
        }
        trajectories.sort_by_key(|t| t.index);

        // Highest score wins; ties break to the earliest-launched variant.
        let winner_position = trajectories
            .iter()
            .enumerate()
            .filter(|(_, t)| t.report.as_ref().is_some_and(|r| r.success))
            .max_by(|(_, a), (_, b)| {
                a.score
                    .total_cmp(&b.score)
                    .then_with(|| b.index.cmp(&a.index))
            })
            .map(|(position, _)| position);

        let Some(position) = winner_position else {
            debug!("all trajectories failed, returning first variant result");
            let first = trajectories.into_iter().find(|t| t.index == 0);
            return Ok(ScalingOutcome {
                report: first.and_then(|t| t.report),
                score: 0.0,
                winner_index: None,
                iterations: 0,
                memories_used: Vec::new(),
            });
        };
        let winner = trajectories.swap_remove(position);

        debug!(
            variant = winner.index,
            score = winner.score,
            memories = winner.memory_ids.len(),
            "selected winning trajectory"
        );

        // Best-effort credit to the memories that seeded the winner.
        if !winner.memory_ids.is_empty() {
            let repository = Arc::clone(&self.repository);
            let ids = winner.memory_ids.clone();
            tokio::spawn(async move {
                if let Err(e) = repository.update_stats(&ids, true).await {
                    warn!(error = %e, "winner stat update failed");
                }
            });
        }

        Ok(ScalingOutcome {
            report: winner.report,
            score: winner.score,
            winner_index: Some(winner.index),
            iterations: 0,
            memories_used: winner.memory_ids,
        })
    }
}
