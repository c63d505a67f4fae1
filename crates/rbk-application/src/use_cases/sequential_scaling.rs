//! Sequential Self-Refinement Scaling Use Case
//!
//! # Overview
//! Runs one trajectory at a time, asking a reflector between iterations
//! whether (and how) to refine the task, and keeps the best-scoring result
//! seen across the whole loop. Iterations are strictly sequential: the
//! next one starts only after reflection returns.
//!
//! # Termination
//! The loop stops on the first of: iteration cap reached, early-stop score
//! on a success, reflector declines to refine, reflector failure, or — in
//! the reflector-less mode — the first success.

use std::sync::Arc;

use async_trait::async_trait;
use rbk_domain::constants::{
    SEQUENTIAL_EARLY_STOP_SCORE, SEQUENTIAL_MIN_SUCCESS_RATE, SEQUENTIAL_TOP_K,
};
use rbk_domain::entities::scaling::{ExecutionReport, ScalingOutcome, TaskSpec};
use rbk_domain::error::Result;
use rbk_domain::ports::execution::{TaskExecutor, TaskReflector};
use rbk_domain::ports::providers::{EmbeddingKind, EmbeddingProvider};
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::ports::services::SequentialScalingInterface;
use rbk_domain::value_objects::{MattsConfig, RetrievalFilters};
use tracing::{debug, warn};

use crate::use_cases::trajectory_scorer::score_trajectory;

/// Memory-aware sequential self-refinement over an opaque executor.
pub struct SequentialScalingImpl {
    repository: Arc<dyn MemoryRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: MattsConfig,
}

impl SequentialScalingImpl {
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

    /// Plain single execution used when the strategy is disabled.
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
            iterations: 1,
            memories_used: Vec::new(),
        }
    }
}

#[async_trait]
impl SequentialScalingInterface for SequentialScalingImpl {
    /// # Errors
    ///
    /// Propagates embedder and retrieval failures; executor and reflector
    /// failures are contained, terminating the loop with the best result
    /// seen so far.
    async fn sequential_scaling(
        &self,
        task: &TaskSpec,
        executor: Arc<dyn TaskExecutor>,
        reflector: Option<Arc<dyn TaskReflector>>,
        max_iterations: usize,
    ) -> Result<ScalingOutcome> {
        if !self.config.sequential_enabled {
            debug!("sequential scaling disabled, single execution");
            return Ok(self.execute_single(task, executor).await);
        }

        let filters = RetrievalFilters {
            min_success_rate: Some(SEQUENTIAL_MIN_SUCCESS_RATE),
            categories: None,
        };

        let mut current_task = task.clone();
        let mut best_report: Option<ExecutionReport> = None;
        let mut best_score = 0.0_f64;
        let mut best_memory_ids: Vec<String> = Vec::new();
        let mut iterations = 0_u32;

        for iteration in 1..=max_iterations {
            // The task may have been refined, so the query is re-embedded
            // every iteration.
            let query = self
                .embedder
                .embed(&current_task.query_text(), EmbeddingKind::RetrievalQuery)
                .await?;
            let memories = self
                .repository
                .retrieve_by_embedding(&query.vector, SEQUENTIAL_TOP_K, &filters)
                .await?;

            let report = match executor.execute(&current_task, &memories).await {
                Ok(report) => report,
                Err(e) => {
                    warn!(iteration, error = %e, "iteration execution failed");
                    None
                }
            };
            let score = score_trajectory(report.as_ref());
            iterations = u32::try_from(iteration).unwrap_or(u32::MAX);

            if score > best_score {
                best_score = score;
                best_report.clone_from(&report);
                best_memory_ids = memories.iter().map(|m| m.id.clone()).collect();
            }

            let succeeded = report.as_ref().is_some_and(|r| r.success);
            if succeeded && score > SEQUENTIAL_EARLY_STOP_SCORE {
                debug!(iteration, score, "early stop on high-scoring success");
                break;
            }

            let Some(reflector) = reflector.as_ref() else {
                if succeeded {
                    break;
                }
                // Retry unchanged; bounded by the iteration cap.
                continue;
            };

            match reflector
                .reflect(&current_task, report.as_ref(), &memories)
                .await
            {
                Ok(reflection) if reflection.should_refine => {
                    if let Some(refined) = reflection.refined_task {
                        current_task = current_task.merge(&refined);
                    }
                }
                Ok(_) => {
                    debug!(iteration, "reflector declined further refinement");
                    break;
                }
                Err(e) => {
                    warn!(iteration, error = %e, "reflection failed, keeping best result");
                    break;
                }
            }
        }

        debug!(iterations, best_score, "sequential scaling finished");
        Ok(ScalingOutcome {
            report: best_report,
            score: best_score,
            winner_index: None,
            iterations,
            memories_used: best_memory_ids,
        })
    }
}
