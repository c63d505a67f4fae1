//! Consolidation Service Use Case
//!
//! # Overview
//! The `ConsolidationService` keeps the memory store healthy over time. It
//! runs three maintenance passes strictly in order: **prune** low-quality
//! records, **merge** near-duplicates, **archive** stale ones. Pruning
//! first shrinks the O(n²) merge workload; archiving last avoids
//! archiving records a pass was about to delete.
//!
//! # Responsibilities
//! - **Prune**: hard-delete records that earned a poor success rate over
//!   enough retrievals.
//! - **Merge**: fold statistics of near-identical records (by cosine
//!   similarity) into the stronger twin and delete the weaker.
//! - **Archive**: transition records nobody touched for the configured
//!   horizon out of the retrieval set.
//!
//! # Failure containment
//! A failed initial scan aborts the run (`success = false`). Per-record
//! write failures are logged, noted on the stats, and skipped; one bad
//! record never aborts a pass.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use rbk_domain::entities::consolidation::ConsolidationStats;
use rbk_domain::entities::memory::{MemoryPatch, MemoryRecord};
use rbk_domain::error::Result;
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::ports::services::ConsolidationServiceInterface;
use rbk_domain::utils::time::{SECS_PER_DAY, epoch_secs_i64};
use rbk_domain::utils::{mask_id, vector::cosine_similarity};
use rbk_domain::value_objects::ConsolidationConfig;
use tracing::{debug, error, info, warn};

/// Periodic maintenance over the memory store.
pub struct ConsolidationServiceImpl {
    repository: Arc<dyn MemoryRepository>,
    config: ConsolidationConfig,
}

/// A duplicate candidate pair, ordered by similarity before merging.
struct DuplicatePair {
    left: usize,
    right: usize,
    similarity: f64,
}

impl ConsolidationServiceImpl {
    /// Create the service with its repository and thresholds.
    #[must_use]
    pub fn new(repository: Arc<dyn MemoryRepository>, config: ConsolidationConfig) -> Self {
        Self { repository, config }
    }

    /// Whether the prune predicate holds for `record`.
    fn should_prune(&self, record: &MemoryRecord) -> bool {
        record.times_retrieved >= self.config.min_retrievals_for_prune
            && record
                .success_rate
                .is_some_and(|rate| rate < self.config.low_quality_threshold)
    }

    /// Pass A: delete low-quality records. Returns the survivors.
    async fn prune_pass(
        &self,
        records: Vec<MemoryRecord>,
        stats: &mut ConsolidationStats,
    ) -> Vec<MemoryRecord> {
        let mut survivors = Vec::with_capacity(records.len());
        for record in records {
            if !self.should_prune(&record) {
                survivors.push(record);
                continue;
            }
            match self.repository.delete(&record.id).await {
                Ok(()) => {
                    debug!(id = %mask_id(&record.id), "pruned low-quality memory");
                    stats.pruned += 1;
                }
                Err(e) if e.is_not_found() => {
                    debug!(id = %mask_id(&record.id), "prune target already gone");
                }
                Err(e) => {
                    warn!(id = %mask_id(&record.id), error = %e, "prune delete failed");
                    stats.errors.push(format!("prune {}: {e}", mask_id(&record.id)));
                    survivors.push(record);
                }
            }
        }
        survivors
    }

    /// Winner of a duplicate pair: higher success rate (unknown loses to
    /// known), then more retrievals, then older creation, then id order.
    fn pick_winner(a: &MemoryRecord, b: &MemoryRecord) -> bool {
        match (a.success_rate, b.success_rate) {
            (Some(ra), Some(rb)) if ra != rb => return ra > rb,
            (Some(_), None) => return true,
            (None, Some(_)) => return false,
            (Some(_), Some(_)) | (None, None) => {}
        }
        if a.times_retrieved != b.times_retrieved {
            return a.times_retrieved > b.times_retrieved;
        }
        if a.created_at != b.created_at {
            return a.created_at < b.created_at;
        }
        a.id < b.id
    }

    /// Pass B: detect and merge near-duplicates. Returns the survivors.
    async fn merge_pass(
        &self,
        mut records: Vec<MemoryRecord>,
        stats: &mut ConsolidationStats,
    ) -> Vec<MemoryRecord> {
        let mut pairs = Vec::new();
        for i in 0..records.len() {
            for j in (i + 1)..records.len() {
                let (Some(ea), Some(eb)) = (&records[i].embedding, &records[j].embedding) else {
                    continue;
                };
                let similarity = cosine_similarity(&ea.vector, &eb.vector);
                if similarity >= self.config.duplicate_similarity_threshold {
                    pairs.push(DuplicatePair {
                        left: i,
                        right: j,
                        similarity,
                    });
                }
            }
        }
        // Strongest matches merge first; a loser is out for the rest of
        // the pass.
        pairs.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        let mut removed: HashSet<usize> = HashSet::new();
        for pair in pairs {
            if removed.contains(&pair.left) || removed.contains(&pair.right) {
                continue;
            }
            let (winner_idx, loser_idx) =
                if Self::pick_winner(&records[pair.left], &records[pair.right]) {
                    (pair.left, pair.right)
                } else {
                    (pair.right, pair.left)
                };

            let (winner_id, loser_id) =
                (records[winner_idx].id.clone(), records[loser_idx].id.clone());
            let patch = MemoryPatch {
                times_retrieved: Some(
                    records[winner_idx].times_retrieved + records[loser_idx].times_retrieved,
                ),
                times_used_in_success: Some(
                    records[winner_idx].times_used_in_success
                        + records[loser_idx].times_used_in_success,
                ),
                times_used_in_failure: Some(
                    records[winner_idx].times_used_in_failure
                        + records[loser_idx].times_used_in_failure,
                ),
                ..MemoryPatch::default()
            };

            let merged = match self.repository.update(&winner_id, patch).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(
                        winner = %mask_id(&winner_id),
                        loser = %mask_id(&loser_id),
                        error = %e,
                        "duplicate merge update failed"
                    );
                    stats
                        .errors
                        .push(format!("merge {}: {e}", mask_id(&winner_id)));
                    continue;
                }
            };
            // Later pairs must see the folded counters.
            records[winner_idx] = merged;

            match self.repository.delete(&loser_id).await {
                Ok(()) => {
                    debug!(
                        winner = %mask_id(&winner_id),
                        loser = %mask_id(&loser_id),
                        similarity = pair.similarity,
                        "merged duplicate memory"
                    );
                    stats.merged += 1;
                }
                Err(e) if e.is_not_found() => {
                    stats.merged += 1;
                }
                Err(e) => {
                    warn!(id = %mask_id(&loser_id), error = %e, "merge delete failed");
                    stats
                        .errors
                        .push(format!("merge delete {}: {e}", mask_id(&loser_id)));
                }
            }
            removed.insert(loser_idx);
        }

        let mut survivors = Vec::with_capacity(records.len() - removed.len());
        for (idx, record) in records.into_iter().enumerate() {
            if !removed.contains(&idx) {
                survivors.push(record);
            }
        }
        survivors
    }

    /// Pass C: archive records untouched for the configured horizon.
    async fn archive_pass(
        &self,
        records: &[MemoryRecord],
        now: i64,
        stats: &mut ConsolidationStats,
    ) {
        let horizon = now - self.config.stale_days * SECS_PER_DAY;
        for record in records {
            let last_touched = record.last_touched_at();
            // A zero timestamp means the record never carried one; leave it.
            if last_touched <= 0 || last_touched >= horizon {
                continue;
            }
            match self.repository.archive(&record.id).await {
                Ok(()) => {
                    debug!(id = %mask_id(&record.id), "archived stale memory");
                    stats.archived += 1;
                }
                Err(e) if e.is_not_found() => {
                    debug!(id = %mask_id(&record.id), "archive target already gone");
                }
                Err(e) => {
                    warn!(id = %mask_id(&record.id), error = %e, "archive failed");
                    stats
                        .errors
                        .push(format!("archive {}: {e}", mask_id(&record.id)));
                }
            }
        }
    }
}

#[async_trait]
impl ConsolidationServiceInterface for ConsolidationServiceImpl {
    /// # Errors
    ///
    /// Returns an error only when the system clock is unusable; store
    /// failures are reported through the stats.
    async fn consolidate(&self) -> Result<ConsolidationStats> {
        let started_at = epoch_secs_i64()?;
        let mut stats = ConsolidationStats::begin(started_at);

        let records = match self.repository.scan_all(self.config.scan_limit).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "consolidation scan failed");
                stats.success = false;
                stats.errors.push(format!("scan: {e}"));
                stats.finished_at = epoch_secs_i64()?;
                return Ok(stats);
            }
        };
        stats.total_memories_before = records.len();

        let survivors = self.prune_pass(records, &mut stats).await;
        let survivors = self.merge_pass(survivors, &mut stats).await;
        self.archive_pass(&survivors, started_at, &mut stats).await;

        stats.finished_at = epoch_secs_i64()?;
        info!(
            before = stats.total_memories_before,
            pruned = stats.pruned,
            merged = stats.merged,
            archived = stats.archived,
            errors = stats.errors.len(),
            "consolidation finished"
        );
        Ok(stats)
    }
}
