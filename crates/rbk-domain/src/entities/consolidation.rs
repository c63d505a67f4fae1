//! Consolidation run report.

use serde::{Deserialize, Serialize};

/// Outcome of one `consolidate()` run: prune, merge, and archive counters
/// plus per-record failure notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationStats {
    /// Epoch seconds when the run started
    pub started_at: i64,
    /// Epoch seconds when the run finished
    pub finished_at: i64,
    /// Active records visible to the initial scan
    pub total_memories_before: usize,
    /// Records hard-deleted by the prune pass
    pub pruned: usize,
    /// Duplicate pairs folded by the merge pass
    pub merged: usize,
    /// Records transitioned to archived by the archive pass
    pub archived: usize,
    /// False only when the initial scan failed and no pass ran
    pub success: bool,
    /// Per-record failure notes; never contains memory content
    pub errors: Vec<String>,
}

impl ConsolidationStats {
    /// Empty report for a run starting now.
    #[must_use]
    pub fn begin(started_at: i64) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            total_memories_before: 0,
            pruned: 0,
            merged: 0,
            archived: 0,
            success: true,
            errors: Vec::new(),
        }
    }
}
