//! Memory repository port.

use async_trait::async_trait;

use crate::entities::memory::{MemoryDraft, MemoryPatch, MemoryRecord};
use crate::error::Result;
use crate::value_objects::RetrievalFilters;

/// Port for the persistent memory store (CRUD, scan, similarity retrieval,
/// statistics).
///
/// The repository owns the persistent representation; every method deals in
/// value snapshots. Implementations provide linearizable per-id updates but
/// no cross-id transactions.
///
/// Retrieval ordering is deterministic: similarity desc, then success rate
/// desc with unknown rates last, then `updated_at` desc, then id ascending.
#[async_trait]
pub trait MemoryRepository: Send + Sync {
    /// Validate and insert a draft, returning the assigned id.
    ///
    /// Inserting a draft whose content hash matches an existing active
    /// record returns the existing id instead of creating a twin.
    async fn add(&self, draft: MemoryDraft) -> Result<String>;

    /// Fetch a snapshot by id; `None` when absent.
    async fn get(&self, id: &str) -> Result<Option<MemoryRecord>>;

    /// Apply a partial update and return the new snapshot.
    ///
    /// Recomputes `success_rate` whenever the patch touches counters, and
    /// rejects the `Archived -> Active` transition.
    async fn update(&self, id: &str, patch: MemoryPatch) -> Result<MemoryRecord>;

    /// Hard-delete a record.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Transition a record to archived (one-way).
    async fn archive(&self, id: &str) -> Result<()>;

    /// All active records, oldest first, capped at `limit`.
    async fn scan_all(&self, limit: usize) -> Result<Vec<MemoryRecord>>;

    /// Up to `k` active records ordered by decreasing similarity to `query`,
    /// after applying `filters`.
    ///
    /// Each returned record's `times_retrieved` is incremented and its
    /// `updated_at` bumped (at-least-once semantics); the returned snapshots
    /// reflect the bump.
    async fn retrieve_by_embedding(
        &self,
        query: &[f32],
        k: usize,
        filters: &RetrievalFilters,
    ) -> Result<Vec<MemoryRecord>>;

    /// Record a success or failure outcome for each id, recomputing rates.
    ///
    /// A missing id is logged and skipped, not fatal.
    async fn update_stats(&self, ids: &[String], succeeded: bool) -> Result<()>;
}
