//! In-Memory Memory Repository
//!
//! # Overview
//! The reference implementation of the `MemoryRepository` port: a
//! `RwLock`-guarded map with a content-hash dedup index and a linear
//! cosine scan for similarity retrieval. Within the documented scan cap
//! the linear scan is exact, deterministic, and fast enough.
//!
//! # Semantics
//! - **Dedup on add**: a draft whose text hash matches an existing record
//!   returns the existing id instead of creating a twin.
//! - **Deterministic ordering**: similarity desc, then success rate desc
//!   (unknown rates last), then `updated_at` desc, then id ascending.
//! - **Retrieval side effects**: every returned record's retrieval counter
//!   and `updated_at` are bumped under the same write lock, so the bump is
//!   atomic with selection.
//! - **Per-id linearizability**: all mutations take the write lock; there
//!   are no cross-id transactions.

use std::collections::HashMap;

use async_trait::async_trait;
use rbk_domain::entities::memory::{
    MemoryDraft, MemoryPatch, MemoryRecord, MemoryStatus,
};
use rbk_domain::error::{Error, Result};
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::utils::time::epoch_secs_i64;
use rbk_domain::utils::{id, mask_id, vector::cosine_similarity};
use rbk_domain::value_objects::RetrievalFilters;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Default)]
struct Store {
    records: HashMap<String, MemoryRecord>,
    /// content hash -> record id, for dedup on add
    hash_index: HashMap<String, String>,
}

/// In-memory reference implementation of the memory store.
pub struct InMemoryMemoryRepository {
    dimension: usize,
    inner: RwLock<Store>,
}

impl InMemoryMemoryRepository {
    /// Create an empty store validating against `dimension`.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: RwLock::new(Store::default()),
        }
    }

    fn record_hash(record: &MemoryRecord) -> String {
        rbk_domain::compute_content_hash(&format!(
            "{}\n{}\n{}",
            record.title, record.description, record.content
        ))
    }

    /// Retrieval ordering: similarity desc, success rate desc with
    /// unknown rates last, `updated_at` desc, id ascending.
    fn retrieval_order(
        a: &(f64, &MemoryRecord),
        b: &(f64, &MemoryRecord),
    ) -> std::cmp::Ordering {
        b.0.total_cmp(&a.0)
            .then_with(|| {
                let ra = a.1.success_rate.unwrap_or(f64::NEG_INFINITY);
                let rb = b.1.success_rate.unwrap_or(f64::NEG_INFINITY);
                rb.total_cmp(&ra)
            })
            .then_with(|| b.1.updated_at.cmp(&a.1.updated_at))
            .then_with(|| a.1.id.cmp(&b.1.id))
    }
}

#[async_trait]
impl MemoryRepository for InMemoryMemoryRepository {
    /// Validates the draft, dedups by content hash, assigns a fresh id.
    async fn add(&self, draft: MemoryDraft) -> Result<String> {
        draft.validate(self.dimension)?;
        let hash = draft.content_hash();

        let mut store = self.inner.write().await;
        if let Some(existing_id) = store.hash_index.get(&hash) {
            if store.records.contains_key(existing_id) {
                debug!(id = %mask_id(existing_id), "duplicate draft, returning existing id");
                return Ok(existing_id.clone());
            }
        }

        let now = epoch_secs_i64()?;
        let record = MemoryRecord {
            id: id::generate().to_string(),
            title: draft.title,
            description: draft.description,
            content: draft.content,
            category: draft.category,
            source: draft.source,
            embedding: draft.embedding,
            times_retrieved: 0,
            times_used_in_success: 0,
            times_used_in_failure: 0,
            success_rate: None,
            status: MemoryStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let assigned = record.id.clone();
        store.hash_index.insert(hash, assigned.clone());
        store.records.insert(assigned.clone(), record);
        debug!(id = %mask_id(&assigned), "stored memory record");
        Ok(assigned)
    }

    async fn get(&self, id: &str) -> Result<Option<MemoryRecord>> {
        let store = self.inner.read().await;
        Ok(store.records.get(id).cloned())
    }

    /// Applies the patch to a working copy, validates, then commits.
    async fn update(&self, id: &str, patch: MemoryPatch) -> Result<MemoryRecord> {
        let mut store = self.inner.write().await;
        let current = store
            .records
            .get(id)
            .ok_or_else(|| Error::not_found(format!("memory record {}", mask_id(id))))?;

        if current.status == MemoryStatus::Archived
            && patch.status == Some(MemoryStatus::Active)
        {
            return Err(Error::invalid_record(
                "archived records cannot return to active",
            ));
        }

        let old_hash = Self::record_hash(current);
        let mut updated = current.clone();
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(description) = patch.description {
            updated.description = description;
        }
        if let Some(content) = patch.content {
            updated.content = content;
        }
        if let Some(category) = patch.category {
            updated.category = category;
        }
        if let Some(source) = patch.source {
            updated.source = source;
        }
        if let Some(embedding) = patch.embedding {
            updated.embedding = Some(embedding);
        }
        if let Some(status) = patch.status {
            updated.status = status;
        }
        let touches_counters = patch.times_retrieved.is_some()
            || patch.times_used_in_success.is_some()
            || patch.times_used_in_failure.is_some();
        if let Some(times_retrieved) = patch.times_retrieved {
            updated.times_retrieved = times_retrieved;
        }
        if let Some(successes) = patch.times_used_in_success {
            updated.times_used_in_success = successes;
        }
        if let Some(failures) = patch.times_used_in_failure {
            updated.times_used_in_failure = failures;
        }
        if touches_counters {
            updated.recompute_success_rate();
        }
        updated.updated_at = epoch_secs_i64()?;
        updated.validate(self.dimension)?;

        let new_hash = Self::record_hash(&updated);
        if new_hash != old_hash {
            store.hash_index.remove(&old_hash);
            store.hash_index.insert(new_hash, updated.id.clone());
        }
        store.records.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut store = self.inner.write().await;
        let Some(record) = store.records.remove(id) else {
            return Err(Error::not_found(format!(
                "memory record {}",
                mask_id(id)
            )));
        };
        let hash = Self::record_hash(&record);
        if store.hash_index.get(&hash).is_some_and(|owner| owner == id) {
            store.hash_index.remove(&hash);
        }
        debug!(id = %mask_id(id), "deleted memory record");
        Ok(())
    }

    async fn archive(&self, id: &str) -> Result<()> {
        let mut store = self.inner.write().await;
        let now = epoch_secs_i64()?;
        let record = store
            .records
            .get_mut(id)
            .ok_or_else(|| Error::not_found(format!("memory record {}", mask_id(id))))?;
        record.status = MemoryStatus::Archived;
        record.updated_at = now;
        debug!(id = %mask_id(id), "archived memory record");
        Ok(())
    }

    /// Active records, oldest first, capped at `limit`.
    async fn scan_all(&self, limit: usize) -> Result<Vec<MemoryRecord>> {
        let store = self.inner.read().await;
        let mut records: Vec<MemoryRecord> = store
            .records
            .values()
            .filter(|r| r.status == MemoryStatus::Active)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        records.truncate(limit);
        Ok(records)
    }

    async fn retrieve_by_embedding(
        &self,
        query: &[f32],
        k: usize,
        filters: &RetrievalFilters,
    ) -> Result<Vec<MemoryRecord>> {
        let mut store = self.inner.write().await;
        let now = epoch_secs_i64()?;

        let mut scored: Vec<(f64, &MemoryRecord)> = store
            .records
            .values()
            .filter(|r| r.status == MemoryStatus::Active)
            .filter(|r| filters.matches(r))
            .filter_map(|r| {
                r.embedding
                    .as_ref()
                    .map(|e| (cosine_similarity(&e.vector, query), r))
            })
            .collect();
        scored.sort_by(Self::retrieval_order);

        let selected: Vec<String> = scored
            .into_iter()
            .take(k)
            .map(|(_, r)| r.id.clone())
            .collect();

        // Bump under the same lock so selection and side effect are atomic.
        let mut results = Vec::with_capacity(selected.len());
        for id in selected {
            if let Some(record) = store.records.get_mut(&id) {
                record.times_retrieved += 1;
                record.updated_at = now;
                results.push(record.clone());
            }
        }
        debug!(returned = results.len(), k, "similarity retrieval");
        Ok(results)
    }

    /// Missing ids are logged and skipped, never fatal.
    async fn update_stats(&self, ids: &[String], succeeded: bool) -> Result<()> {
        let mut store = self.inner.write().await;
        let now = epoch_secs_i64()?;
        for id in ids {
            let Some(record) = store.records.get_mut(id) else {
                warn!(id = %mask_id(id), "stat update for unknown record, skipping");
                continue;
            };
            if succeeded {
                record.times_used_in_success += 1;
            } else {
                record.times_used_in_failure += 1;
            }
            record.recompute_success_rate();
            record.updated_at = now;
        }
        Ok(())
    }
}
