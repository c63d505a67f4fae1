//! Shared fakes and builders for application-layer tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rbk_domain::entities::memory::{
    MemoryCategory, MemoryDraft, MemoryPatch, MemoryRecord, MemorySource, MemoryStatus,
};
use rbk_domain::error::{Error, Result};
use rbk_domain::ports::execution::{TaskExecutor, TaskReflector};
use rbk_domain::ports::providers::{
    EmbeddingKind, EmbeddingProvider, GenerationOptions, TextGenerator,
};
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::value_objects::{Embedding, RetrievalFilters};
use rbk_domain::entities::scaling::{ExecutionReport, Reflection, TaskSpec};

/// Executor backed by a plain closure.
pub struct FnExecutor<F>(pub F);

#[async_trait]
impl<F> TaskExecutor for FnExecutor<F>
where
    F: Fn(&TaskSpec, &[MemoryRecord]) -> Result<Option<ExecutionReport>> + Send + Sync,
{
    async fn execute(
        &self,
        task: &TaskSpec,
        memories: &[MemoryRecord],
    ) -> Result<Option<ExecutionReport>> {
        (self.0)(task, memories)
    }
}

/// Reflector backed by a plain closure.
pub struct FnReflector<F>(pub F);

#[async_trait]
impl<F> TaskReflector for FnReflector<F>
where
    F: Fn(&TaskSpec, Option<&ExecutionReport>, &[MemoryRecord]) -> Result<Reflection>
        + Send
        + Sync,
{
    async fn reflect(
        &self,
        task: &TaskSpec,
        result: Option<&ExecutionReport>,
        memories: &[MemoryRecord],
    ) -> Result<Reflection> {
        (self.0)(task, result, memories)
    }
}

/// Embedder returning one fixed vector for every input.
pub struct FixedEmbedder {
    vector: Vec<f32>,
    fail: bool,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            fail: false,
        }
    }

    pub fn failing(dimension: usize) -> Self {
        Self {
            vector: vec![0.0; dimension],
            fail: true,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str, _kind: EmbeddingKind) -> Result<Embedding> {
        if self.fail {
            return Err(Error::embedding("embedder down"));
        }
        Ok(Embedding::new(self.vector.clone(), "fixed"))
    }

    fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Generator returning one canned response, or a failure.
pub struct FixedGenerator {
    response: Option<String>,
}

impl FixedGenerator {
    pub fn new<S: Into<String>>(response: S) -> Self {
        Self {
            response: Some(response.into()),
        }
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
        self.response
            .clone()
            .ok_or_else(|| Error::text_generation("generator down"))
    }
}

/// Hand-rolled repository stub with directly seeded records.
///
/// Used where tests need timestamps or counters no port operation could
/// produce (stale records, scan failures). Mutation tracking happens on
/// the records themselves.
pub struct StubRepository {
    records: Mutex<HashMap<String, MemoryRecord>>,
    fail_scan: bool,
}

impl StubRepository {
    pub fn new(seed: Vec<MemoryRecord>) -> Self {
        let records = seed.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            records: Mutex::new(records),
            fail_scan: false,
        }
    }

    pub fn failing_scan() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_scan: true,
        }
    }

    pub fn snapshot(&self, id: &str) -> Option<MemoryRecord> {
        self.records.lock().expect("stub lock").get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("stub lock").len()
    }
}

#[async_trait]
impl MemoryRepository for StubRepository {
    async fn add(&self, _draft: MemoryDraft) -> Result<String> {
        Err(Error::store("stub does not accept inserts"))
    }

    async fn get(&self, id: &str) -> Result<Option<MemoryRecord>> {
        Ok(self.snapshot(id))
    }

    async fn update(&self, id: &str, patch: MemoryPatch) -> Result<MemoryRecord> {
        let mut records = self.records.lock().expect("stub lock");
        let record = records
            .get_mut(id)
            .ok_or_else(|| Error::not_found(format!("memory record {id}")))?;
        if let Some(times_retrieved) = patch.times_retrieved {
            record.times_retrieved = times_retrieved;
        }
        if let Some(successes) = patch.times_used_in_success {
            record.times_used_in_success = successes;
        }
        if let Some(failures) = patch.times_used_in_failure {
            record.times_used_in_failure = failures;
        }
        if patch.touches_counters() {
            record.recompute_success_rate();
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut records = self.records.lock().expect("stub lock");
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("memory record {id}")))
    }

    async fn archive(&self, id: &str) -> Result<()> {
        let mut records = self.records.lock().expect("stub lock");
        let record = records
            .get_mut(id)
            .ok_or_else(|| Error::not_found(format!("memory record {id}")))?;
        record.status = MemoryStatus::Archived;
        Ok(())
    }

    async fn scan_all(&self, limit: usize) -> Result<Vec<MemoryRecord>> {
        if self.fail_scan {
            return Err(Error::store("scan unavailable"));
        }
        let records = self.records.lock().expect("stub lock");
        let mut active: Vec<MemoryRecord> = records
            .values()
            .filter(|r| r.status == MemoryStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        active.truncate(limit);
        Ok(active)
    }

    async fn retrieve_by_embedding(
        &self,
        _query: &[f32],
        _k: usize,
        _filters: &RetrievalFilters,
    ) -> Result<Vec<MemoryRecord>> {
        Ok(Vec::new())
    }

    async fn update_stats(&self, _ids: &[String], _succeeded: bool) -> Result<()> {
        Ok(())
    }
}

/// A valid record with neutral counters, ready to be specialized.
pub fn record(id: &str, embedding: Option<Vec<f32>>, now: i64) -> MemoryRecord {
    MemoryRecord {
        id: id.to_owned(),
        title: format!("lesson {id}"),
        description: format!("description for {id}"),
        content: format!("content for {id}"),
        category: MemoryCategory::GeneralStrategy,
        source: MemorySource::TaskFailure,
        embedding: embedding.map(|v| Embedding::new(v, "fixed")),
        times_retrieved: 0,
        times_used_in_success: 0,
        times_used_in_failure: 0,
        success_rate: None,
        status: MemoryStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

/// Set counters and recompute the rate, keeping the invariant intact.
pub fn with_counters(mut record: MemoryRecord, retrieved: u64, s: u64, f: u64) -> MemoryRecord {
    record.times_retrieved = retrieved;
    record.times_used_in_success = s;
    record.times_used_in_failure = f;
    record.recompute_success_rate();
    record
}

/// A draft with a caller-chosen embedding vector.
pub fn draft(title: &str, category: MemoryCategory, vector: Vec<f32>) -> MemoryDraft {
    MemoryDraft {
        title: title.to_owned(),
        description: format!("description for {title}"),
        content: format!("content for {title}"),
        category,
        source: MemorySource::TaskFailure,
        embedding: Some(Embedding::new(vector, "fixed")),
    }
}

/// Report with the given knobs; `None` fields skip their score bonus.
pub fn report(
    success: bool,
    steps: Option<u32>,
    execution_time_ms: Option<u64>,
    output_keys: usize,
    html_len: usize,
) -> ExecutionReport {
    let output_data = (output_keys > 0).then(|| {
        (0..output_keys)
            .map(|i| (format!("key{i}"), serde_json::Value::from(i)))
            .collect::<serde_json::Map<String, serde_json::Value>>()
    });
    let html_report = (html_len > 0).then(|| "x".repeat(html_len));
    ExecutionReport {
        success,
        steps,
        execution_time_ms,
        output_data,
        html_report,
    }
}
