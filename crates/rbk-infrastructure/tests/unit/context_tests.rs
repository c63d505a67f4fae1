//! Context wiring and maintenance job behavior.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rbk_domain::entities::consolidation::ConsolidationStats;
use rbk_domain::entities::memory::{MemoryCategory, MemoryDraft, MemorySource};
use rbk_domain::error::Result;
use rbk_domain::ports::providers::EmbeddingKind;
use rbk_domain::ports::services::ConsolidationServiceInterface;
use rbk_infrastructure::config::AppConfig;
use rbk_infrastructure::context::init_app;
use rbk_infrastructure::maintenance::spawn_consolidation_job;

fn small_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.embedding.dimension = 8;
    config
}

#[tokio::test]
async fn init_app_wires_a_working_store_and_services() {
    let ctx = init_app(small_config()).expect("init app");

    // Store through the shared repository using the shared embedder.
    let embedding = ctx
        .embedder()
        .embed("lesson text", EmbeddingKind::RetrievalDocument)
        .await
        .expect("embed");
    let id = ctx
        .repository()
        .add(MemoryDraft {
            title: "One lesson".to_owned(),
            description: "A description.".to_owned(),
            content: "The content.".to_owned(),
            category: MemoryCategory::GeneralStrategy,
            source: MemorySource::TaskSuccess,
            embedding: Some(embedding),
        })
        .await
        .expect("add");
    assert!(ctx.repository().get(&id).await.expect("get").is_some());

    // A consolidation run over the fresh store is a clean no-op.
    let stats = ctx
        .consolidation_service()
        .consolidate()
        .await
        .expect("consolidate");
    assert!(stats.success);
    assert_eq!(stats.total_memories_before, 1);
    assert_eq!(stats.pruned + stats.merged + stats.archived, 0);
}

#[tokio::test]
async fn retrieval_finds_what_the_context_stored() {
    let ctx = init_app(small_config()).expect("init app");

    let embedding = ctx
        .embedder()
        .embed("use timeouts around network calls", EmbeddingKind::RetrievalDocument)
        .await
        .expect("embed");
    ctx.repository()
        .add(MemoryDraft {
            title: "Timeouts".to_owned(),
            description: "Network calls need deadlines.".to_owned(),
            content: "Wrap outbound calls in explicit timeouts.".to_owned(),
            category: MemoryCategory::FixStrategy,
            source: MemorySource::RepairSuccess,
            embedding: Some(embedding),
        })
        .await
        .expect("add");

    let results = ctx
        .code_gen_retrieval()
        .retrieve_for_code_generation("use timeouts around network calls", None, 5)
        .await
        .expect("retrieve");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Timeouts");
}

struct CountingConsolidation {
    runs: AtomicUsize,
}

#[async_trait]
impl ConsolidationServiceInterface for CountingConsolidation {
    async fn consolidate(&self) -> Result<ConsolidationStats> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(ConsolidationStats::begin(0))
    }
}

#[tokio::test]
async fn maintenance_job_runs_periodically_and_shuts_down() {
    let service = Arc::new(CountingConsolidation {
        runs: AtomicUsize::new(0),
    });
    let handle = spawn_consolidation_job(
        Arc::clone(&service) as Arc<dyn ConsolidationServiceInterface>,
        Duration::from_millis(20),
    );

    tokio::time::sleep(Duration::from_millis(110)).await;
    handle.shutdown().await;
    let runs = service.runs.load(Ordering::SeqCst);
    assert!(runs >= 2, "expected at least two scheduled runs, saw {runs}");

    // No further runs after shutdown.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(service.runs.load(Ordering::SeqCst), runs);
}
