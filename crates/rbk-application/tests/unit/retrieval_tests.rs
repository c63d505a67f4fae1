//! Code-generation retrieval preference behavior.

use std::sync::Arc;

use rbk_application::CodeGenRetrievalImpl;
use rbk_domain::entities::memory::MemoryCategory;
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::ports::services::CodeGenRetrievalInterface;
use rbk_providers::InMemoryMemoryRepository;

use crate::support::{FixedEmbedder, draft};

const DIM: usize = 4;

fn service(repository: Arc<dyn MemoryRepository>) -> CodeGenRetrievalImpl {
    CodeGenRetrievalImpl::new(
        repository,
        Arc::new(FixedEmbedder::new(vec![1.0, 0.0, 0.0, 0.0])),
    )
}

#[tokio::test]
async fn prefers_build_related_memories_when_enough_rank() {
    let repository: Arc<dyn MemoryRepository> = Arc::new(InMemoryMemoryRepository::new(DIM));
    // Two build-related and two general memories, all near the query.
    repository
        .add(draft("link error", MemoryCategory::BuildFailure, vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .expect("add");
    repository
        .add(draft("type fix", MemoryCategory::FixStrategy, vec![0.9, 0.1, 0.0, 0.0]))
        .await
        .expect("add");
    repository
        .add(draft("naming habit", MemoryCategory::GeneralStrategy, vec![0.8, 0.2, 0.0, 0.0]))
        .await
        .expect("add");
    repository
        .add(draft("doc habit", MemoryCategory::GeneralStrategy, vec![0.7, 0.3, 0.0, 0.0]))
        .await
        .expect("add");

    let results = service(repository)
        .retrieve_for_code_generation("fix the linker failure", Some("src/build.rs"), 3)
        .await
        .expect("retrieve");

    assert_eq!(results.len(), 2);
    assert!(
        results
            .iter()
            .all(|m| matches!(
                m.category,
                MemoryCategory::BuildFailure
                    | MemoryCategory::ErrorPattern
                    | MemoryCategory::FixStrategy
            ))
    );
}

#[tokio::test]
async fn falls_back_to_the_general_set_when_too_few_build_results() {
    let repository: Arc<dyn MemoryRepository> = Arc::new(InMemoryMemoryRepository::new(DIM));
    repository
        .add(draft("link error", MemoryCategory::BuildFailure, vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .expect("add");
    repository
        .add(draft("naming habit", MemoryCategory::GeneralStrategy, vec![0.9, 0.1, 0.0, 0.0]))
        .await
        .expect("add");
    repository
        .add(draft("doc habit", MemoryCategory::GeneralStrategy, vec![0.8, 0.2, 0.0, 0.0]))
        .await
        .expect("add");

    let results = service(repository)
        .retrieve_for_code_generation("improve naming", None, 2)
        .await
        .expect("retrieve");

    // Only one build-related candidate exists, so the general ranking wins.
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].category, MemoryCategory::BuildFailure);
    assert_eq!(results[1].category, MemoryCategory::GeneralStrategy);
}

#[tokio::test]
async fn respects_the_requested_top_k() {
    let repository: Arc<dyn MemoryRepository> = Arc::new(InMemoryMemoryRepository::new(DIM));
    for i in 0..5 {
        #[allow(clippy::cast_precision_loss)]
        let x = 1.0 - (i as f32) * 0.1;
        repository
            .add(draft(
                &format!("general {i}"),
                MemoryCategory::GeneralStrategy,
                vec![x, 1.0 - x, 0.0, 0.0],
            ))
            .await
            .expect("add");
    }

    let results = service(repository)
        .retrieve_for_code_generation("anything", None, 3)
        .await
        .expect("retrieve");

    assert_eq!(results.len(), 3);
}
