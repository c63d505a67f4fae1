//! Reference repository semantics: validation, dedup, ordering, stats.

use rbk_domain::entities::memory::{
    MemoryCategory, MemoryDraft, MemoryPatch, MemorySource, MemoryStatus,
};
use rbk_domain::ports::repositories::MemoryRepository;
use rbk_domain::value_objects::{Embedding, RetrievalFilters};
use rbk_providers::InMemoryMemoryRepository;

const DIM: usize = 4;

fn draft(title: &str, vector: Vec<f32>) -> MemoryDraft {
    MemoryDraft {
        title: title.to_owned(),
        description: format!("description for {title}"),
        content: format!("content for {title}"),
        category: MemoryCategory::ErrorPattern,
        source: MemorySource::BuildFailure,
        embedding: Some(Embedding::new(vector, "fixed")),
    }
}

fn repo() -> InMemoryMemoryRepository {
    InMemoryMemoryRepository::new(DIM)
}

#[tokio::test]
async fn add_assigns_ids_and_get_returns_snapshots() {
    let repo = repo();
    let id = repo
        .add(draft("first", vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .expect("add");

    let record = repo.get(&id).await.expect("get").expect("present");
    assert_eq!(record.id, id);
    assert_eq!(record.status, MemoryStatus::Active);
    assert_eq!(record.times_retrieved, 0);
    assert_eq!(record.success_rate, None);
    assert!(record.created_at > 0);
}

#[tokio::test]
async fn add_rejects_dimension_mismatch_and_missing_embedding() {
    let repo = repo();

    let wrong_dim = repo.add(draft("short", vec![1.0, 0.0])).await;
    assert!(wrong_dim.is_err());

    let mut missing = draft("missing", vec![1.0, 0.0, 0.0, 0.0]);
    missing.embedding = None;
    assert!(repo.add(missing).await.is_err());
}

#[tokio::test]
async fn add_dedups_identical_drafts() {
    let repo = repo();
    let first = repo
        .add(draft("same lesson", vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .expect("add");
    let second = repo
        .add(draft("same lesson", vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .expect("add again");

    assert_eq!(first, second);
    assert_eq!(repo.scan_all(10).await.expect("scan").len(), 1);
}

#[tokio::test]
async fn retrieval_orders_by_similarity_then_rate_then_recency_then_id() {
    let repo = repo();
    // Identical similarity for b and c; b gets a better rate.
    let a = repo.add(draft("a", vec![1.0, 0.0, 0.0, 0.0])).await.expect("a");
    let b = repo.add(draft("b", vec![0.0, 1.0, 0.0, 0.0])).await.expect("b");
    let c = repo.add(draft("c", vec![0.0, 1.0, 0.0, 0.0])).await.expect("c");

    repo.update(
        &b,
        MemoryPatch {
            times_retrieved: Some(4),
            times_used_in_success: Some(3),
            times_used_in_failure: Some(1),
            ..MemoryPatch::default()
        },
    )
    .await
    .expect("rate b");
    repo.update(
        &c,
        MemoryPatch {
            times_retrieved: Some(4),
            times_used_in_success: Some(1),
            times_used_in_failure: Some(3),
            ..MemoryPatch::default()
        },
    )
    .await
    .expect("rate c");

    let query = vec![0.1, 0.9, 0.0, 0.0];
    let results = repo
        .retrieve_by_embedding(&query, 10, &RetrievalFilters::default())
        .await
        .expect("retrieve");

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![b.as_str(), c.as_str(), a.as_str()]);
}

#[tokio::test]
async fn retrieval_respects_k_and_bumps_counters() {
    let repo = repo();
    for i in 0..4 {
        #[allow(clippy::cast_precision_loss)]
        let x = 1.0 - (i as f32) * 0.05;
        repo.add(draft(&format!("m{i}"), vec![x, 1.0 - x, 0.0, 0.0]))
            .await
            .expect("add");
    }

    let results = repo
        .retrieve_by_embedding(&[1.0, 0.0, 0.0, 0.0], 2, &RetrievalFilters::default())
        .await
        .expect("retrieve");

    assert_eq!(results.len(), 2);
    for returned in &results {
        assert_eq!(returned.times_retrieved, 1, "snapshot reflects the bump");
        let stored = repo
            .get(&returned.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(stored.times_retrieved, 1);
        assert!(stored.updated_at >= stored.created_at);
    }
}

#[tokio::test]
async fn retrieval_excludes_archived_records() {
    let repo = repo();
    let keep = repo.add(draft("keep", vec![1.0, 0.0, 0.0, 0.0])).await.expect("add");
    let gone = repo.add(draft("gone", vec![1.0, 0.0, 0.0, 0.0])).await.expect("add");
    repo.archive(&gone).await.expect("archive");

    let results = repo
        .retrieve_by_embedding(&[1.0, 0.0, 0.0, 0.0], 10, &RetrievalFilters::default())
        .await
        .expect("retrieve");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, keep);
    // Archived records stay addressable by id.
    assert_eq!(
        repo.get(&gone).await.expect("get").expect("present").status,
        MemoryStatus::Archived
    );
}

#[tokio::test]
async fn min_success_rate_filter_admits_unknown_rates() {
    let repo = repo();
    let unknown = repo.add(draft("unknown", vec![1.0, 0.0, 0.0, 0.0])).await.expect("add");
    let low = repo.add(draft("low", vec![1.0, 0.0, 0.0, 0.0])).await.expect("add");
    repo.update(
        &low,
        MemoryPatch {
            times_retrieved: Some(10),
            times_used_in_success: Some(2),
            times_used_in_failure: Some(8),
            ..MemoryPatch::default()
        },
    )
    .await
    .expect("rate low");

    let filters = RetrievalFilters {
        min_success_rate: Some(0.5),
        categories: None,
    };
    let results = repo
        .retrieve_by_embedding(&[1.0, 0.0, 0.0, 0.0], 10, &filters)
        .await
        .expect("retrieve");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, unknown);
}

#[tokio::test]
async fn category_filter_is_an_inclusion_set() {
    let repo = repo();
    repo.add(draft("pattern", vec![1.0, 0.0, 0.0, 0.0])).await.expect("add");
    let mut strategy = draft("strategy", vec![1.0, 0.0, 0.0, 0.0]);
    strategy.category = MemoryCategory::GeneralStrategy;
    repo.add(strategy).await.expect("add");

    let filters = RetrievalFilters {
        min_success_rate: None,
        categories: Some(vec![MemoryCategory::GeneralStrategy]),
    };
    let results = repo
        .retrieve_by_embedding(&[1.0, 0.0, 0.0, 0.0], 10, &filters)
        .await
        .expect("retrieve");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].category, MemoryCategory::GeneralStrategy);
}

#[tokio::test]
async fn update_stats_recomputes_rates_and_skips_unknown_ids() {
    let repo = repo();
    let id = repo.add(draft("tracked", vec![1.0, 0.0, 0.0, 0.0])).await.expect("add");
    repo.retrieve_by_embedding(&[1.0, 0.0, 0.0, 0.0], 1, &RetrievalFilters::default())
        .await
        .expect("retrieve");
    repo.retrieve_by_embedding(&[1.0, 0.0, 0.0, 0.0], 1, &RetrievalFilters::default())
        .await
        .expect("retrieve");

    repo.update_stats(&[id.clone(), "missing".to_owned()], true)
        .await
        .expect("stats");
    repo.update_stats(&[id.clone()], false).await.expect("stats");

    let record = repo.get(&id).await.expect("get").expect("present");
    assert_eq!(record.times_used_in_success, 1);
    assert_eq!(record.times_used_in_failure, 1);
    assert_eq!(record.times_retrieved, 2);
    let rate = record.success_rate.expect("rate known");
    assert!((rate - 0.5).abs() < 1e-12);
    assert!(
        record.times_used_in_success + record.times_used_in_failure <= record.times_retrieved
    );
}

#[tokio::test]
async fn archived_records_cannot_return_to_active() {
    let repo = repo();
    let id = repo.add(draft("one way", vec![1.0, 0.0, 0.0, 0.0])).await.expect("add");
    repo.archive(&id).await.expect("archive");

    let back_to_active = repo
        .update(
            &id,
            MemoryPatch {
                status: Some(MemoryStatus::Active),
                ..MemoryPatch::default()
            },
        )
        .await;

    assert!(back_to_active.is_err());
}

#[tokio::test]
async fn delete_is_hard_and_not_found_is_reported() {
    let repo = repo();
    let id = repo.add(draft("ephemeral", vec![1.0, 0.0, 0.0, 0.0])).await.expect("add");

    repo.delete(&id).await.expect("delete");
    assert!(repo.get(&id).await.expect("get").is_none());

    let again = repo.delete(&id).await;
    assert!(again.expect_err("missing").is_not_found());
}

#[tokio::test]
async fn scan_all_returns_active_records_oldest_first_up_to_the_cap() {
    let repo = repo();
    let first = repo.add(draft("m0", vec![1.0, 0.0, 0.0, 0.0])).await.expect("add");
    for i in 1..5 {
        repo.add(draft(&format!("m{i}"), vec![0.0, 1.0, 0.0, 0.0]))
            .await
            .expect("add");
    }
    repo.archive(&first).await.expect("archive");

    let scanned = repo.scan_all(3).await.expect("scan");

    assert_eq!(scanned.len(), 3);
    assert!(scanned.iter().all(|r| r.status == MemoryStatus::Active));
}
