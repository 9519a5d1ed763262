//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 批量讲解集成测试

#[path = "../common/mod.rs"]
mod common;

use common::{sample_explanation, Fixture, StubGenerator, UPSTREAM_LIMIT};
use pathwise::backend::CacheStore;
use pathwise::keys::DEFAULT_CONTENT_TTL_SECS;
use pathwise::{BatchEntry, CachePolicy};
use std::sync::atomic::Ordering;
use std::time::Duration;

#[tokio::test]
async fn test_batch_returns_one_entry_per_distinct_title() {
    let fixture = Fixture::new();

    let results = fixture
        .accessor
        .batch_explanations("html", &[" Tags ", "Attributes", "Tags", ""])
        .await
        .unwrap();

    let titles: Vec<&str> = results.keys().map(String::as_str).collect();
    assert_eq!(titles, vec!["Attributes", "Tags"]);
    assert!(results.values().all(BatchEntry::is_ok));
    assert_eq!(fixture.generator.explanation_calls.load(Ordering::SeqCst), 2);

    // 一次批量读取，一次批量写入，没有逐个写入
    assert_eq!(fixture.store.multi_get_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.store.multi_set_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.store.set_calls.load(Ordering::SeqCst), 0);
    assert_eq!(fixture.store.get_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_batch_only_generates_misses() {
    let fixture = Fixture::new();
    let cached = pathwise::generation::TopicExplanation::new("Tags", "from cache");
    fixture
        .store
        .inner
        .set("html-Tags", serde_json::to_string(&cached).unwrap(), 60)
        .await
        .unwrap();

    let results = fixture
        .accessor
        .batch_explanations("html", &["Tags", "Forms"])
        .await
        .unwrap();

    assert_eq!(fixture.generator.explanation_calls.load(Ordering::SeqCst), 1);
    assert_eq!(results["Tags"].explanation(), Some(&cached));
    assert_eq!(
        results["Forms"].explanation(),
        Some(&sample_explanation("html", "Forms"))
    );

    // 命中的键不会被重写，TTL保持原值
    assert_eq!(fixture.store.inner.ttl_of("html-Tags").await, Some(60));
    assert_eq!(
        fixture.store.inner.ttl_of("html-Forms").await,
        Some(DEFAULT_CONTENT_TTL_SECS)
    );
}

#[tokio::test]
async fn test_batch_with_all_hits_skips_generation_and_writes() {
    let fixture = Fixture::new();
    fixture
        .accessor
        .batch_explanations("css", &["Selectors", "Flexbox"])
        .await
        .unwrap();

    let again = fixture
        .accessor
        .batch_explanations("css", &["Flexbox", "Selectors"])
        .await
        .unwrap();

    assert_eq!(again.len(), 2);
    assert_eq!(fixture.generator.explanation_calls.load(Ordering::SeqCst), 2);
    assert_eq!(fixture.store.multi_set_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_batch_respects_concurrency_bound() {
    let fixture = Fixture::with(
        StubGenerator::with_delay(Duration::from_millis(30)),
        CachePolicy::default(),
    );
    let titles: Vec<String> = (0..10).map(|i| format!("Step {}", i)).collect();

    let results = fixture
        .accessor
        .batch_explanations("rust", &titles)
        .await
        .unwrap();

    assert_eq!(results.len(), 10);
    assert!(
        results.values().all(BatchEntry::is_ok),
        "no call may be rejected by the upstream limit"
    );
    assert!(fixture.generator.peak() <= UPSTREAM_LIMIT);
    assert_eq!(fixture.generator.peak(), UPSTREAM_LIMIT);
    assert_eq!(fixture.accessor.limiter().in_flight(), 0);
}

#[tokio::test]
async fn test_batch_partial_failure() {
    let generator = StubGenerator::new();
    generator.fail_title("Forms", usize::MAX);
    let fixture = Fixture::with(generator, CachePolicy::default());

    let results = fixture
        .accessor
        .batch_explanations("html", &["Tags", "Forms", "Tables"])
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results["Tags"].is_ok());
    assert!(results["Tables"].is_ok());
    match &results["Forms"] {
        BatchEntry::Failed { error } => assert!(error.contains("malformed")),
        other => panic!("expected failure entry, got {:?}", other),
    }

    // 失败项按讲解的重试策略尝试三次，且不写入缓存
    assert_eq!(fixture.generator.explanation_calls.load(Ordering::SeqCst), 5);
    assert!(!fixture.store.inner.contains("html-Forms").await);
    assert!(fixture.store.inner.contains("html-Tags").await);
    assert!(fixture.store.inner.contains("html-Tables").await);
}

#[tokio::test]
async fn test_batch_failure_entry_serializes_as_error_object() {
    let entry = BatchEntry::Failed {
        error: "Generation failed: model returned no content".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&entry).unwrap(),
        serde_json::json!({ "error": "Generation failed: model returned no content" })
    );

    let ok = BatchEntry::Explanation(sample_explanation("html", "Tags"));
    let value = serde_json::to_value(&ok).unwrap();
    assert_eq!(value["subtopic"], "Tags");
}

#[tokio::test]
async fn test_batch_store_read_failure_surfaces() {
    let fixture = Fixture::new();
    fixture.store.set_fail_reads(true);

    let err = fixture
        .accessor
        .batch_explanations("html", &["Tags"])
        .await
        .unwrap_err();
    assert!(err.is_store_unavailable());
    assert_eq!(fixture.generator.total_calls(), 0);
}

#[tokio::test]
async fn test_batch_write_failure_still_returns_results() {
    let fixture = Fixture::new();
    fixture.store.set_fail_writes(true);

    let results = fixture
        .accessor
        .batch_explanations("html", &["Tags", "Forms"])
        .await
        .unwrap();

    assert!(results.values().all(BatchEntry::is_ok));
    assert_eq!(fixture.accessor.stats().snapshot().write_failures, 1);
}

#[tokio::test]
async fn test_empty_batch_touches_nothing() {
    let fixture = Fixture::new();
    let empty: [&str; 0] = [];

    let results = fixture
        .accessor
        .batch_explanations("html", &empty)
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(fixture.store.multi_get_calls.load(Ordering::SeqCst), 0);
}
