//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 单项旁路缓存集成测试

#[path = "../common/mod.rs"]
mod common;

use common::{sample_explanation, sample_quiz, Fixture, StubGenerator};
use pathwise::backend::CacheStore;
use pathwise::generation::Quiz;
use pathwise::keys::{DEFAULT_CONTENT_TTL_SECS, QUIZ_TTL_SECS};
use pathwise::{CacheError, CachePolicy, KeyScheme};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_quiz_miss_then_hit() {
    let fixture = Fixture::new();

    let first = fixture.accessor.quiz("html").await.unwrap();
    assert_eq!(first, sample_quiz("html"));
    assert_eq!(fixture.generator.quiz_calls.load(Ordering::SeqCst), 1);

    // 缓存键就是主题本身，TTL为一天
    assert_eq!(fixture.store.inner.ttl_of("html").await, Some(QUIZ_TTL_SECS));

    let second = fixture.accessor.quiz("html").await.unwrap();
    assert_eq!(second, first);
    assert_eq!(
        fixture.generator.quiz_calls.load(Ordering::SeqCst),
        1,
        "second request must be served from the cache"
    );

    let stats = fixture.accessor.stats().snapshot();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.generations, 1);
}

#[tokio::test]
async fn test_roadmap_keys_include_score() {
    let fixture = Fixture::new();

    let beginner = fixture.accessor.roadmap("html", 0).await.unwrap();
    let advanced = fixture.accessor.roadmap("html", 8).await.unwrap();
    assert_ne!(beginner, advanced);
    assert_eq!(fixture.generator.roadmap_calls.load(Ordering::SeqCst), 2);

    assert_eq!(
        fixture.store.inner.ttl_of("html-0").await,
        Some(DEFAULT_CONTENT_TTL_SECS)
    );
    assert_eq!(
        fixture.store.inner.ttl_of("html-8").await,
        Some(DEFAULT_CONTENT_TTL_SECS)
    );

    fixture.accessor.roadmap("html", 8).await.unwrap();
    assert_eq!(fixture.generator.roadmap_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_explanation_is_cached_for_thirty_days() {
    let fixture = Fixture::new();

    let explanation = fixture.accessor.explanation("html", "Tags").await.unwrap();
    assert_eq!(explanation, sample_explanation("html", "Tags"));
    assert_eq!(
        fixture.store.inner.ttl_of("html-Tags").await,
        Some(DEFAULT_CONTENT_TTL_SECS)
    );

    fixture.accessor.explanation("html", "Tags").await.unwrap();
    assert_eq!(fixture.generator.explanation_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_generation_is_not_cached() {
    let fixture = Fixture::new();
    fixture.generator.set_failing(true);

    let err = fixture.accessor.quiz("html").await.unwrap_err();
    assert!(matches!(err, CacheError::GenerationFailed(_)));
    assert!(!fixture.store.inner.contains("html").await);
    assert_eq!(fixture.store.set_calls.load(Ordering::SeqCst), 0);

    // 下一次请求重新生成，而不是返回缓存的错误
    fixture.generator.set_failing(false);
    let quiz = fixture.accessor.quiz("html").await.unwrap();
    assert_eq!(quiz, sample_quiz("html"));
    assert_eq!(fixture.generator.quiz_calls.load(Ordering::SeqCst), 2);
    assert!(fixture.store.inner.contains("html").await);
}

#[tokio::test]
async fn test_quiz_and_roadmap_are_not_retried() {
    let fixture = Fixture::new();
    fixture.generator.set_failing(true);

    assert!(fixture.accessor.quiz("rust").await.is_err());
    assert!(fixture.accessor.roadmap("rust", 3).await.is_err());

    assert_eq!(fixture.generator.quiz_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.generator.roadmap_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.accessor.stats().snapshot().generation_failures, 2);
}

#[tokio::test]
async fn test_explanation_retries_until_success() {
    let generator = StubGenerator::new();
    generator.fail_title("Tags", 2);
    let fixture = Fixture::with(generator, CachePolicy::default());

    let explanation = fixture.accessor.explanation("html", "Tags").await.unwrap();
    assert_eq!(explanation.subtopic, "Tags");
    assert_eq!(fixture.generator.explanation_calls.load(Ordering::SeqCst), 3);
    assert!(fixture.store.inner.contains("html-Tags").await);
}

#[tokio::test]
async fn test_explanation_gives_up_after_three_attempts() {
    let generator = StubGenerator::new();
    generator.fail_title("Tags", usize::MAX);
    let fixture = Fixture::with(generator, CachePolicy::default());

    let err = fixture
        .accessor
        .explanation("html", "Tags")
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::GenerationFailed(_)));
    assert_eq!(fixture.generator.explanation_calls.load(Ordering::SeqCst), 3);
    assert!(!fixture.store.inner.contains("html-Tags").await);
}

#[tokio::test]
async fn test_store_read_failure_surfaces_without_generation() {
    let fixture = Fixture::new();
    fixture.store.set_fail_reads(true);

    let err = fixture.accessor.quiz("html").await.unwrap_err();
    assert!(err.is_store_unavailable());
    assert_eq!(
        fixture.generator.total_calls(),
        0,
        "a store outage must not turn into upstream traffic"
    );
}

#[tokio::test]
async fn test_store_write_failure_still_returns_value() {
    let fixture = Fixture::new();
    fixture.store.set_fail_writes(true);

    let quiz = fixture.accessor.quiz("html").await.unwrap();
    assert_eq!(quiz, sample_quiz("html"));
    assert_eq!(fixture.store.set_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.accessor.stats().snapshot().write_failures, 1);
    assert!(!fixture.store.inner.contains("html").await);
}

#[tokio::test]
async fn test_unreadable_entry_is_regenerated() {
    let fixture = Fixture::new();
    fixture
        .store
        .inner
        .set("html", "{not json".to_string(), 60)
        .await
        .unwrap();

    let quiz = fixture.accessor.quiz("html").await.unwrap();
    assert_eq!(quiz, sample_quiz("html"));
    assert_eq!(fixture.generator.quiz_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.accessor.stats().snapshot().corrupt_entries, 1);

    let raw = fixture.store.inner.get("html").await.unwrap().unwrap();
    let cached: Quiz = serde_json::from_str(&raw).unwrap();
    assert_eq!(cached, quiz);
}

#[tokio::test]
async fn test_namespaced_scheme_separates_kinds() {
    let policy = CachePolicy {
        key_scheme: KeyScheme::Namespaced,
        ..CachePolicy::default()
    };
    let fixture = Fixture::with(StubGenerator::new(), policy);

    fixture.accessor.roadmap("html", 0).await.unwrap();
    fixture.accessor.explanation("html", "0").await.unwrap();
    fixture.accessor.quiz("html").await.unwrap();

    assert!(fixture.store.inner.contains("roadmap:html-0").await);
    assert!(fixture.store.inner.contains("explanation:html-0").await);
    assert!(fixture.store.inner.contains("quiz:html").await);
    assert!(!fixture.store.inner.contains("html").await);
}

#[tokio::test]
async fn test_closed_limiter_rejects_generation() {
    let fixture = Fixture::new();
    fixture.accessor.limiter().close();

    let err = fixture.accessor.quiz("html").await.unwrap_err();
    assert!(matches!(err, CacheError::ShuttingDown));
    assert_eq!(fixture.generator.total_calls(), 0);
}
