//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! HTTP接口集成测试

#[path = "../common/mod.rs"]
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{Fixture, StubGenerator};
use pathwise::http::{create_router, AppState};
use pathwise::{CacheAdmin, CachePolicy};
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tower::ServiceExt;

fn router(fixture: &Fixture) -> Router {
    let state = AppState {
        accessor: fixture.accessor.clone(),
        admin: CacheAdmin::new(fixture.store.clone()),
    };
    create_router(state, Duration::from_secs(30))
}

async fn get_json(app: Router, uri: &str) -> Value {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "every endpoint answers 200");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_generate_quiz() {
    let fixture = Fixture::new();

    let body = get_json(router(&fixture), "/api/generate_quiz?topic=html").await;
    assert_eq!(body["questions"][0]["question"], "What is html?");

    get_json(router(&fixture), "/api/generate_quiz?topic=html").await;
    assert_eq!(fixture.generator.quiz_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_topic_is_reported_in_body() {
    let fixture = Fixture::new();

    let body = get_json(router(&fixture), "/api/generate_quiz").await;
    assert_eq!(body["error"], "topic is required");

    let body = get_json(router(&fixture), "/api/generate_quiz?topic=%20%20").await;
    assert_eq!(body["error"], "topic is required");

    assert_eq!(fixture.generator.total_calls(), 0);
    assert_eq!(fixture.store.get_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generate_roadmap_defaults_score_to_zero() {
    let fixture = Fixture::new();

    let body = get_json(router(&fixture), "/api/generate_roadmap?topic=html").await;
    assert!(body["roadmap"]["Week 1"]["topic"]
        .as_str()
        .unwrap()
        .contains("score 0"));
    assert!(fixture.store.inner.contains("html-0").await);

    let body = get_json(router(&fixture), "/api/generate_roadmap?topic=html&score=high").await;
    assert!(body["error"].as_str().unwrap().contains("score"));
}

#[tokio::test]
async fn test_generate_topic_explanation() {
    let fixture = Fixture::new();

    let body = get_json(
        router(&fixture),
        "/api/generate_topic_explanation?topic=html&stepTitle=Tags",
    )
    .await;
    assert_eq!(body["subtopic"], "Tags");
    assert!(fixture.store.inner.contains("html-Tags").await);

    let body = get_json(router(&fixture), "/api/generate_topic_explanation?topic=html").await;
    assert_eq!(body["error"], "stepTitle is required");
}

#[tokio::test]
async fn test_generate_batch_explanations() {
    let generator = StubGenerator::new();
    generator.fail_title("Forms", usize::MAX);
    let fixture = Fixture::with(generator, CachePolicy::default());

    let body = get_json(
        router(&fixture),
        "/api/generate_batch_explanations?topic=html&stepTitles=Tags,%20Forms,Tags",
    )
    .await;

    let map = body.as_object().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(body["Tags"]["subtopic"], "Tags");
    assert!(body["Forms"]["error"].is_string());

    let body = get_json(
        router(&fixture),
        "/api/generate_batch_explanations?topic=html&stepTitles=%20,%20",
    )
    .await;
    assert_eq!(body["error"], "stepTitles is required");
}

#[tokio::test]
async fn test_generation_failure_is_reported_in_body() {
    let fixture = Fixture::new();
    fixture.generator.set_failing(true);

    let body = get_json(router(&fixture), "/api/generate_quiz?topic=html").await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Generation failed"));
}

#[tokio::test]
async fn test_clear_cache() {
    let fixture = Fixture::new();
    fixture.accessor.quiz("html").await.unwrap();

    let body = get_json(router(&fixture), "/api/clear_cache").await;
    assert_eq!(body["message"], "Cache cleared successfully");
    assert!(!fixture.store.inner.contains("html").await);

    fixture.store.set_fail_writes(true);
    let body = get_json(router(&fixture), "/api/clear_cache").await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to clear cache"));
}

#[tokio::test]
async fn test_health_and_stats() {
    let fixture = Fixture::new();

    let body = get_json(router(&fixture), "/health").await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "instrumented");

    fixture.accessor.quiz("html").await.unwrap();
    let body = get_json(router(&fixture), "/api/cache_stats").await;
    assert_eq!(body["stats"]["misses"], 1);
    assert_eq!(body["max_concurrent_generations"], 3);

    fixture.store.set_fail_reads(true);
    let body = get_json(router(&fixture), "/health").await;
    assert_eq!(body["status"], "degraded");
}
