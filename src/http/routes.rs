//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 路由定义

use super::{handlers, AppState};
use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// 创建路由
///
/// `request_timeout` 作用于整个请求，核心层不再单独设置超时
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/generate_quiz", get(handlers::generate_quiz))
        .route("/api/generate_roadmap", get(handlers::generate_roadmap))
        .route(
            "/api/generate_topic_explanation",
            get(handlers::generate_topic_explanation),
        )
        .route(
            "/api/generate_batch_explanations",
            get(handlers::generate_batch_explanations),
        )
        .route("/api/clear_cache", get(handlers::clear_cache))
        .route("/api/cache_stats", get(handlers::cache_stats))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
