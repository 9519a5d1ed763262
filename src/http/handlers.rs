//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! HTTP处理器

use super::AppState;
use crate::error::{CacheError, Result};
use crate::keys::{parse_score, split_step_titles};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

type QueryResult<T> = std::result::Result<Query<T>, QueryRejection>;

#[derive(Debug, Deserialize)]
pub struct QuizParams {
    topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoadmapParams {
    topic: Option<String>,
    score: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationParams {
    topic: Option<String>,
    step_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchParams {
    topic: Option<String>,
    step_titles: Option<String>,
}

/// 把结果转换为响应体：成功时为载荷本身，失败时为 `{"error": ...}`
fn reply<T: Serialize>(result: Result<T>) -> Json<Value> {
    let value = result.and_then(|payload| {
        serde_json::to_value(payload).map_err(|e| CacheError::Serialization(e.to_string()))
    });
    match value {
        Ok(value) => Json(value),
        Err(e) => {
            if !matches!(e, CacheError::Validation(_)) {
                warn!(error = %e, "request failed");
            }
            Json(json!({ "error": e.to_string() }))
        }
    }
}

fn params<T>(query: QueryResult<T>) -> Result<T> {
    query
        .map(|Query(params)| params)
        .map_err(|e| CacheError::Validation(e.body_text()))
}

/// 必填参数：缺失或只含空白时返回校验错误，否则原样返回
fn required(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CacheError::Validation(format!("{} is required", name)))
}

pub async fn generate_quiz(
    State(state): State<AppState>,
    query: QueryResult<QuizParams>,
) -> Json<Value> {
    let result = async {
        let topic = required(params(query)?.topic, "topic")?;
        state.accessor.quiz(&topic).await
    }
    .await;
    reply(result)
}

pub async fn generate_roadmap(
    State(state): State<AppState>,
    query: QueryResult<RoadmapParams>,
) -> Json<Value> {
    let result = async {
        let params = params(query)?;
        let topic = required(params.topic, "topic")?;
        let score = parse_score(params.score.as_deref()).ok_or_else(|| {
            CacheError::Validation("score must be a non-negative integer".to_string())
        })?;
        state.accessor.roadmap(&topic, score).await
    }
    .await;
    reply(result)
}

pub async fn generate_topic_explanation(
    State(state): State<AppState>,
    query: QueryResult<ExplanationParams>,
) -> Json<Value> {
    let result = async {
        let params = params(query)?;
        let topic = required(params.topic, "topic")?;
        let step_title = required(params.step_title, "stepTitle")?;
        state.accessor.explanation(&topic, &step_title).await
    }
    .await;
    reply(result)
}

pub async fn generate_batch_explanations(
    State(state): State<AppState>,
    query: QueryResult<BatchParams>,
) -> Json<Value> {
    let result = async {
        let params = params(query)?;
        let topic = required(params.topic, "topic")?;
        let titles = split_step_titles(&required(params.step_titles, "stepTitles")?);
        if titles.is_empty() {
            return Err(CacheError::Validation("stepTitles is required".to_string()));
        }
        state.accessor.batch_explanations(&topic, &titles).await
    }
    .await;
    reply(result)
}

pub async fn clear_cache(State(state): State<AppState>) -> Json<Value> {
    match state.admin.clear_all().await {
        Ok(()) => Json(json!({ "message": "Cache cleared successfully" })),
        Err(e) => Json(json!({ "message": format!("Failed to clear cache: {}", e) })),
    }
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store = state.accessor.store_name();
    match state.accessor.ping_store().await {
        Ok(()) => Json(json!({ "status": "ok", "store": store })),
        Err(e) => Json(json!({ "status": "degraded", "store": store, "error": e.to_string() })),
    }
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<Value> {
    let limiter = state.accessor.limiter();
    Json(json!({
        "stats": state.accessor.stats().snapshot(),
        "in_flight_generations": limiter.in_flight(),
        "max_concurrent_generations": limiter.max(),
    }))
}
