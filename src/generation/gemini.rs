//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了基于 Gemini `generateContent` 接口的文本模型。

use super::{GenerationError, GenerationResult, TextModel};
use crate::config::ModelConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// 错误响应体在日志和错误信息中保留的最大长度
const MAX_ERROR_BODY: usize = 256;

/// Gemini 文本模型
pub struct GeminiModel {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
}

impl std::fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiModel")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiModel {
    /// 根据模型配置创建客户端
    pub fn new(config: &ModelConfig) -> GenerationResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        if config.api_key.is_none() {
            warn!("No model API key configured; upstream calls will likely be rejected");
        }
        info!(base_url = %config.base_url, model = %config.model, "Initialized Gemini text model");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextModel for GeminiModel {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> GenerationResult<String> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(MAX_ERROR_BODY).collect();
            warn!(%status, "Gemini request rejected");
            return Err(GenerationError::Upstream(format!(
                "status {}: {}",
                status, snippet
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        debug!(output_len = text.len(), "Gemini completion received");
        Ok(text)
    }
}
