//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 单项旁路缓存：测验、路线图和单个知识点讲解。

use super::CacheAside;
use crate::error::{CacheError, Result};
use crate::generation::{GenerationError, Quiz, RoadmapDocument, TopicExplanation};
use crate::keys::GenerationRequest;
use crate::serialization::Serializer;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use tracing::{debug, instrument, warn};

impl CacheAside {
    /// 获取测验
    ///
    /// 生成失败立即返回，不重试
    #[instrument(skip(self), level = "debug")]
    pub async fn quiz(&self, topic: &str) -> Result<Quiz> {
        let request = GenerationRequest::quiz(topic);
        self.resolve(&request, move || async move {
            let generation = self.call_generator(self.generator.quiz(topic));
            Ok::<_, CacheError>(self.limiter.schedule(generation).await??)
        })
        .await
    }

    /// 获取路线图
    ///
    /// 生成失败立即返回，不重试
    #[instrument(skip(self), level = "debug")]
    pub async fn roadmap(&self, topic: &str, score: u32) -> Result<RoadmapDocument> {
        let request = GenerationRequest::roadmap(topic, score);
        self.resolve(&request, move || async move {
            let generation = self.call_generator(self.generator.roadmap(topic, score));
            Ok::<_, CacheError>(self.limiter.schedule(generation).await??)
        })
        .await
    }

    /// 获取单个知识点讲解
    #[instrument(skip(self), level = "debug")]
    pub async fn explanation(&self, topic: &str, step_title: &str) -> Result<TopicExplanation> {
        let request = GenerationRequest::explanation(topic, step_title);
        self.resolve(&request, move || self.generate_explanation(topic, step_title))
            .await
    }

    /// 生成知识点讲解，失败时最多尝试 `explanation_attempts` 次
    ///
    /// 每次尝试单独占用一个并发许可
    pub(crate) async fn generate_explanation(
        &self,
        topic: &str,
        step_title: &str,
    ) -> Result<TopicExplanation> {
        let attempts = self.policy.explanation_attempts.max(1);
        let mut last_error = GenerationError::Empty;
        for attempt in 1..=attempts {
            let generation = self.call_generator(self.generator.explanation(topic, step_title));
            match self.limiter.schedule(generation).await? {
                Ok(explanation) => return Ok(explanation),
                Err(e) => {
                    warn!(
                        topic,
                        step_title,
                        attempt,
                        attempts,
                        error = %e,
                        "explanation generation failed"
                    );
                    last_error = e;
                }
            }
        }
        Err(CacheError::GenerationFailed(last_error))
    }

    /// 旁路缓存的核心流程
    ///
    /// 命中时直接返回；未命中时生成、回写（带该种类的TTL）后返回；
    /// 生成失败不写缓存；读缓存失败直接返回错误
    async fn resolve<T, F, Fut>(&self, request: &GenerationRequest, generate: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = request.cache_key(self.policy.key_scheme);

        if let Some(raw) = self.store.get(&key).await? {
            match self.serializer.deserialize::<T>(&raw) {
                Ok(value) => {
                    self.stats.record_hits(1);
                    debug!(key = %key, kind = request.kind().as_str(), "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    self.stats.record_corrupt_entry();
                    warn!(key = %key, error = %e, "cached value is unreadable, regenerating");
                }
            }
        }

        self.stats.record_misses(1);
        debug!(key = %key, kind = request.kind().as_str(), "cache miss");

        let value = generate().await?;
        let ttl = self.policy.ttl.ttl_for(request.kind());
        self.write_back(&key, &value, ttl).await;
        Ok(value)
    }
}
