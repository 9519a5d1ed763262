//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了旁路缓存访问器：先查缓存，未命中时调用生成协作者并回写。
//!
//! 访问器本身不保存跨请求状态，只持有注入的存储、生成器、并发限制器和统计。

pub mod batch;
pub mod single;

use crate::backend::CacheStore;
use crate::config::CachePolicyConfig;
use crate::error::Result;
use crate::generation::{GenerationResult, Generator};
use crate::keys::{KeyScheme, TtlPolicy};
use crate::limiter::ConcurrencyLimiter;
use crate::metrics::CacheStats;
use crate::serialization::{JsonSerializer, Serializer};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

pub use batch::BatchEntry;

/// 讲解生成的默认最大尝试次数
pub const DEFAULT_EXPLANATION_ATTEMPTS: u32 = 3;

/// 缓存策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: TtlPolicy,
    pub key_scheme: KeyScheme,
    /// 讲解生成的最大尝试次数；测验和路线图不重试
    pub explanation_attempts: u32,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: TtlPolicy::default(),
            key_scheme: KeyScheme::Legacy,
            explanation_attempts: DEFAULT_EXPLANATION_ATTEMPTS,
        }
    }
}

impl From<&CachePolicyConfig> for CachePolicy {
    fn from(config: &CachePolicyConfig) -> Self {
        Self {
            ttl: config.ttl_policy(),
            key_scheme: config.key_scheme,
            explanation_attempts: config.explanation_attempts,
        }
    }
}

/// 旁路缓存访问器
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    generator: Arc<dyn Generator>,
    limiter: ConcurrencyLimiter,
    policy: CachePolicy,
    serializer: JsonSerializer,
    stats: Arc<CacheStats>,
}

impl CacheAside {
    /// 创建新的访问器
    ///
    /// # 参数
    ///
    /// * `store` - 缓存存储
    /// * `generator` - 生成协作者
    /// * `limiter` - 与其他访问器共享的并发限制器
    /// * `policy` - TTL、键方案和重试策略
    pub fn new(
        store: Arc<dyn CacheStore>,
        generator: Arc<dyn Generator>,
        limiter: ConcurrencyLimiter,
        policy: CachePolicy,
    ) -> Self {
        Self {
            store,
            generator,
            limiter,
            policy,
            serializer: JsonSerializer::new(),
            stats: Arc::new(CacheStats::new()),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    pub fn stats(&self) -> &Arc<CacheStats> {
        &self.stats
    }

    /// 调用一次生成协作者并记录统计
    async fn call_generator<T, Fut>(&self, generation: Fut) -> GenerationResult<T>
    where
        Fut: Future<Output = GenerationResult<T>>,
    {
        self.stats.record_generation();
        let outcome = generation.await;
        if outcome.is_err() {
            self.stats.record_generation_failure();
        }
        outcome
    }

    /// 回写生成结果
    ///
    /// 写失败只记录日志，不影响本次请求：生成的值本身仍然有效
    async fn write_back<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let raw = match self.serializer.serialize(value) {
            Ok(raw) => raw,
            Err(e) => {
                self.stats.record_write_failure();
                warn!(key = %key, error = %e, "failed to serialize generated value");
                return;
            }
        };
        match self.store.set(key, raw, ttl_secs).await {
            Ok(()) => debug!(key = %key, ttl_secs, "cached generated value"),
            Err(e) => {
                self.stats.record_write_failure();
                warn!(key = %key, error = %e, "cache write failed, returning uncached value");
            }
        }
    }

    /// 检查存储连接
    pub async fn ping_store(&self) -> Result<()> {
        self.store.ping().await
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }
}
