//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了基于Redis的缓存存储。

use super::CacheStore;
use crate::backend::redis_provider::{DefaultRedisProvider, RedisProvider};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::utils::redaction::redact_connection_string;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Redis缓存存储
///
/// 持有一个自动重连的连接管理器，克隆开销很小
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    target: String,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RedisStore({})", self.target)
    }
}

impl RedisStore {
    /// 连接Redis
    ///
    /// # 参数
    ///
    /// * `config` - 存储配置
    ///
    /// # 返回值
    ///
    /// 返回新的RedisStore实例或错误
    #[instrument(skip(config), level = "info", name = "init_redis_store")]
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        Self::connect_with_provider(config, Arc::new(DefaultRedisProvider)).await
    }

    /// 使用指定的Redis提供者连接
    #[instrument(skip(config, provider), level = "info")]
    pub async fn connect_with_provider(
        config: &StoreConfig,
        provider: Arc<dyn RedisProvider>,
    ) -> Result<Self> {
        let target = redact_connection_string(config.connection_string.expose_secret());
        debug!("Connecting to Redis at {}", target);
        let manager = provider.get_connection_manager(config).await?;
        info!("Redis store connected: {}", target);
        Ok(Self { manager, target })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    #[instrument(skip(self, value), level = "debug", fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<()> {
        debug!("Setting key: {} with ttl: {}s", key, ttl_secs);
        let mut conn = self.manager.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, keys), level = "debug", fields(key_count = keys.len()))]
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut cmd = redis::cmd("MGET");
        for key in keys {
            cmd.arg(key);
        }
        let mut conn = self.manager.clone();
        let values: Vec<Option<String>> = cmd.query_async(&mut conn).await?;
        Ok(values)
    }

    #[instrument(skip(self, items), level = "debug", fields(item_count = items.len()))]
    async fn multi_set(&self, items: Vec<(String, String)>, ttl_secs: u64) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        debug!("Pipeline batch set with {} items", items.len());
        let mut pipe = redis::pipe();
        for (key, value) in items {
            pipe.set(&key, value).arg("EX").arg(ttl_secs).ignore();
        }
        let mut conn = self.manager.clone();
        pipe.query_async::<()>(&mut conn).await?;
        Ok(())
    }

    #[instrument(skip(self), level = "info")]
    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("FLUSHALL").query_async::<()>(&mut conn).await?;
        info!("Redis store flushed: {}", self.target);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn ping(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        let response: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!("Redis ping response: {}", response);
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        // 连接管理器在最后一个克隆被丢弃时关闭
        info!("Releasing Redis store: {}", self.target);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
