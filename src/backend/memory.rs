//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了基于内存的缓存存储，用于本地开发和测试。

use super::CacheStore;
use crate::error::Result;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// 默认最大条目数
const DEFAULT_CAPACITY: u64 = 10_000;

#[derive(Clone)]
struct MemoryEntry {
    value: String,
    ttl_secs: u64,
    expires_at: Option<Instant>,
}

/// 内存缓存存储
///
/// 使用Moka作为底层缓存库；过期在读取时判断
#[derive(Clone)]
pub struct MemoryStore {
    cache: Cache<String, MemoryEntry>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MemoryStore")
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// 创建新的内存存储
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 创建指定最大条目数的内存存储
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    async fn live_entry(&self, key: &str) -> Option<MemoryEntry> {
        let entry = self.cache.get(key).await?;
        if entry.expires_at.is_some_and(|at| Instant::now() >= at) {
            self.cache.remove(key).await;
            debug!("Memory store: key={} expired, removed", key);
            return None;
        }
        Some(entry)
    }

    async fn insert(&self, key: String, value: String, ttl_secs: u64) {
        let entry = MemoryEntry {
            value,
            ttl_secs,
            // 超出 Instant 表示范围的TTL视为永不过期
            expires_at: Instant::now().checked_add(Duration::from_secs(ttl_secs)),
        };
        self.cache.insert(key, entry).await;
    }

    /// 获取写入某个键时使用的TTL（秒）
    ///
    /// 键不存在或已过期时返回 `None`
    pub async fn ttl_of(&self, key: &str) -> Option<u64> {
        self.live_entry(key).await.map(|entry| entry.ttl_secs)
    }

    /// 某个键当前是否存在
    pub async fn contains(&self, key: &str) -> bool {
        self.live_entry(key).await.is_some()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.live_entry(key).await.map(|entry| entry.value))
    }

    #[instrument(skip(self, value), level = "debug", fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<()> {
        self.insert(key.to_string(), value, ttl_secs).await;
        Ok(())
    }

    #[instrument(skip(self, keys), level = "debug", fields(key_count = keys.len()))]
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.live_entry(key).await.map(|entry| entry.value));
        }
        Ok(values)
    }

    #[instrument(skip(self, items), level = "debug", fields(item_count = items.len()))]
    async fn multi_set(&self, items: Vec<(String, String)>, ttl_secs: u64) -> Result<()> {
        for (key, value) in items {
            self.insert(key, value, ttl_secs).await;
        }
        Ok(())
    }

    async fn flush_all(&self) -> Result<()> {
        self.cache.invalidate_all();
        debug!("Memory store flushed");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
