//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存存储接口及其Redis、内存实现。

pub mod memory;
pub mod redis_store;
pub mod redis_provider;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

/// 缓存存储特征
///
/// 键为字符串，值为序列化后的JSON字符串。
/// 读操作失败时返回 `StoreUnavailable`；单个键的读取要么完整返回，要么不返回
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 获取缓存值
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 设置缓存值，覆盖已有值
    ///
    /// # 参数
    ///
    /// * `key` - 缓存键
    /// * `value` - 序列化后的值
    /// * `ttl_secs` - 过期时间（秒）
    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<()>;

    /// 批量获取缓存值
    ///
    /// 返回结果与输入的键按位置一一对应
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>>;

    /// 批量设置缓存值，一次往返完成，每个键都带上相同的TTL
    async fn multi_set(&self, items: Vec<(String, String)>, ttl_secs: u64) -> Result<()>;

    /// 无条件清空存储
    async fn flush_all(&self) -> Result<()>;

    /// 检查连接是否正常
    async fn ping(&self) -> Result<()>;

    /// 释放连接
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    /// 存储名称，用于日志和健康检查
    fn name(&self) -> &'static str;
}

/// 根据配置创建缓存存储
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn CacheStore>> {
    match config.backend {
        StoreBackend::Redis => Ok(Arc::new(RedisStore::connect(config).await?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
