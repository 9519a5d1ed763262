//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存管理器，负责在启动时建立存储连接、组装访问器，并在关闭时释放资源。

use crate::accessor::{CacheAside, CachePolicy};
use crate::admin::CacheAdmin;
use crate::backend::{self, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::generation::Generator;
use crate::limiter::ConcurrencyLimiter;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 缓存管理器
///
/// 显式构造并注入到HTTP层，进程内不存在全局单例
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    accessor: Arc<CacheAside>,
    admin: CacheAdmin,
    limiter: ConcurrencyLimiter,
}

impl CacheManager {
    /// 根据配置连接存储并组装访问器
    ///
    /// 存储在启动时 ping 一次，连接失败直接返回错误
    #[instrument(skip(config, generator), level = "info", fields(backend = ?config.store.backend))]
    pub async fn connect(config: &Config, generator: Arc<dyn Generator>) -> Result<Self> {
        config.validate().map_err(CacheError::Configuration)?;

        let store = backend::connect(&config.store).await?;
        store.ping().await?;

        let limiter = ConcurrencyLimiter::new(config.cache.max_concurrent_generations);
        let manager = Self::from_parts(store, generator, limiter, CachePolicy::from(&config.cache));
        info!(
            store = manager.store.name(),
            max_concurrent_generations = manager.limiter.max(),
            "CacheManager initialized"
        );
        Ok(manager)
    }

    /// 由已构造好的组件组装
    pub fn from_parts(
        store: Arc<dyn CacheStore>,
        generator: Arc<dyn Generator>,
        limiter: ConcurrencyLimiter,
        policy: CachePolicy,
    ) -> Self {
        let accessor = Arc::new(CacheAside::new(
            store.clone(),
            generator,
            limiter.clone(),
            policy,
        ));
        let admin = CacheAdmin::new(store.clone());
        Self {
            store,
            accessor,
            admin,
            limiter,
        }
    }

    pub fn accessor(&self) -> Arc<CacheAside> {
        self.accessor.clone()
    }

    pub fn admin(&self) -> CacheAdmin {
        self.admin.clone()
    }

    pub fn store(&self) -> Arc<dyn CacheStore> {
        self.store.clone()
    }

    /// 优雅关闭
    ///
    /// 关闭并发限制器，拒绝新的生成任务，然后释放存储连接
    #[instrument(skip(self), level = "info")]
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down cache manager...");
        self.limiter.close();
        if let Err(e) = self.store.shutdown().await {
            warn!(error = %e, "Failed to release cache store");
            return Err(e);
        }
        info!("Cache manager shut down");
        Ok(())
    }
}
