//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存管理操作。

use crate::backend::CacheStore;
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 缓存管理
#[derive(Clone)]
pub struct CacheAdmin {
    store: Arc<dyn CacheStore>,
}

impl CacheAdmin {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// 清空全部缓存
    ///
    /// 幂等；存储不可达时返回 `StoreUnavailable`
    #[instrument(skip(self), level = "info", fields(store = self.store.name()))]
    pub async fn clear_all(&self) -> Result<()> {
        match self.store.flush_all().await {
            Ok(()) => {
                info!("Cache cleared");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to clear cache");
                Err(e)
            }
        }
    }
}
