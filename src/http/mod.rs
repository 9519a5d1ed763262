//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了HTTP接口。所有接口都返回 200，失败通过响应体中的 `error` 字段表示。

pub mod handlers;
pub mod routes;

use crate::accessor::CacheAside;
use crate::admin::CacheAdmin;
use crate::config::ServerConfig;
use crate::manager::CacheManager;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub use routes::create_router;

/// 处理器共享状态
#[derive(Clone)]
pub struct AppState {
    pub accessor: Arc<CacheAside>,
    pub admin: CacheAdmin,
}

impl From<&CacheManager> for AppState {
    fn from(manager: &CacheManager) -> Self {
        Self {
            accessor: manager.accessor(),
            admin: manager.admin(),
        }
    }
}

/// 启动HTTP服务，收到 Ctrl-C 后停止接收新连接并关闭缓存管理器
pub async fn serve(manager: CacheManager, config: &ServerConfig) -> Result<()> {
    let app = create_router(
        AppState::from(&manager),
        Duration::from_secs(config.request_timeout_secs),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    manager
        .shutdown()
        .await
        .context("failed to shut down cache manager")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler, running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
