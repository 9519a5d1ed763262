//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了Redis连接提供者接口和默认实现。

use crate::{
    config::StoreConfig,
    error::{CacheError, Result},
    utils::redaction::redact_connection_string,
};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use secrecy::ExposeSecret;
use tokio::time::{timeout, Duration};

/// Redis连接提供者
///
/// 测试可以替换实现，以模拟无法建立连接的情况
#[async_trait]
pub trait RedisProvider: Send + Sync {
    async fn get_connection_manager(&self, config: &StoreConfig) -> Result<ConnectionManager>;
}

pub struct DefaultRedisProvider;

#[async_trait]
impl RedisProvider for DefaultRedisProvider {
    async fn get_connection_manager(&self, config: &StoreConfig) -> Result<ConnectionManager> {
        let connection_string = config.connection_string.expose_secret();
        let client = Client::open(connection_string).map_err(|e| {
            CacheError::Configuration(format!(
                "Invalid Redis connection string {}: {}",
                redact_connection_string(connection_string),
                e
            ))
        })?;

        match timeout(
            Duration::from_millis(config.connection_timeout_ms),
            client.get_connection_manager(),
        )
        .await
        {
            Ok(res) => Ok(res?),
            Err(_) => Err(CacheError::StoreUnavailable(format!(
                "Connection timed out after {}ms. Target: {}",
                config.connection_timeout_ms,
                redact_connection_string(connection_string)
            ))),
        }
    }
}
