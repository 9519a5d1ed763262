//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存生成层的错误类型和处理机制。

use crate::generation::GenerationError;
use thiserror::Error;

/// 缓存生成层错误类型枚举
///
/// 读操作失败会向上传递；写操作失败由调用方记录日志后忽略
#[derive(Error, Debug)]
pub enum CacheError {
    /// 缓存存储不可达
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    /// 生成失败（模型返回错误或格式错误的结果），永远不会被缓存
    #[error("Generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    /// 请求参数缺失或非法
    #[error("{0}")]
    Validation(String),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 服务正在关闭，拒绝新的生成任务
    #[error("Service is shutting down")]
    ShuttingDown,
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::StoreUnavailable(err.to_string())
    }
}

impl CacheError {
    /// 是否为存储不可达错误
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, CacheError::StoreUnavailable(_))
    }
}

/// 缓存操作结果类型别名
pub type Result<T> = std::result::Result<T, CacheError>;
