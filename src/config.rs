//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了服务的配置结构、加载逻辑和环境变量覆盖。

use crate::error::{CacheError, Result};
use crate::keys::{KeyScheme, TtlPolicy, DEFAULT_CONTENT_TTL_SECS, QUIZ_TTL_SECS};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;

/// Redis 连接地址
pub const ENV_REDIS_URL: &str = "REDIS_URL";
/// 路线图/讲解TTL覆盖（秒）
pub const ENV_CACHE_TTL: &str = "CACHE_TTL_SECONDS";
/// 模型 API Key
pub const ENV_MODEL_API_KEY: &str = "GEMINI_API_KEY";
/// HTTP 监听地址
pub const ENV_BIND_ADDR: &str = "PATHWISE_BIND";

/// 服务配置
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub cache: CachePolicyConfig,
    pub model: ModelConfig,
}

/// HTTP 服务配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_addr: String,
    /// 整个请求的超时时间（秒）
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// 缓存存储后端类型
#[derive(Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Redis（生产环境）
    #[default]
    Redis,
    /// 进程内存（本地开发）
    Memory,
}

/// 缓存存储配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StoreConfig {
    /// 存储后端
    pub backend: StoreBackend,
    /// 连接字符串
    pub connection_string: SecretString,
    /// 连接超时时间（毫秒）
    pub connection_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redis,
            connection_string: SecretString::new("redis://127.0.0.1:6379".to_string().into()),
            connection_timeout_ms: 5000,
        }
    }
}

/// 缓存策略配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CachePolicyConfig {
    /// 测验TTL（秒）
    pub quiz_ttl_secs: u64,
    /// 路线图与讲解TTL（秒）
    pub content_ttl_secs: u64,
    /// 缓存键方案
    pub key_scheme: KeyScheme,
    /// 同时在途的生成调用上限
    pub max_concurrent_generations: usize,
    /// 讲解生成的最大尝试次数
    pub explanation_attempts: u32,
}

impl Default for CachePolicyConfig {
    fn default() -> Self {
        Self {
            quiz_ttl_secs: QUIZ_TTL_SECS,
            content_ttl_secs: DEFAULT_CONTENT_TTL_SECS,
            key_scheme: KeyScheme::Legacy,
            max_concurrent_generations: 3,
            explanation_attempts: 3,
        }
    }
}

impl CachePolicyConfig {
    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy {
            quiz_ttl_secs: self.quiz_ttl_secs,
            content_ttl_secs: self.content_ttl_secs,
        }
    }
}

/// 文本模型配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ModelConfig {
    /// API 基础地址
    pub base_url: String,
    /// 模型名称
    pub model: String,
    /// API Key（可选，使用 SecretString 保护）
    pub api_key: Option<SecretString>,
    /// 请求超时时间（毫秒）
    pub timeout_ms: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            timeout_ms: 60_000,
        }
    }
}

impl Config {
    /// 加载配置
    ///
    /// 先读取 TOML 文件（未指定时使用默认值），再应用进程环境变量覆盖，最后校验
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config
            .validate()
            .map_err(CacheError::Configuration)?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CacheError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            CacheError::Configuration(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// 应用环境变量覆盖
    ///
    /// `lookup` 按变量名返回值，便于测试时注入
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_REDIS_URL).filter(|v| !v.trim().is_empty()) {
            self.store.connection_string = SecretString::new(url.trim().to_string().into());
        }

        if let Some(ttl) = lookup(ENV_CACHE_TTL).filter(|v| !v.trim().is_empty()) {
            self.cache.content_ttl_secs = ttl.trim().parse().map_err(|_| {
                CacheError::Configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_CACHE_TTL, ttl
                ))
            })?;
        }

        if let Some(key) = lookup(ENV_MODEL_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.model.api_key = Some(SecretString::new(key.trim().to_string().into()));
        }

        if let Some(addr) = lookup(ENV_BIND_ADDR).filter(|v| !v.trim().is_empty()) {
            self.server.bind_addr = addr.trim().to_string();
        }

        Ok(())
    }

    /// 验证配置
    ///
    /// 检查配置的有效性，确保所有必需的字段都已设置，并且值在合理范围内
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.server.bind_addr.trim().is_empty() {
            return Err("server.bind_addr cannot be empty".to_string());
        }

        if self.server.request_timeout_secs == 0 {
            return Err("server.request_timeout_secs cannot be zero".to_string());
        }

        if self.store.backend == StoreBackend::Redis {
            let conn = self.store.connection_string.expose_secret();
            if !(conn.starts_with("redis://") || conn.starts_with("rediss://")) {
                return Err(
                    "store.connection_string must start with redis:// or rediss://".to_string(),
                );
            }
            if self.store.connection_timeout_ms == 0 {
                return Err("store.connection_timeout_ms cannot be zero".to_string());
            }
        }

        if self.cache.quiz_ttl_secs == 0 {
            return Err("cache.quiz_ttl_secs cannot be zero".to_string());
        }

        if self.cache.content_ttl_secs == 0 {
            return Err("cache.content_ttl_secs cannot be zero".to_string());
        }

        if self.cache.max_concurrent_generations == 0 {
            return Err("cache.max_concurrent_generations cannot be zero".to_string());
        }

        if self.cache.explanation_attempts == 0 {
            return Err("cache.explanation_attempts cannot be zero".to_string());
        }

        if self.model.model.trim().is_empty() {
            return Err("model.model cannot be empty".to_string());
        }

        if self.model.timeout_ms == 0 {
            return Err("model.timeout_ms cannot be zero".to_string());
        }

        Ok(())
    }
}
