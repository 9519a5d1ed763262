//! pathwise - 学习路径服务的缓存生成层
//!
//! 在 Redis 之上实现 cache-aside：测验、路线图和主题讲解先查缓存，
//! 未命中时调用文本模型生成并写回；批量讲解合并为一次读取和一次管道写入，
//! 所有模型调用共享一个并发上限。

#![doc(html_root_url = "https://docs.rs/pathwise/0.1.0")]

pub mod accessor;
pub mod admin;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod http;
pub mod keys;
pub mod limiter;
pub mod manager;
pub mod metrics;
pub mod serialization;
pub mod telemetry;
pub mod utils;

// Re-export commonly used items
pub use accessor::{BatchEntry, CacheAside, CachePolicy};
pub use admin::CacheAdmin;
pub use backend::CacheStore;
pub use config::Config;
pub use error::{CacheError, Result};
pub use generation::{GenerationError, Generator};
pub use keys::{GenerationRequest, KeyScheme, TtlPolicy};
pub use limiter::ConcurrencyLimiter;
pub use manager::CacheManager;

/// pathwise 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
