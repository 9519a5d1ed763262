//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了日志初始化。

use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 过滤级别取自 `RUST_LOG`，未设置时使用 `default_filter`。
/// 重复调用是安全的，已经存在的全局 subscriber 会被保留。
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .ok();
}
