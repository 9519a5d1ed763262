//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存值的序列化机制。缓存中的值一律以JSON字符串存储。

pub mod json;

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};

pub use json::JsonSerializer;

/// 序列化器特征
///
/// 定义缓存值与存储字符串之间的转换接口
pub trait Serializer: Send + Sync {
    /// 序列化值为存储字符串
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String>;

    /// 从存储字符串反序列化值
    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T>;
}
