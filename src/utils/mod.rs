//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 通用工具函数。

pub mod redaction;
