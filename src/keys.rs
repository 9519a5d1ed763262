//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了生成请求模型、缓存键构造和TTL策略。
//!
//! 单项和批量两条路径都通过这里的函数构造键，避免键格式漂移。

use serde::Deserialize;

/// 测验结果的固定TTL（1天）
pub const QUIZ_TTL_SECS: u64 = 86_400;

/// 路线图和知识点讲解的默认TTL（30天）
pub const DEFAULT_CONTENT_TTL_SECS: u64 = 86_400 * 30;

/// 生成请求的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Quiz,
    Roadmap,
    Explanation,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Quiz => "quiz",
            RequestKind::Roadmap => "roadmap",
            RequestKind::Explanation => "explanation",
        }
    }
}

/// 生成请求
///
/// 每个请求通过 [`GenerationRequest::cache_key`] 映射到唯一的缓存键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenerationRequest {
    Quiz { topic: String },
    Roadmap { topic: String, score: u32 },
    Explanation { topic: String, step_title: String },
}

impl GenerationRequest {
    pub fn quiz(topic: impl Into<String>) -> Self {
        GenerationRequest::Quiz {
            topic: topic.into(),
        }
    }

    pub fn roadmap(topic: impl Into<String>, score: u32) -> Self {
        GenerationRequest::Roadmap {
            topic: topic.into(),
            score,
        }
    }

    pub fn explanation(topic: impl Into<String>, step_title: impl Into<String>) -> Self {
        GenerationRequest::Explanation {
            topic: topic.into(),
            step_title: step_title.into(),
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            GenerationRequest::Quiz { .. } => RequestKind::Quiz,
            GenerationRequest::Roadmap { .. } => RequestKind::Roadmap,
            GenerationRequest::Explanation { .. } => RequestKind::Explanation,
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            GenerationRequest::Quiz { topic }
            | GenerationRequest::Roadmap { topic, .. }
            | GenerationRequest::Explanation { topic, .. } => topic,
        }
    }

    /// 计算该请求在给定键方案下的缓存键
    pub fn cache_key(&self, scheme: KeyScheme) -> String {
        match self {
            GenerationRequest::Quiz { topic } => scheme.quiz_key(topic),
            GenerationRequest::Roadmap { topic, score } => scheme.roadmap_key(topic, *score),
            GenerationRequest::Explanation { topic, step_title } => {
                scheme.explanation_key(topic, step_title)
            }
        }
    }
}

/// 缓存键方案
///
/// `Legacy` 与已有缓存数据逐字节兼容；`Namespaced` 为每种请求加上前缀，
/// 使不同种类的请求不会共享同一个键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    #[default]
    Legacy,
    Namespaced,
}

impl KeyScheme {
    pub fn quiz_key(&self, topic: &str) -> String {
        match self {
            KeyScheme::Legacy => topic.to_string(),
            KeyScheme::Namespaced => format!("quiz:{}", topic),
        }
    }

    pub fn roadmap_key(&self, topic: &str, score: u32) -> String {
        match self {
            KeyScheme::Legacy => format!("{}-{}", topic, score),
            KeyScheme::Namespaced => format!("roadmap:{}-{}", topic, score),
        }
    }

    pub fn explanation_key(&self, topic: &str, step_title: &str) -> String {
        match self {
            KeyScheme::Legacy => format!("{}-{}", topic, step_title),
            KeyScheme::Namespaced => format!("explanation:{}-{}", topic, step_title),
        }
    }
}

/// TTL策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// 测验TTL（秒）
    pub quiz_ttl_secs: u64,
    /// 路线图与讲解TTL（秒）
    pub content_ttl_secs: u64,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            quiz_ttl_secs: QUIZ_TTL_SECS,
            content_ttl_secs: DEFAULT_CONTENT_TTL_SECS,
        }
    }
}

impl TtlPolicy {
    pub fn ttl_for(&self, kind: RequestKind) -> u64 {
        match kind {
            RequestKind::Quiz => self.quiz_ttl_secs,
            RequestKind::Roadmap | RequestKind::Explanation => self.content_ttl_secs,
        }
    }
}

/// 解析成绩参数
///
/// 缺省为0；前后空白和前导零会被规范化，非数字返回 `None`
pub fn parse_score(raw: Option<&str>) -> Option<u32> {
    match raw.map(str::trim) {
        None | Some("") => Some(0),
        Some(value) => value.parse::<u32>().ok(),
    }
}

/// 拆分逗号分隔的步骤标题，去除两端空白并丢弃空项
pub fn split_step_titles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}
