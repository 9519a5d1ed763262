//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了生成协作者的接口和强类型结果。
//!
//! 生成结果统一为 `Result<载荷, GenerationError>`，调用方无法把格式错误的载荷当作有效值。

pub mod gemini;
pub mod model;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

pub use gemini::GeminiModel;
pub use model::PromptGenerator;

/// 生成错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// 上游请求失败（网络错误或非成功状态码）
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// 模型输出无法解析为期望的结构
    #[error("model returned malformed output: {0}")]
    Malformed(String),

    /// 模型没有返回任何内容
    #[error("model returned no content")]
    Empty,
}

/// 生成结果类型别名
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;

/// 单道测验题
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// 测验
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

/// 路线图阶段下的子主题
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadmapSubtopic {
    pub subtopic: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 路线图中的一个阶段
///
/// 模型给出的额外字段原样保留
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadmapStage {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtopics: Vec<RoadmapSubtopic>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 路线图响应，形如 `{"roadmap": {"Week 1": {...}}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadmapDocument {
    pub roadmap: BTreeMap<String, RoadmapStage>,
}

/// 知识点讲解
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicExplanation {
    pub subtopic: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TopicExplanation {
    pub fn new(subtopic: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            subtopic: subtopic.into(),
            description: description.into(),
            extra: Map::new(),
        }
    }
}

/// 生成协作者
///
/// 每种请求对应一个方法；实现方不做缓存，也不做重试
#[async_trait]
pub trait Generator: Send + Sync {
    async fn quiz(&self, topic: &str) -> GenerationResult<Quiz>;

    async fn roadmap(&self, topic: &str, score: u32) -> GenerationResult<RoadmapDocument>;

    async fn explanation(&self, topic: &str, step_title: &str)
        -> GenerationResult<TopicExplanation>;
}

/// 文本模型：输入提示词，输出文本
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> GenerationResult<String>;
}
