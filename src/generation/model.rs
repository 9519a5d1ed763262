//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块把文本模型包装为强类型的生成协作者：构造提示词、提取并解析模型输出的JSON。

use super::{
    GenerationError, GenerationResult, Generator, Quiz, RoadmapDocument, TextModel,
    TopicExplanation,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// 基于提示词的生成器
pub struct PromptGenerator<M> {
    model: M,
}

impl<M: TextModel> PromptGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    async fn complete_json<T: DeserializeOwned>(&self, prompt: &str) -> GenerationResult<T> {
        let text = self.model.complete(prompt).await?;
        debug!(output_len = text.len(), "model completion received");
        parse_model_json(&text)
    }
}

fn quiz_prompt(topic: &str) -> String {
    format!(
        "Generate a quiz of 10 multiple choice questions that assesses knowledge of {topic}. \
         Respond with JSON only, shaped as \
         {{\"questions\": [{{\"question\": \"...\", \"options\": [\"A. ...\", \"B. ...\", \"C. ...\", \"D. ...\"], \"answer\": \"A. ...\"}}]}}."
    )
}

fn roadmap_prompt(topic: &str, score: u32) -> String {
    format!(
        "A learner scored {score} out of 100 on a {topic} assessment. \
         Create a week by week learning roadmap for {topic} suited to that level. \
         Respond with JSON only, shaped as \
         {{\"roadmap\": {{\"Week 1\": {{\"topic\": \"...\", \"subtopics\": [{{\"subtopic\": \"...\", \"time\": \"...\"}}]}}}}}}."
    )
}

fn explanation_prompt(topic: &str, step_title: &str) -> String {
    format!(
        "In the context of learning {topic}, explain \"{step_title}\" to a beginner. \
         Respond with JSON only, shaped as \
         {{\"subtopic\": \"{step_title}\", \"description\": \"...\"}}."
    )
}

/// 从模型输出中截取第一个 `{` 到最后一个 `}` 之间的内容
///
/// 模型经常在JSON外包裹 ```json 代码块或说明文字
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// 把模型输出解析为指定类型
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> GenerationResult<T> {
    if text.trim().is_empty() {
        return Err(GenerationError::Empty);
    }
    let json = extract_json(text)
        .ok_or_else(|| GenerationError::Malformed("no JSON object in output".to_string()))?;
    serde_json::from_str(json).map_err(|e| GenerationError::Malformed(e.to_string()))
}

#[async_trait]
impl<M: TextModel> Generator for PromptGenerator<M> {
    #[instrument(skip(self), level = "debug")]
    async fn quiz(&self, topic: &str) -> GenerationResult<Quiz> {
        let quiz: Quiz = self.complete_json(&quiz_prompt(topic)).await?;
        if quiz.questions.is_empty() {
            return Err(GenerationError::Malformed(
                "quiz contains no questions".to_string(),
            ));
        }
        Ok(quiz)
    }

    #[instrument(skip(self), level = "debug")]
    async fn roadmap(&self, topic: &str, score: u32) -> GenerationResult<RoadmapDocument> {
        let roadmap: RoadmapDocument = self.complete_json(&roadmap_prompt(topic, score)).await?;
        if roadmap.roadmap.is_empty() {
            return Err(GenerationError::Malformed(
                "roadmap contains no stages".to_string(),
            ));
        }
        Ok(roadmap)
    }

    #[instrument(skip(self), level = "debug")]
    async fn explanation(
        &self,
        topic: &str,
        step_title: &str,
    ) -> GenerationResult<TopicExplanation> {
        self.complete_json(&explanation_prompt(topic, step_title))
            .await
    }
}
