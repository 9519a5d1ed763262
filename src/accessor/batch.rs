//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 批量讲解的旁路缓存：一次批量读取，只为未命中的标题生成，一次批量回写。

use super::CacheAside;
use crate::error::{CacheError, Result};
use crate::generation::TopicExplanation;
use crate::keys::RequestKind;
use crate::serialization::Serializer;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument, warn};

/// 批量结果中的单项
///
/// 单个标题生成失败只影响自己这一项
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BatchEntry {
    Explanation(TopicExplanation),
    Failed { error: String },
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        matches!(self, BatchEntry::Explanation(_))
    }

    pub fn explanation(&self) -> Option<&TopicExplanation> {
        match self {
            BatchEntry::Explanation(explanation) => Some(explanation),
            BatchEntry::Failed { .. } => None,
        }
    }
}

impl CacheAside {
    /// 批量获取知识点讲解
    ///
    /// 标题去除两端空白后去重排序，每个不同的标题恰好对应结果中的一项。
    /// 上游调用次数等于未命中的不同标题数（不计重试），同时在途的调用受并发限制器约束
    #[instrument(skip(self, step_titles), level = "debug", fields(title_count = step_titles.len()))]
    pub async fn batch_explanations<S: AsRef<str>>(
        &self,
        topic: &str,
        step_titles: &[S],
    ) -> Result<BTreeMap<String, BatchEntry>> {
        let titles: BTreeSet<&str> = step_titles
            .iter()
            .map(|title| title.as_ref().trim())
            .filter(|title| !title.is_empty())
            .collect();

        let mut results = BTreeMap::new();
        if titles.is_empty() {
            return Ok(results);
        }

        let scheme = self.policy.key_scheme;
        let keys: Vec<String> = titles
            .iter()
            .map(|title| scheme.explanation_key(topic, title))
            .collect();

        let cached = self.store.multi_get(&keys).await?;
        if cached.len() != keys.len() {
            return Err(CacheError::StoreUnavailable(format!(
                "multi_get returned {} values for {} keys",
                cached.len(),
                keys.len()
            )));
        }

        let mut misses: Vec<(&str, String)> = Vec::new();
        for ((title, key), raw) in titles.iter().copied().zip(keys).zip(cached) {
            let Some(raw) = raw else {
                misses.push((title, key));
                continue;
            };
            match self.serializer.deserialize::<TopicExplanation>(&raw) {
                Ok(explanation) => {
                    results.insert(title.to_string(), BatchEntry::Explanation(explanation));
                }
                Err(e) => {
                    self.stats.record_corrupt_entry();
                    warn!(key = %key, error = %e, "cached value is unreadable, regenerating");
                    misses.push((title, key));
                }
            }
        }

        self.stats.record_hits(results.len() as u64);
        self.stats.record_misses(misses.len() as u64);
        info!(
            topic,
            hits = results.len(),
            misses = misses.len(),
            "batch explanation lookup"
        );

        if misses.is_empty() {
            return Ok(results);
        }

        let generated = join_all(
            misses
                .iter()
                .map(move |(title, _)| self.generate_explanation(topic, title)),
        )
        .await;

        let mut writes = Vec::with_capacity(misses.len());
        for ((title, key), outcome) in misses.into_iter().zip(generated) {
            match outcome {
                Ok(explanation) => {
                    match self.serializer.serialize(&explanation) {
                        Ok(raw) => writes.push((key, raw)),
                        Err(e) => {
                            self.stats.record_write_failure();
                            warn!(key = %key, error = %e, "failed to serialize generated value");
                        }
                    }
                    results.insert(title.to_string(), BatchEntry::Explanation(explanation));
                }
                Err(e) => {
                    warn!(topic, step_title = title, error = %e, "batch item failed");
                    results.insert(
                        title.to_string(),
                        BatchEntry::Failed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        }

        if !writes.is_empty() {
            let written = writes.len();
            let ttl = self.policy.ttl.ttl_for(RequestKind::Explanation);
            match self.store.multi_set(writes, ttl).await {
                Ok(()) => info!(topic, written, ttl_secs = ttl, "cached batch explanations"),
                Err(e) => {
                    self.stats.record_write_failure();
                    warn!(topic, error = %e, "batch cache write failed, returning uncached values");
                }
            }
        }

        Ok(results)
    }
}
