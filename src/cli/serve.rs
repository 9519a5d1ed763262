//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License

use crate::config::Config;
use crate::generation::{GeminiModel, Generator, PromptGenerator};
use crate::manager::CacheManager;
use anyhow::{Context, Result};
use std::sync::Arc;

pub async fn execute(config: Config) -> Result<()> {
    let model = GeminiModel::new(&config.model).context("failed to build model client")?;
    let generator: Arc<dyn Generator> = Arc::new(PromptGenerator::new(model));

    let manager = CacheManager::connect(&config, generator)
        .await
        .context("failed to connect cache store")?;

    crate::http::serve(manager, &config.server).await
}
