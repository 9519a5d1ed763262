//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License

use crate::admin::CacheAdmin;
use crate::backend;
use crate::cli::ClearArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use std::io::Write;

pub async fn execute(config: &Config, args: &ClearArgs) -> Result<()> {
    if !args.yes {
        println!("This removes EVERY key in the configured cache store, not only generated content.");
        print!("Do you want to continue? [y/N]: ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if input.trim().to_lowercase() != "y" {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let store = backend::connect(&config.store)
        .await
        .context("failed to connect cache store")?;
    let admin = CacheAdmin::new(store.clone());
    admin.clear_all().await.context("failed to clear cache")?;
    store.shutdown().await?;

    println!("✅ Cache cleared.");
    Ok(())
}
