//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License

use crate::backend;
use crate::config::Config;
use crate::utils::redaction::redact_connection_string;
use anyhow::Result;
use secrecy::ExposeSecret;

pub async fn execute(config: &Config) -> Result<()> {
    println!("=== Cache Store Status ===\n");
    println!(
        "Store:   {:?} ({})",
        config.store.backend,
        redact_connection_string(config.store.connection_string.expose_secret())
    );

    let health = match backend::connect(&config.store).await {
        Ok(store) => {
            let result = store.ping().await;
            store.shutdown().await.ok();
            result
        }
        Err(e) => Err(e),
    };
    match health {
        Ok(()) => println!("Status:  ✅ REACHABLE"),
        Err(e) => println!("Status:  ❌ UNREACHABLE ({})", e),
    }

    println!();
    println!("Key scheme:              {:?}", config.cache.key_scheme);
    println!("Quiz TTL:                {}s", config.cache.quiz_ttl_secs);
    println!("Roadmap/explanation TTL: {}s", config.cache.content_ttl_secs);
    println!(
        "Max concurrent calls:    {}",
        config.cache.max_concurrent_generations
    );
    println!("Explanation attempts:    {}", config.cache.explanation_attempts);
    println!("Model:                   {}", config.model.model);
    Ok(())
}
