//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了CLI命令行接口。

use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pathwise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(name = "serve", about = "Start the HTTP server")]
    Serve,

    #[command(name = "clear", about = "Remove every entry from the cache store")]
    Clear(ClearArgs),

    #[command(name = "status", about = "Check cache store connectivity and show effective settings")]
    Status,
}

#[derive(Parser, Debug)]
pub struct ClearArgs {
    #[arg(short, long, help = "Skip the confirmation prompt")]
    pub yes: bool,
}

mod clear;
mod serve;
mod status;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::telemetry::init_tracing("info");

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match &cli.command {
        Commands::Serve => serve::execute(config).await,
        Commands::Clear(args) => clear::execute(&config, args).await,
        Commands::Status => status::execute(&config).await,
    }
}
