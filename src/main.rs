/*
 * Responsibility
 * - CLI 引数の解析 (--config)
 * - tokio runtime 起動
 * - app::run() の呼び出し（ロジックは置かない）
 */
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod api;
mod app;
mod config;
mod error;
mod middleware;
mod services;
mod state;

/// Backend for a Shopify embedded app: verifies App Bridge session tokens
/// in front of protected routes.
#[derive(Parser, Debug)]
#[command(name = "shopify-session-gate", version, about)]
struct Args {
    /// YAML config file (port, shopify_api_key, shopify_api_secret).
    /// Defaults to config/config.yaml when that file exists.
    #[arg(long, env = "APP_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    app::run(args.config).await
}
