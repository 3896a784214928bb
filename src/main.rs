//! HTTP service entry point for sdg-insights

use anyhow::Result;
use clap::Parser;
use sdg_insights::annotate::create_annotator;
use sdg_insights::config::Config;
use sdg_insights::http::start_http_server;
use sdg_insights::insight::InsightEngine;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "HTTP service extracting per-goal insights from documents", long_about = None)]
struct Args {
    /// Bind address for the HTTP server (overrides SDG_HTTP_BIND)
    #[arg(long)]
    bind: Option<std::net::SocketAddr>,

    /// Directory that receives uploaded documents (overrides SDG_UPLOAD_DIR)
    #[arg(long)]
    upload_dir: Option<String>,

    /// Path to a TOML config file (overrides SDG_INSIGHTS_CONFIG)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration using the typed config system
    let mut config = Config::load_from(args.config.as_deref()).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    if let Some(bind) = args.bind {
        config.runtime.http_bind = bind;
    }
    if let Some(dir) = args.upload_dir {
        config.system.upload_dir = dir;
    }

    // Initialize tracing with configurable log level
    tracing_subscriber::fmt()
        .with_env_filter(config.runtime.log_level.as_str())
        .with_ansi(false)
        .init();

    info!("Starting sdg-insights HTTP service");
    info!(
        "Configuration loaded: annotator={}, bind={}, upload_dir={}",
        config.system.annotator_provider, config.runtime.http_bind, config.system.upload_dir
    );

    let config = Arc::new(config);
    let annotator = create_annotator(&config).map_err(|e| {
        eprintln!("Failed to create annotator: {}", e);
        e
    })?;
    let engine = Arc::new(InsightEngine::new(config.clone(), annotator));

    start_http_server(config, engine).await?;
    Ok(())
}
