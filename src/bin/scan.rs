use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use sdg_insights::annotate::{clean, create_annotator};
use sdg_insights::config::Config;
use sdg_insights::insight::{InsightEngine, to_json_map};
use sdg_insights::pdf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Scan a document and print per-goal insights as JSON", long_about = None)]
struct Args {
    /// Document to scan (.pdf is extracted, anything else is read as plain text)
    file: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Path to a TOML config file (overrides SDG_INSIGHTS_CONFIG)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load_from(args.config.as_deref())?;

    let raw = if args
        .file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    {
        pdf::extract_text(&args.file)?
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?
    };

    let config = Arc::new(config);
    let annotator = create_annotator(&config)?;
    let engine = InsightEngine::new(config, annotator);

    let insights = engine.process(&clean(&raw)).await?;
    let map = to_json_map(&insights);

    let out = if args.pretty {
        serde_json::to_string_pretty(&map)?
    } else {
        serde_json::to_string(&map)?
    };
    println!("{}", out);

    Ok(())
}
