//! Sanctions collector binary
//!
//! Usage: `sanctions-collector [refresh|stats|search <term>|entity <id>|metrics]`

use anyhow::{bail, Context};
use sanctions_service::{CollectionMetrics, Config, SanctionsService, SearchQuery};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("🚀 Starting sanctions collector");

    // Load configuration
    let config = match std::env::var("SANCTIONS_CONFIG") {
        Ok(path) => Config::from_toml_file(&PathBuf::from(path))?,
        Err(_) => Config::from_env()?,
    };
    tracing::info!("Snapshot slot: {}", config.snapshot_path().display());

    let metrics = Arc::new(CollectionMetrics::new().context("failed to create metrics")?);
    let service = SanctionsService::open(config)?.with_observer(metrics.clone());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("stats");

    if command == "refresh" {
        let summary = service.refresh().await?;
        return print_json(&summary);
    }

    service.initialize().await?;

    match command {
        "stats" => print_json(&service.statistics()?),
        "health" => print_json(&service.health()),
        "search" => {
            let term = args.get(1).context("search needs a term")?;
            print_json(&service.search(&SearchQuery::text(term))?)
        }
        "entity" => {
            let id = args.get(1).context("entity needs an id")?;
            print_json(&service.entity(id)?)
        }
        "metrics" => {
            print!("{}", metrics.render());
            Ok(())
        }
        other => bail!("unknown command: {}", other),
    }
}
