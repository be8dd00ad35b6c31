use std::collections::HashMap;
use std::env;
use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use crosstable_rust_core::sources::fixture::FixtureSource;
use crosstable_rust_core::sources::SourceRegistry;
use crosstable_rust_core::{reconcile_player, validate_pairing, ReconcileConfig, Source};
use dotenv::dotenv;
use log::{info, warn};
use serde::Deserialize;

/// Serving-layer request: the queried player name(s) plus pre-extracted rows
/// per source, as delivered by the out-of-process scrapers.
#[derive(Debug, Deserialize)]
struct ReconcileRequest {
    player1: String,
    #[serde(default)]
    player2: Option<String>,
    /// Player 1's raw rows, keyed by source identifier.
    #[serde(default)]
    rows: HashMap<String, Vec<Vec<String>>>,
    /// Player 2's raw rows, pairing mode only.
    #[serde(default)]
    rows_player2: HashMap<String, Vec<Vec<String>>>,
}

/// Read an env var, warning and falling back on parse failure.
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    match env::var(key) {
        Ok(value) => match value.trim().parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("Ignoring unparseable {}={}", key, value);
                None
            }
        },
        Err(_) => None,
    }
}

fn config_from_env() -> ReconcileConfig {
    let mut config = ReconcileConfig::default();
    if let Some(threshold) = env_parse::<u8>("FUZZY_THRESHOLD") {
        config = config.with_fuzzy_threshold(threshold);
    }
    if let Some(min_sources) = env_parse::<usize>("MIN_SOURCES") {
        config = config.with_min_sources(min_sources);
    }
    if let Some(min_common) = env_parse::<usize>("MIN_COMMON_MATCHES") {
        config = config.with_min_common_matches(min_common);
    }
    if let Some(max_results) = env_parse::<usize>("MAX_RESULTS") {
        config = config.with_max_results(max_results);
    }
    if let Some(max_workers) = env_parse::<usize>("MAX_WORKERS") {
        config = config.with_max_workers(max_workers);
    }
    config
}

/// Wrap the request's pre-extracted rows as fixture collaborators, one per
/// known source that has rows for either player.
fn build_registry(request: &ReconcileRequest) -> SourceRegistry {
    let mut registry = SourceRegistry::new();

    for key in request.rows.keys().chain(request.rows_player2.keys()) {
        if Source::parse(key).is_none() {
            warn!("Ignoring rows for unknown source '{}'", key);
        }
    }

    for source in Source::ALL {
        let rows1 = request.rows.get(source.as_str());
        let rows2 = request.rows_player2.get(source.as_str());
        if rows1.is_none() && rows2.is_none() {
            continue;
        }

        let mut fixture = FixtureSource::new(source, Vec::new())
            .with_player_rows(&request.player1, rows1.cloned().unwrap_or_default());
        if let Some(player2) = &request.player2 {
            fixture = fixture.with_player_rows(player2, rows2.cloned().unwrap_or_default());
        }
        registry.register(Arc::new(fixture));
    }

    registry
}

fn read_request() -> Result<ReconcileRequest> {
    let args: Vec<String> = env::args().collect();
    let payload = match args.get(1) {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            buffer
        }
    };
    serde_json::from_str(&payload).context("parsing request JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    info!("Starting Reconcile Service...");

    let request = read_request()?;
    let config = config_from_env();
    let registry = build_registry(&request);
    info!(
        "Request for '{}' with {} registered sources",
        request.player1,
        registry.len()
    );

    let output = match &request.player2 {
        Some(player2) => {
            let report = validate_pairing(&registry, &request.player1, player2, &config).await?;
            serde_json::to_string_pretty(&report)?
        }
        None => {
            let report = reconcile_player(&registry, &request.player1, &config).await?;
            serde_json::to_string_pretty(&report)?
        }
    };

    println!("{}", output);
    Ok(())
}
