//! AHPS Alerts - command-line entry point
//!
//! Fetches the NWS AHPS hydrologic alert feed for one or more Texas regions
//! and prints the parsed alerts as JSON on stdout.
//!
//! Usage:
//!   cargo run --release                  # Statewide ("texas") alerts
//!   cargo run --release -- hgx ewx       # Several regions, fetched in parallel
//!
//! With one region the output is that region's alert collection. With
//! several it is an object keyed by region.
//!
//! Environment:
//!   RUST_LOG        - log filter (default: info); logs go to stderr
//!   AHPS_CONFIG     - alternate config file (default: ./ahps_alerts.toml)
//!   AHPS_*          - per-setting overrides, see `config`

use ahps_alerts::config::{AlertsConfig, ConfigError};
use ahps_alerts::ingest::HttpFeedFetcher;
use ahps_alerts::model::{AlertError, FeedError, OrderedMap};
use ahps_alerts::regions::{DEFAULT_REGION, RegionTable};
use ahps_alerts::{AlertAggregator, collect_regions};
use std::env;
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut region_keys: Vec<String> = Vec::new();

    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                eprintln!("Usage: {} [REGION ...]", args[0]);
                eprintln!("Regions default to '{}'.", DEFAULT_REGION);
                return;
            }
            flag if flag.starts_with('-') => {
                eprintln!("Unknown argument: {}", flag);
                eprintln!("Usage: {} [REGION ...]", args[0]);
                std::process::exit(2);
            }
            key => region_keys.push(key.to_string()),
        }
    }

    if region_keys.is_empty() {
        region_keys.push(DEFAULT_REGION.to_string());
    }

    match run(&region_keys) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!(kind = error_kind(e.as_ref()), "{}", e);
            std::process::exit(1);
        }
    }
}

fn run(region_keys: &[String]) -> Result<String, Box<dyn Error>> {
    let config = AlertsConfig::load()?;
    let regions = RegionTable::load(&config)?;
    let fetcher = HttpFeedFetcher::from_config(&config)?;
    let aggregator = AlertAggregator::from_config(&config, regions, fetcher);

    if let [key] = region_keys {
        return Ok(aggregator.get_alerts(key)?);
    }

    info!(regions = region_keys.len(), workers = config.max_workers, "collecting regions");

    let aggregator = Arc::new(aggregator);
    let mut by_region = OrderedMap::new();
    for (key, result) in collect_regions(&aggregator, region_keys, config.max_workers) {
        by_region.insert(key, result?);
    }

    Ok(aggregator.to_json(&by_region)?)
}

/// Error kind name reported alongside the message.
fn error_kind(e: &(dyn Error + 'static)) -> &'static str {
    if let Some(alert) = e.downcast_ref::<AlertError>() {
        alert.kind()
    } else if e.is::<ConfigError>() {
        "ConfigError"
    } else if e.is::<FeedError>() {
        "FeedFetchError"
    } else {
        "Error"
    }
}
