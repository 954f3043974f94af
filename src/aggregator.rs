/// Alert aggregation: region lookup → feed fetch → gauge extraction →
/// summary parsing → one `AlertCollection` per region.
///
/// Each call performs a fresh fetch and full parse; nothing is cached
/// between calls. Entries within a region are processed strictly in feed
/// order, which decides which entry survives when two share a gauge ID.
/// Multiple regions can be collected in parallel, one independent pipeline
/// per region on a thread pool.

use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, mpsc};
use threadpool::ThreadPool;
use tracing::{debug, info, warn};

use crate::config::{AlertsConfig, MalformedPolicy};
use crate::gauge::extract_gauge;
use crate::ingest::FeedFetcher;
use crate::model::{AlertCollection, AlertEntry, AlertError, Region};
use crate::regions::RegionTable;
use crate::summary::parse_summary;

/// Ties a region table to a feed fetcher.
pub struct AlertAggregator<F> {
    regions: RegionTable,
    fetcher: F,
    policy: MalformedPolicy,
    pretty: bool,
}

impl<F: FeedFetcher> AlertAggregator<F> {
    /// Aggregator with the default (`skip`) malformed-summary policy and
    /// compact JSON output.
    pub fn new(regions: RegionTable, fetcher: F) -> Self {
        Self {
            regions,
            fetcher,
            policy: MalformedPolicy::default(),
            pretty: false,
        }
    }

    pub fn from_config(config: &AlertsConfig, regions: RegionTable, fetcher: F) -> Self {
        Self::new(regions, fetcher)
            .with_policy(config.malformed_policy)
            .with_pretty(config.pretty)
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    /// Fetches and parses every alert for `region_key`.
    ///
    /// # Errors
    /// - `AlertError::UnknownRegion` — key not in the table; no fetch is made.
    /// - `AlertError::FeedFetch` — network, timeout, HTTP status or feed
    ///   parse failure.
    /// - `AlertError::MalformedSummary` — only under `MalformedPolicy::Abort`.
    pub fn collect_alerts(&self, region_key: &str) -> Result<AlertCollection, AlertError> {
        let region = self
            .regions
            .get(region_key)
            .ok_or_else(|| AlertError::UnknownRegion(region_key.to_string()))?;

        let start = Utc::now();
        let entries = self
            .fetcher
            .fetch(&region.feed_url)
            .map_err(|source| AlertError::FeedFetch {
                region: region.key.clone(),
                source,
            })?;

        let entry_count = entries.len();
        let alerts = assemble_alerts(region, entries, self.policy)?;

        info!(
            region = %region.key,
            entries = entry_count,
            alerts = alerts.len(),
            elapsed_ms = (Utc::now() - start).num_milliseconds(),
            "collected alerts"
        );

        Ok(alerts)
    }

    /// `collect_alerts` serialized to JSON.
    pub fn get_alerts(&self, region_key: &str) -> Result<String, AlertError> {
        let alerts = self.collect_alerts(region_key)?;
        self.to_json(&alerts)
    }

    /// Serializes `value` honoring the configured pretty-print setting.
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String, AlertError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

/// Builds the collection for one region from already-fetched entries.
///
/// Each entry is keyed by the gauge ID found in its title; a later entry
/// replaces an earlier one with the same key, gauge-less entries included.
pub fn assemble_alerts(
    region: &Region,
    entries: Vec<AlertEntry>,
    policy: MalformedPolicy,
) -> Result<AlertCollection, AlertError> {
    let mut alerts = AlertCollection::new();

    for entry in entries {
        let gauge = extract_gauge(&entry.title);

        let summary = match parse_summary(&entry.title, &entry.summary) {
            Ok(summary) => summary,
            Err(e) => match policy {
                MalformedPolicy::Abort => {
                    return Err(AlertError::MalformedSummary {
                        region: region.key.clone(),
                        title: entry.title,
                        source: e,
                    });
                }
                MalformedPolicy::Skip => {
                    warn!(
                        region = %region.key,
                        title = %entry.title,
                        error = %e,
                        "skipping malformed alert summary"
                    );
                    continue;
                }
            },
        };

        debug!(
            region = %region.key,
            gauge = gauge.as_ref().map(|g| g.as_str()).unwrap_or("-"),
            sections = summary.sections.len(),
            "parsed alert"
        );

        if alerts.insert(gauge, summary).is_some() {
            debug!(region = %region.key, title = %entry.title, "replaced earlier alert for same gauge");
        }
    }

    Ok(alerts)
}

/// Collects several regions in parallel on a pool of at most `max_workers`
/// threads. Results come back in the order of `region_keys`; one region's
/// failure does not affect the others.
pub fn collect_regions<F>(
    aggregator: &Arc<AlertAggregator<F>>,
    region_keys: &[String],
    max_workers: usize,
) -> Vec<(String, Result<AlertCollection, AlertError>)>
where
    F: FeedFetcher + Send + Sync + 'static,
{
    if region_keys.is_empty() {
        return Vec::new();
    }

    let pool = ThreadPool::new(max_workers.clamp(1, region_keys.len()));
    let (tx, rx) = mpsc::channel();

    for (index, key) in region_keys.iter().enumerate() {
        let tx = tx.clone();
        let aggregator = Arc::clone(aggregator);
        let key = key.clone();

        pool.execute(move || {
            let result = aggregator.collect_alerts(&key);
            // Receiver outlives the pool; a send error means the caller is gone.
            let _ = tx.send((index, key, result));
        });
    }
    drop(tx);

    let mut results: Vec<_> = rx.iter().collect();
    results.sort_by_key(|(index, _, _)| *index);

    if results.len() < region_keys.len() {
        warn!(
            requested = region_keys.len(),
            completed = results.len(),
            "some region workers did not report back"
        );
    }

    results
        .into_iter()
        .map(|(_, key, result)| (key, result))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
