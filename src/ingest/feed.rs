/// AHPS RSS feed client.
///
/// Fetches a region's alert feed over HTTPS and turns each item into an
/// `AlertEntry` (title + raw HTML summary). The `FeedFetcher` trait is the
/// seam the aggregator depends on, so tests can substitute canned feeds.
///
/// Feed documentation: https://water.weather.gov/ahps/rss/

use std::time::Duration;

use tracing::debug;

use crate::config::AlertsConfig;
use crate::model::{AlertEntry, FeedError};

/// Retrieves the entries of the feed at `url`, in feed order.
pub trait FeedFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<AlertEntry>, FeedError>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Blocking HTTP fetcher with a bounded request timeout.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &AlertsConfig) -> Result<Self, FeedError> {
        Self::new(
            Duration::from_secs(config.fetch_timeout_secs),
            &config.user_agent,
        )
    }
}

impl FeedFetcher for HttpFeedFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<AlertEntry>, FeedError> {
        debug!(url, "fetching feed");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/rss+xml, application/xml, text/xml")
            .send()?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.bytes()?;
        parse_feed(&body)
    }
}

// ---------------------------------------------------------------------------
// Feed parsing
// ---------------------------------------------------------------------------

/// Parses an RSS or Atom document into alert entries.
///
/// Missing titles become empty strings. The summary is the item
/// description, falling back to the entry content body, then to an empty
/// string.
///
/// # Errors
/// `FeedError::Parse` if the document is not a recognizable feed.
pub fn parse_feed(body: &[u8]) -> Result<Vec<AlertEntry>, FeedError> {
    let feed = feed_rs::parser::parse(body).map_err(|e| FeedError::Parse(e.to_string()))?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();
            AlertEntry { title, summary }
        })
        .collect();

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
