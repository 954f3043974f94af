/// Data ingestion for AHPS alert feeds.
///
/// Submodules:
/// - `feed` — RSS/Atom retrieval and entry extraction.
/// - `fixtures` (test only) — representative feed and summary payloads.
///
/// Other NWS products (e.g. the api.weather.gov alerts endpoint) would get
/// their own file here rather than growing `feed`.

pub mod feed;

#[cfg(test)]
pub(crate) mod fixtures;

pub use feed::{FeedFetcher, HttpFeedFetcher, parse_feed};
