/// Shared data types for the AHPS alert pipeline.
///
/// Every type here is a plain value: regions are read-only configuration,
/// feed entries are discarded once parsed, and summaries/collections are
/// built fresh on each run.

use serde::Deserialize;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Borrow;
use std::fmt;

// ---------------------------------------------------------------------------
// Regions and feed entries
// ---------------------------------------------------------------------------

/// One AHPS forecast region and the RSS feed that publishes its alerts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Region {
    /// Short lookup key, e.g. `"texas"` or `"hgx"`.
    pub key: String,
    /// Human-readable area served by the feed.
    pub description: String,
    /// RSS endpoint on water.weather.gov.
    pub feed_url: String,
}

/// A single feed item as handed over by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEntry {
    pub title: String,
    /// Raw HTML summary body.
    pub summary: String,
}

impl AlertEntry {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }
}

/// AHPS gauge (station) identifier: four uppercase letters and a digit,
/// e.g. `"BKLT2"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GaugeId(String);

impl GaugeId {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GaugeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for GaugeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GaugeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Insertion-ordered map
// ---------------------------------------------------------------------------

/// Small insertion-ordered map.
///
/// Re-inserting an existing key replaces its value but keeps its original
/// position, so serialized output lists headings in the order they were
/// first seen. Summaries hold a handful of entries, so lookups are linear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: PartialEq, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Returns the value under `key`, inserting `f()` at the end first if
    /// the key is absent.
    pub fn get_or_insert_with(&mut self, key: K, f: impl FnOnce() -> V) -> &mut V {
        let index = match self.entries.iter().position(|(k, _)| *k == key) {
            Some(index) => index,
            None => {
                self.entries.push((key, f()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl<V: Serialize> Serialize for OrderedMap<String, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Parsed summaries
// ---------------------------------------------------------------------------

/// `key → value` pairs under one subsection heading.
pub type DataItems = OrderedMap<String, String>;

/// `subsection → data items` under one section heading.
pub type Section = OrderedMap<String, DataItems>;

/// Structured form of one alert's HTML summary.
///
/// Serializes as a single flat object: `"title"` first, then one key per
/// section heading, e.g.
/// `{"title": "...", "Observed": {"Crest": {"Stage": "12.3 ft"}}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertSummary {
    pub title: String,
    pub sections: OrderedMap<String, Section>,
}

impl AlertSummary {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: OrderedMap::new(),
        }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Looks up a single data value by its full heading path.
    pub fn value(&self, section: &str, subsection: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(subsection)?
            .get(key)
            .map(String::as_str)
    }
}

impl Serialize for AlertSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // A section literally headed "title" takes over the title slot.
        let titled_section = self.sections.get("title");
        let len = self.sections.len() + usize::from(titled_section.is_none());

        let mut map = serializer.serialize_map(Some(len))?;
        match titled_section {
            Some(section) => map.serialize_entry("title", section)?,
            None => map.serialize_entry("title", &self.title)?,
        }
        for (heading, section) in self.sections.iter() {
            if heading != "title" {
                map.serialize_entry(heading, section)?;
            }
        }
        map.end()
    }
}

/// All parsed alerts for one region run, keyed by extracted gauge ID.
///
/// Entries without a gauge share the `None` key; as with any repeated key
/// the later entry replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertCollection {
    alerts: OrderedMap<Option<GaugeId>, AlertSummary>,
}

impl AlertCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, gauge: Option<GaugeId>, summary: AlertSummary) -> Option<AlertSummary> {
        self.alerts.insert(gauge, summary)
    }

    /// Summary for a gauge ID, or for gauge-less entries when `gauge` is `None`.
    pub fn get(&self, gauge: Option<&str>) -> Option<&AlertSummary> {
        self.alerts
            .iter()
            .find(|(k, _)| k.as_ref().map(GaugeId::as_str) == gauge)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Option<GaugeId>, &AlertSummary)> {
        self.alerts.iter()
    }
}

/// Map key used in serialized output for entries with no gauge ID.
pub const NO_GAUGE_KEY: &str = "null";

impl Serialize for AlertCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.alerts.len()))?;
        for (gauge, summary) in self.alerts.iter() {
            let key = gauge.as_ref().map(GaugeId::as_str).unwrap_or(NO_GAUGE_KEY);
            map.serialize_entry(key, summary)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural problems in a single alert summary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error("subsection '{subsection}' appears before any section heading")]
    SubsectionWithoutSection { subsection: String },

    #[error("data line '{line}' appears before its section/subsection heading")]
    DataWithoutHeading { line: String },

    #[error("data line '{line}' does not split into a single key/value pair")]
    UnsplittableData { line: String },
}

/// Failures while retrieving or decoding a feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed server returned HTTP {0}")]
    Status(u16),

    #[error("could not parse feed document: {0}")]
    Parse(String),
}

/// Errors surfaced by the alert aggregator.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    #[error("failed to fetch feed for region '{region}': {source}")]
    FeedFetch {
        region: String,
        #[source]
        source: FeedError,
    },

    #[error("malformed summary in region '{region}', entry '{title}': {source}")]
    MalformedSummary {
        region: String,
        title: String,
        #[source]
        source: SummaryError,
    },

    #[error("failed to serialize alerts: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AlertError {
    /// Short error kind name, used when reporting a failed run.
    pub fn kind(&self) -> &'static str {
        match self {
            AlertError::UnknownRegion(_) => "UnknownRegionError",
            AlertError::FeedFetch { .. } => "FeedFetchError",
            AlertError::MalformedSummary { .. } => "MalformedSummaryError",
            AlertError::Serialize(_) => "SerializeError",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary_with(title: &str, sections: &[(&str, &str, &str, &str)]) -> AlertSummary {
        let mut summary = AlertSummary::new(title);
        for (section, subsection, key, value) in sections {
            summary
                .sections
                .get_or_insert_with(section.to_string(), Section::new)
                .get_or_insert_with(subsection.to_string(), DataItems::new)
                .insert(key.to_string(), value.to_string());
        }
        summary
    }

    #[test]
    fn test_ordered_map_reinsert_keeps_position() {
        let mut map: OrderedMap<String, u32> = OrderedMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        let replaced = map.insert("a".to_string(), 3);

        assert_eq!(replaced, Some(1));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"], "re-inserted key should keep its slot");
        assert_eq!(map.get("a"), Some(&3));
    }

    #[test]
    fn test_summary_serializes_title_first_then_sections() {
        let summary = summary_with(
            "ABCD1 gauge alert",
            &[("Observed", "Crest", "Stage", "12.3 ft")],
        );
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(
            json,
            r#"{"title":"ABCD1 gauge alert","Observed":{"Crest":{"Stage":"12.3 ft"}}}"#
        );
    }

    #[test]
    fn test_section_named_title_replaces_title_value() {
        let summary = summary_with("Alert", &[("title", "x", "k", "v"), ("Forecast", "y", "a", "b")]);
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(
            json,
            r#"{"title":{"x":{"k":"v"}},"Forecast":{"y":{"a":"b"}}}"#,
            "a 'title' section must not produce a duplicate key"
        );
    }

    #[test]
    fn test_collection_serializes_missing_gauge_as_null_key() {
        let mut alerts = AlertCollection::new();
        alerts.insert(Some(GaugeId::new("BKLT2")), AlertSummary::new("BKLT2 alert"));
        alerts.insert(None, AlertSummary::new("no gauge"));

        let value: serde_json::Value = serde_json::to_value(&alerts).unwrap();
        assert_eq!(value["BKLT2"]["title"], "BKLT2 alert");
        assert_eq!(value[NO_GAUGE_KEY]["title"], "no gauge");
    }

    #[test]
    fn test_collection_overwrites_duplicate_keys() {
        let mut alerts = AlertCollection::new();
        alerts.insert(None, AlertSummary::new("first"));
        alerts.insert(None, AlertSummary::new("second"));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts.get(None).map(|s| s.title.as_str()), Some("second"));
    }

    #[test]
    fn test_summary_value_lookup() {
        let summary = summary_with("t", &[("Forecast", "Crest", "Stage", "20.1 ft")]);
        assert_eq!(summary.value("Forecast", "Crest", "Stage"), Some("20.1 ft"));
        assert_eq!(summary.value("Forecast", "Crest", "Flow"), None);
        assert_eq!(summary.value("Observed", "Crest", "Stage"), None);
    }

    #[test]
    fn test_alert_error_kinds() {
        assert_eq!(AlertError::UnknownRegion("xyz".into()).kind(), "UnknownRegionError");
        let err = AlertError::FeedFetch {
            region: "texas".into(),
            source: FeedError::Status(503),
        };
        assert_eq!(err.kind(), "FeedFetchError");
        assert!(err.to_string().contains("texas"), "message should name the region");
    }
}
