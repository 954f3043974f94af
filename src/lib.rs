/// ahps_alerts: NWS AHPS hydrologic alert feeds for Texas, as structured JSON.
///
/// # Module structure
///
/// ```text
/// ahps_alerts
/// ├── model       — shared data types (Region, AlertEntry, GaugeId, AlertSummary, errors)
/// ├── config      — runtime settings (ahps_alerts.toml + AHPS_* environment)
/// ├── regions     — region key → feed URL table (regions.toml)
/// ├── gauge       — gauge ID extraction from alert titles
/// ├── summary     — HTML alert summary parser
/// │   └── walk    — classifying document-order traversal of the HTML tree
/// ├── ingest
/// │   ├── feed    — RSS retrieval and entry extraction
/// │   └── fixtures (test only) — representative feed and summary payloads
/// └── aggregator  — fetch → extract → parse → collect, per region or in parallel
/// ```

/// Public modules
pub mod aggregator;
pub mod config;
pub mod gauge;
pub mod ingest;
pub mod model;
pub mod regions;
pub mod summary;

pub use aggregator::{AlertAggregator, collect_regions};
pub use gauge::extract_gauge;
pub use summary::parse_summary;
