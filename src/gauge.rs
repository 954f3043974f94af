/// Gauge ID extraction from alert titles.
///
/// AHPS alert titles name the affected gauge somewhere in free text, e.g.
/// `"BKLT2 - Brazos River at Kempner (Texas) - Minor Flooding"`. The ID is
/// the first run of four uppercase letters followed by a digit.
///
/// The match is unanchored, so an unrelated token such as a county code
/// glued to a digit can be picked up instead of the real gauge. Titles from
/// water.weather.gov lead with the gauge ID, which keeps this in check.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::GaugeId;

static GAUGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]{4}[0-9]").expect("gauge pattern is valid"));

/// Returns the first gauge ID token in `text`, or `None` if there is none.
pub fn extract_gauge(text: &str) -> Option<GaugeId> {
    GAUGE_PATTERN
        .find(text)
        .map(|m| GaugeId::new(m.as_str()))
}
