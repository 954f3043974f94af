/// AHPS region table.
///
/// Maps short forecast-office keys (`"texas"`, `"hgx"`, …) to the RSS feed
/// publishing that region's hydrologic alerts. The table ships as
/// `regions.toml`, embedded at build time, and can be replaced at runtime
/// with `AlertsConfig::regions_file`. It is loaded once and handed to the
/// aggregator; nothing looks it up globally.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::{AlertsConfig, ConfigError};
use crate::model::Region;

/// Region used when the CLI is given no arguments.
pub const DEFAULT_REGION: &str = "texas";

const BUILTIN_REGIONS: &str = include_str!("../regions.toml");

/// Root structure of a region file.
#[derive(Debug, Deserialize)]
struct RegionFile {
    region: Vec<Region>,
}

/// Immutable, validated set of regions in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    regions: Vec<Region>,
}

impl RegionTable {
    /// Validates and wraps `regions`: at least one region, unique non-empty
    /// keys, and an http(s) feed URL for each.
    pub fn from_regions(regions: Vec<Region>) -> Result<Self, ConfigError> {
        if regions.is_empty() {
            return Err(ConfigError::Invalid("region table is empty".to_string()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for region in &regions {
            if region.key.trim().is_empty() {
                return Err(ConfigError::Invalid("region key must not be empty".to_string()));
            }
            if !seen.insert(region.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate region key '{}'",
                    region.key
                )));
            }
            if !(region.feed_url.starts_with("https://") || region.feed_url.starts_with("http://")) {
                return Err(ConfigError::Invalid(format!(
                    "region '{}' has a non-HTTP feed URL: {}",
                    region.key, region.feed_url
                )));
            }
        }
        drop(seen);

        Ok(Self { regions })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: RegionFile =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_regions(file.region)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_REGIONS)
    }

    /// The override file from `config` if one is set, otherwise the
    /// built-in table.
    pub fn load(config: &AlertsConfig) -> Result<Self, ConfigError> {
        match &config.regions_file {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_loads() {
        let table = RegionTable::builtin().expect("embedded regions.toml must be valid");
        assert_eq!(table.len(), 11, "should have all eleven Texas regions");
    }

    #[test]
    fn test_builtin_table_has_all_offices() {
        let table = RegionTable::builtin().unwrap();
        let keys: Vec<&str> = table.keys().collect();
        assert_eq!(
            keys,
            vec!["texas", "ama", "ewx", "bro", "crp", "epz", "fwd", "hgx", "lub", "maf", "sjt"]
        );
    }

    #[test]
    fn test_all_feeds_point_at_water_weather_gov() {
        let table = RegionTable::builtin().unwrap();
        for region in table.iter() {
            assert!(
                region.feed_url.starts_with("https://water.weather.gov/ahps2/rss/"),
                "{} has unexpected feed URL {}",
                region.key,
                region.feed_url
            );
            assert!(region.feed_url.ends_with(".rss"));
            assert!(!region.description.is_empty(), "{} needs a description", region.key);
        }
    }

    #[test]
    fn test_statewide_region_lookup() {
        let table = RegionTable::builtin().unwrap();
        let texas = table.get(DEFAULT_REGION).expect("texas should exist");
        assert_eq!(texas.description, "Statewide alerts");
        assert_eq!(texas.feed_url, "https://water.weather.gov/ahps2/rss/alert/tx.rss");
    }

    #[test]
    fn test_forecast_feed_regions() {
        let table = RegionTable::builtin().unwrap();
        for key in ["lub", "maf", "sjt"] {
            let region = table.get(key).unwrap();
            assert!(
                region.feed_url.contains("/rss/fcst/"),
                "{} publishes a forecast feed, got {}",
                key,
                region.feed_url
            );
        }
    }

    #[test]
    fn test_unknown_key_lookup_is_none() {
        let table = RegionTable::builtin().unwrap();
        assert!(table.get("okx").is_none());
        assert!(table.get("TEXAS").is_none(), "keys are case-sensitive");
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let toml = r#"
            [[region]]
            key = "hgx"
            description = "Houston"
            feed_url = "https://example.test/hgx.rss"

            [[region]]
            key = "hgx"
            description = "Galveston"
            feed_url = "https://example.test/hgx2.rss"
        "#;
        let result = RegionTable::from_toml_str(toml);
        assert!(matches!(result, Err(ConfigError::Invalid(ref m)) if m.contains("hgx")));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let result = RegionTable::from_regions(Vec::new());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_http_feed_url_is_rejected() {
        let result = RegionTable::from_regions(vec![Region {
            key: "local".to_string(),
            description: "Local file".to_string(),
            feed_url: "file:///tmp/tx.rss".to_string(),
        }]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_uses_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.toml");
        fs::write(
            &path,
            "[[region]]\nkey = \"test\"\ndescription = \"Test\"\nfeed_url = \"http://localhost/test.rss\"\n",
        )
        .unwrap();

        let config = AlertsConfig {
            regions_file: Some(path),
            ..AlertsConfig::default()
        };
        let table = RegionTable::load(&config).expect("override should load");
        assert_eq!(table.len(), 1);
        assert!(table.get("test").is_some());
    }
}
