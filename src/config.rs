/// Runtime configuration loader.
///
/// Settings come from three layers, later layers winning:
/// 1. built-in defaults (`AlertsConfig::default`)
/// 2. `ahps_alerts.toml` in the working directory, or the file named by
///    `AHPS_CONFIG` (both optional)
/// 3. `AHPS_*` environment variables, with `.env` loaded first if present

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default config file, looked up in the current working directory.
pub const CONFIG_FILE: &str = "ahps_alerts.toml";

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "AHPS_CONFIG";

/// Configuration errors for both `ahps_alerts.toml` and region files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// What to do with an entry whose summary HTML cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Log a warning and leave the entry out of the collection.
    #[default]
    Skip,
    /// Fail the whole region run.
    Abort,
}

impl FromStr for MalformedPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MalformedPolicy::Skip),
            "abort" => Ok(MalformedPolicy::Abort),
            other => Err(ConfigError::Invalid(format!(
                "malformed_policy must be 'skip' or 'abort', got '{}'",
                other
            ))),
        }
    }
}

/// Service settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertsConfig {
    /// Upper bound on a single feed request, connect through body.
    pub fetch_timeout_secs: u64,
    /// Worker threads for multi-region runs.
    pub max_workers: usize,
    pub malformed_policy: MalformedPolicy,
    /// Pretty-print the JSON output.
    pub pretty: bool,
    pub user_agent: String,
    /// Region table override; the embedded `regions.toml` is used when unset.
    pub regions_file: Option<PathBuf>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
            max_workers: 4,
            malformed_policy: MalformedPolicy::Skip,
            pretty: false,
            user_agent: concat!("ahps_alerts/", env!("CARGO_PKG_VERSION")).to_string(),
            regions_file: None,
        }
    }
}

impl AlertsConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads defaults, the optional config file and environment overrides,
    /// then validates the result.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenv::dotenv().ok();

        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(CONFIG_FILE).exists() => Self::from_file(CONFIG_FILE)?,
            Err(_) => Self::default(),
        };

        config.apply_env_overrides(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `AHPS_*` overrides. `lookup` returns a variable's value, if
    /// set; tests pass a closure over a fixed map instead of the process
    /// environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AHPS_FETCH_TIMEOUT_SECS") {
            self.fetch_timeout_secs = parse_env("AHPS_FETCH_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("AHPS_MAX_WORKERS") {
            self.max_workers = parse_env("AHPS_MAX_WORKERS", &v)?;
        }
        if let Some(v) = lookup("AHPS_MALFORMED_POLICY") {
            self.malformed_policy = v.parse()?;
        }
        if let Some(v) = lookup("AHPS_PRETTY") {
            self.pretty = parse_env("AHPS_PRETTY", &v)?;
        }
        if let Some(v) = lookup("AHPS_USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = lookup("AHPS_REGIONS_FILE") {
            self.regions_file = Some(PathBuf::from(v));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(ConfigError::Invalid(
                "max_workers must be greater than zero".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::Invalid(format!("{}='{}': {}", name, value, e)))
}
