//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Every section and field is optional in the TOML file; omitted values take
//! their defaults.
//!
//! # Example
//!
//! ```no_run
//! use calmprice::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging(None);
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cache::{CacheBackend, CacheConfig};
use super::history::HistoryConfig;
use super::logging::LoggingConfig;
use super::queue::QueueConfig;
use super::trend::TrendConfig;
use super::upstream::UpstreamConfig;
use crate::error::{ConfigError, Result};

/// Largest listing the upstream returns in one page.
pub const MAX_TOP_N: u32 = 250;

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Market API location and request limits.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Request spacing.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Cache medium and freshness window.
    #[serde(default)]
    pub cache: CacheConfig,

    /// EMA horizon and seeding.
    #[serde(default)]
    pub trend: TrendConfig,

    /// History request defaults.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` if one was given, otherwise from `default_path` if
    /// that file exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path cannot be read, or if whichever
    /// file is read fails to parse or validate.
    pub fn load_or_default(path: Option<&Path>, default_path: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if default_path.exists() => Self::load(default_path),
            None => {
                debug!(path = %default_path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                field: "config",
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self, level_override: Option<&str>) {
        self.logging.init(level_override);
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        self.upstream.endpoints()?;

        if self.upstream.vs_currency.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "vs_currency",
            }
            .into());
        }
        if !(1..=MAX_TOP_N).contains(&self.upstream.top_n) {
            return Err(ConfigError::InvalidValue {
                field: "top_n",
                reason: format!("must be between 1 and {MAX_TOP_N}"),
            }
            .into());
        }
        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.trend.period == 0 {
            return Err(ConfigError::InvalidValue {
                field: "period",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.history.default_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_days",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }

        if self.cache.freshness_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "freshness_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if chrono::Duration::try_seconds(self.cache.freshness_secs).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "freshness_secs",
                reason: "too large".to_string(),
            }
            .into());
        }
        if self.cache.backend == CacheBackend::Sqlite && self.cache.path.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "path" }.into());
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeedPolicy;
    use crate::error::Error;

    fn invalid_field(toml: &str) -> &'static str {
        match Config::parse_toml(toml) {
            Err(Error::Config(ConfigError::InvalidValue { field, .. }))
            | Err(Error::Config(ConfigError::MissingField { field })) => field,
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.upstream.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.upstream.top_n, 10);
        assert_eq!(config.queue.min_delay_ms, 1200);
        assert_eq!(config.cache.freshness_secs, 21_600);
        assert_eq!(config.trend.period, 30);
        assert_eq!(config.trend.seed, SeedPolicy::FirstPrice);
        assert_eq!(config.history.default_days, 365);
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::parse_toml(
            r#"
            [upstream]
            base_url = "http://localhost:9000/api/v3"
            vs_currency = "eur"
            top_n = 25
            timeout_secs = 5

            [queue]
            min_delay_ms = 2500

            [cache]
            backend = "memory"
            freshness_secs = 60

            [trend]
            period = 10
            seed = "warmup"

            [history]
            default_days = 90

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.vs_currency, "eur");
        assert_eq!(config.upstream.timeout().as_secs(), 5);
        assert_eq!(config.queue.min_delay().as_millis(), 2500);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.freshness().num_seconds(), 60);
        assert_eq!(config.trend.smoother().period(), 10);
        assert_eq!(config.trend.smoother().seed(), SeedPolicy::Warmup);
        assert_eq!(config.history.default_days, 90);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(invalid_field("[upstream]\ntop_n = 0"), "top_n");
        assert_eq!(invalid_field("[upstream]\ntop_n = 251"), "top_n");
        assert_eq!(invalid_field("[upstream]\ntimeout_secs = 0"), "timeout_secs");
        assert_eq!(invalid_field("[upstream]\nbase_url = \"\""), "base_url");
        assert_eq!(invalid_field("[upstream]\nbase_url = \"ftp://x\""), "base_url");
        assert_eq!(invalid_field("[trend]\nperiod = 0"), "period");
        assert_eq!(invalid_field("[history]\ndefault_days = 0"), "default_days");
        assert_eq!(invalid_field("[cache]\nfreshness_secs = 0"), "freshness_secs");
        assert_eq!(
            invalid_field("[cache]\nbackend = \"memory\"\nfreshness_secs = 9000000000000000000"),
            "freshness_secs"
        );
        assert_eq!(invalid_field("[cache]\npath = \"\""), "path");
        assert_eq!(invalid_field("[logging]\nformat = \"xml\""), "format");
    }

    #[test]
    fn memory_backend_needs_no_path() {
        let config = Config::parse_toml("[cache]\nbackend = \"memory\"\npath = \"\"").unwrap();
        assert_eq!(config.cache.backend, CacheBackend::Memory);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            Config::parse_toml("[upstream"),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
        assert!(matches!(
            Config::parse_toml("[trend]\nseed = \"median\""),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn to_toml_roundtrips() {
        let mut config = Config::default();
        config.trend.seed = SeedPolicy::Warmup;
        let rendered = config.to_toml().unwrap();
        assert_eq!(Config::parse_toml(&rendered).unwrap(), config);
    }

    #[test]
    fn missing_default_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("config.toml");
        assert_eq!(
            Config::load_or_default(None, &absent).unwrap(),
            Config::default()
        );
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load_or_default(Some(&absent), &absent),
            Err(Error::Config(ConfigError::ReadFile(_)))
        ));
    }

    #[test]
    fn default_file_is_read_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[queue]\nmin_delay_ms = 50\n").unwrap();
        let config = Config::load_or_default(None, &path).unwrap();
        assert_eq!(config.queue.min_delay_ms, 50);
    }
}
