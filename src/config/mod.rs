//! Configuration handling for a scrape run.
//!
//! The knobs that used to be scattered literals (page range, rating quantile,
//! output destinations) live in [`ScrapeConfig`]. `ScrapeConfig::from_env`
//! reads overrides from environment variables and falls back to the defaults
//! documented on each constant. Request headers come from a separate JSON file,
//! see [`HeaderSet::load`].

pub mod headers;

pub use headers::HeaderSet;

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::reduce::CoercionPolicy;

/// Environment variable names.
pub const ENV_SITE_ROOT: &str = "LISTING_SCOUT_SITE_ROOT";
pub const ENV_PAGE_COUNT: &str = "LISTING_SCOUT_PAGE_COUNT";
pub const ENV_RATING_QUANTILE: &str = "LISTING_SCOUT_RATING_QUANTILE";
pub const ENV_CONCURRENCY: &str = "LISTING_SCOUT_CONCURRENCY";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LISTING_SCOUT_REQUEST_TIMEOUT_SECS";
pub const ENV_HEADERS_PATH: &str = "LISTING_SCOUT_HEADERS_PATH";
pub const ENV_RAW_OUTPUT: &str = "LISTING_SCOUT_RAW_OUTPUT";
pub const ENV_RANKED_OUTPUT: &str = "LISTING_SCOUT_RANKED_OUTPUT";

/// Site root prefixed to relative listing hrefs and used for search requests.
pub const DEFAULT_SITE_ROOT: &str = "https://www.amazon.com";
/// Pages 1 through 9 inclusive.
pub const DEFAULT_PAGE_COUNT: u32 = 9;
/// Third quartile.
pub const DEFAULT_RATING_QUANTILE: f64 = 0.75;
/// One fetch at a time.
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HEADERS_PATH: &str = "headers.json";
pub const DEFAULT_RAW_OUTPUT: &str = "amazon_web_scrapper_dataset.csv";
pub const DEFAULT_RANKED_OUTPUT: &str = "results.csv";

/// Runtime configuration for one scrape-and-rank run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    pub site_root: String,
    pub page_count: u32,
    pub rating_quantile: f64,
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    pub headers_path: PathBuf,
    pub raw_output: PathBuf,
    pub ranked_output: PathBuf,
    pub coercion_policy: CoercionPolicy,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            site_root: DEFAULT_SITE_ROOT.to_string(),
            page_count: DEFAULT_PAGE_COUNT,
            rating_quantile: DEFAULT_RATING_QUANTILE,
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            headers_path: PathBuf::from(DEFAULT_HEADERS_PATH),
            raw_output: PathBuf::from(DEFAULT_RAW_OUTPUT),
            ranked_output: PathBuf::from(DEFAULT_RANKED_OUTPUT),
            coercion_policy: CoercionPolicy::default(),
        }
    }
}

/// Values set by the caller (usually the command line). Each one wins over
/// its environment variable, which is then not read at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub page_count: Option<u32>,
    pub rating_quantile: Option<f64>,
    pub concurrency: Option<usize>,
    pub headers_path: Option<PathBuf>,
    pub raw_output: Option<PathBuf>,
    pub ranked_output: Option<PathBuf>,
    pub coercion_policy: Option<CoercionPolicy>,
}

impl ScrapeConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&ConfigOverrides::default())
    }

    /// Load with `overrides` layered over the environment, then validate the
    /// merged result once.
    pub fn from_env_with(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let page_count = match overrides.page_count {
            Some(v) => v,
            None => parse_env(ENV_PAGE_COUNT, "page_count")?.unwrap_or(defaults.page_count),
        };
        let rating_quantile = match overrides.rating_quantile {
            Some(v) => v,
            None => parse_env(ENV_RATING_QUANTILE, "rating_quantile")?
                .unwrap_or(defaults.rating_quantile),
        };
        let concurrency = match overrides.concurrency {
            Some(v) => v,
            None => parse_env(ENV_CONCURRENCY, "concurrency")?.unwrap_or(defaults.concurrency),
        };

        let config = Self {
            site_root: env::var(ENV_SITE_ROOT).unwrap_or(defaults.site_root),
            page_count,
            rating_quantile,
            concurrency,
            request_timeout_secs: parse_env(ENV_REQUEST_TIMEOUT_SECS, "request_timeout_secs")?
                .unwrap_or(defaults.request_timeout_secs),
            headers_path: path_or_env(&overrides.headers_path, ENV_HEADERS_PATH)
                .unwrap_or(defaults.headers_path),
            raw_output: path_or_env(&overrides.raw_output, ENV_RAW_OUTPUT)
                .unwrap_or(defaults.raw_output),
            ranked_output: path_or_env(&overrides.ranked_output, ENV_RANKED_OUTPUT)
                .unwrap_or(defaults.ranked_output),
            coercion_policy: overrides
                .coercion_policy
                .unwrap_or(defaults.coercion_policy),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the numeric knobs are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "page_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.rating_quantile) {
            return Err(ConfigError::InvalidValue {
                field: "rating_quantile",
                reason: format!("{} is outside [0, 1]", self.rating_quantile),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if url::Url::parse(&self.site_root).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "site_root",
                reason: format!("'{}' is not an absolute url", self.site_root),
            });
        }
        Ok(())
    }

    /// Page numbers visited by the collector, in order.
    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.page_count
    }

    pub fn headers_path(&self) -> &Path {
        &self.headers_path
    }
}

fn path_or_env(overridden: &Option<PathBuf>, key: &str) -> Option<PathBuf> {
    overridden
        .clone()
        .or_else(|| env::var(key).ok().map(PathBuf::from))
}

fn parse_env<T: FromStr>(key: &str, field: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field,
                reason: format!("'{}': {}", raw, e),
            }),
        Err(_) => Ok(None),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("could not read headers file {path}: {source}")]
    HeadersUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("headers file {path} is not a JSON object of strings: {source}")]
    HeadersMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
