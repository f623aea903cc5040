//! Runtime configuration read once at startup from the environment (and an optional `.env` file).
//!
//! A missing API key is never an error: the corresponding source is simply treated as
//! unavailable and its adapter always serves synthetic data.

use crate::api::DEFAULT_RADIUS_METERS;
use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const DEFAULT_SATELLITE_URL: &str = "https://api.nasa.gov/tempo/latest";
const DEFAULT_OPENAQ_URL: &str = "https://api.openaq.org/v3";
const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_FALLBACK_COUNTRY: &str = "IN";

/// Endpoint and credential of a single live source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

/// Everything the service needs to reach its live sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub satellite: SourceConfig,
    pub openaq: SourceConfig,
    pub openweather: SourceConfig,
    pub request_timeout: Duration,
    pub radius_meters: u32,
    pub fallback_country: String,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let source = |url_key: &str, key_key: &str, default_url: &str| SourceConfig {
            base_url: get(url_key)
                .unwrap_or_else(|| default_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: get(key_key),
        };

        let timeout_secs = parse_number(get("AIRCAST_TIMEOUT_SECS"), "AIRCAST_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "AIRCAST_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        let config = Self {
            satellite: source("NASA_API_URL", "NASA_API_KEY", DEFAULT_SATELLITE_URL),
            openaq: source("OPENAQ_API_URL", "OPENAQ_KEY", DEFAULT_OPENAQ_URL),
            openweather: source(
                "OPENWEATHER_API_URL",
                "OPENWEATHER_API_KEY",
                DEFAULT_OPENWEATHER_URL,
            ),
            request_timeout: Duration::from_secs(timeout_secs),
            radius_meters: parse_number(get("AIRCAST_RADIUS_METERS"), "AIRCAST_RADIUS_METERS")?
                .unwrap_or(DEFAULT_RADIUS_METERS),
            fallback_country: get("AIRCAST_FALLBACK_COUNTRY")
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| DEFAULT_FALLBACK_COUNTRY.to_string()),
            log_dir: get("AIRCAST_LOG_DIR").map(PathBuf::from),
        };

        debug!(
            satellite_key = config.satellite.api_key.is_some(),
            openaq_key = config.openaq.api_key.is_some(),
            openweather_key = config.openweather.api_key.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            satellite: SourceConfig {
                base_url: DEFAULT_SATELLITE_URL.to_string(),
                api_key: None,
            },
            openaq: SourceConfig {
                base_url: DEFAULT_OPENAQ_URL.to_string(),
                api_key: None,
            },
            openweather: SourceConfig {
                base_url: DEFAULT_OPENWEATHER_URL.to_string(),
                api_key: None,
            },
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            radius_meters: DEFAULT_RADIUS_METERS,
            fallback_country: DEFAULT_FALLBACK_COUNTRY.to_string(),
            log_dir: None,
        }
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<String>, key: &str) -> Result<Option<T>> {
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| AppError::Config(format!("{} must be a positive integer, got '{}'", key, v)))
        })
        .transpose()
}
