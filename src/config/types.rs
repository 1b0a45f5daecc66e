use crate::sources::Store;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Rate ceiling applied to any source without an explicit entry
pub const DEFAULT_CALLS_PER_MINUTE: u32 = 60;

/// Main configuration structure for Sole-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Calls per minute, keyed by source key (e.g. `foot-locker`)
    #[serde(rename = "rate-limits", default)]
    pub rate_limits: HashMap<String, u32>,
}

impl Config {
    /// Returns the configured ceiling for a source, falling back to the default
    pub fn calls_per_minute(&self, store: Store) -> u32 {
        self.rate_limits
            .iter()
            .find(|(name, _)| Store::from_name(name) == Some(store))
            .map(|(_, limit)| *limit)
            .unwrap_or(DEFAULT_CALLS_PER_MINUTE)
    }
}

/// Request behaviour shared by every source
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Additional attempts after the first failed one
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds, doubled per attempt
    #[serde(rename = "retry-base-delay-ms")]
    pub retry_base_delay_ms: u64,

    /// Overall request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Lower bound of the randomized delay before each request (milliseconds)
    #[serde(rename = "min-request-delay-ms")]
    pub min_request_delay_ms: u64,

    /// Upper bound of the randomized delay before each request (milliseconds)
    #[serde(rename = "max-request-delay-ms")]
    pub max_request_delay_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_base_delay_ms: 2000,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            min_request_delay_ms: 500,
            max_request_delay_ms: 2000,
        }
    }
}

impl ScraperConfig {
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
