use crate::config::types::{Config, ScraperConfig};
use crate::sources::Store;
use crate::ConfigError;
use std::collections::HashMap;

/// Upper bound on retries; beyond this the backoff alone runs for hours
const MAX_RETRIES_LIMIT: u32 = 10;

/// Upper bound on a per-source ceiling (one call per millisecond)
const MAX_CALLS_PER_MINUTE: u32 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_rate_limits(&config.rate_limits)?;
    Ok(())
}

/// Validates request behaviour settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES_LIMIT, config.max_retries
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.min_request_delay_ms > config.max_request_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_request_delay_ms ({}) must not exceed max_request_delay_ms ({})",
            config.min_request_delay_ms, config.max_request_delay_ms
        )));
    }

    Ok(())
}

/// Validates per-source rate ceilings
fn validate_rate_limits(limits: &HashMap<String, u32>) -> Result<(), ConfigError> {
    let mut seen: HashMap<Store, &str> = HashMap::new();

    for (name, limit) in limits {
        let Some(store) = Store::from_name(name) else {
            return Err(ConfigError::Validation(format!(
                "rate limit configured for unknown source '{}'",
                name
            )));
        };

        if let Some(previous) = seen.insert(store, name) {
            return Err(ConfigError::Validation(format!(
                "rate limit for {} configured twice ('{}' and '{}')",
                store, previous, name
            )));
        }

        if *limit < 1 {
            return Err(ConfigError::Validation(format!(
                "rate limit for '{}' must be >= 1 call per minute, got {}",
                name, limit
            )));
        }

        if *limit > MAX_CALLS_PER_MINUTE {
            return Err(ConfigError::Validation(format!(
                "rate limit for '{}' must be <= {} calls per minute, got {}",
                name, MAX_CALLS_PER_MINUTE, limit
            )));
        }
    }

    Ok(())
}
