//! Integration tests for Sole-Scout
//!
//! These tests use wiremock to stand in for retailer sites and exercise the
//! session layer, the site adapters and the full comparison cycle.

mod compare_tests;
mod retailer_tests;
mod session_tests;

use sole_scout::config::ScraperConfig;

/// Scraper settings with no pacing and fast retries
pub fn fast_config() -> ScraperConfig {
    ScraperConfig {
        max_retries: 2,
        retry_base_delay_ms: 10,
        request_timeout_secs: 5,
        connect_timeout_secs: 2,
        min_request_delay_ms: 0,
        max_request_delay_ms: 0,
    }
}
