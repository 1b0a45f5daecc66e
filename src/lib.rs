//! Sole-Scout: a concurrent sneaker price comparison engine
//!
//! This crate fans a product search out to several independent retailer sites,
//! normalizes every listing into a common [`Product`] record, and returns the
//! combined result set ordered by price. Each retailer is reached through a
//! shared session layer that rotates browser headers, replays cookies, paces
//! requests and classifies bot-detection responses.

pub mod aggregator;
pub mod config;
pub mod output;
pub mod pacing;
pub mod session;
pub mod sources;
pub mod url;

use thiserror::Error;

/// Main error type for Sole-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Access forbidden (likely bot block) for {url}")]
    Forbidden { url: String },

    #[error("Page not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Bot challenge detected at {url} (marker: {marker})")]
    BotDetected { url: String, marker: String },

    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("All {attempts} attempts failed for {context}: {source}")]
    RetriesExhausted {
        context: String,
        attempts: u32,
        #[source]
        source: Box<ScoutError>,
    },

    #[error("Failed to fetch product details from {url}: {source}")]
    DetailFetch {
        url: String,
        #[source]
        source: Box<ScoutError>,
    },

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Query enhancement failed: {0}")]
    Enhancement(String),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),
}

impl ScoutError {
    /// Whether repeating the same request could plausibly succeed
    ///
    /// Missing pages, challenge pages and parse failures are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotFound { .. }
            | Self::BotDetected { .. }
            | Self::Parse { .. }
            | Self::UnknownSource(_)
            | Self::Config(_)
            | Self::Url(_) => false,
            Self::RetriesExhausted { source, .. } | Self::DetailFetch { source, .. } => {
                source.is_retryable()
            }
            _ => true,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sole-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use aggregator::{PriceComparison, Scout};
pub use config::Config;
pub use session::SessionManager;
pub use sources::{clean_price, Product, SearchRequest, SourceAdapter, Store};
pub use url::clean_url;
