//! Configuration module for Sole-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so a missing or empty file yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use sole_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Retries per request: {}", config.scraper.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ScraperConfig, DEFAULT_CALLS_PER_MINUTE};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
