//! HTTP session layer shared by every retailer adapter
//!
//! This module owns all outbound traffic:
//! - One persistent client (connection pool + cookie jar) per domain
//! - Browser-plausible header rotation with a per-domain referer
//! - Randomized pacing before every request
//! - Classification of 403/404 responses and bot-challenge pages
//! - Deterministic teardown at the end of a search cycle

mod headers;
mod manager;

pub use headers::{browser_headers, detect_bot_challenge, USER_AGENTS};
pub use manager::{DomainSession, SessionManager, SessionScope};
