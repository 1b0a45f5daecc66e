//! Request pacing for outbound scraping
//!
//! This module bounds how hard any one retailer is hit:
//! - `RateLimiter`: rolling 60-second window of call timestamps per source
//! - `RateLimiters`: the per-source registry built from configuration
//! - `RetryPolicy`: bounded exponential backoff around any fallible async operation

mod rate_limiter;
mod retry;

pub use rate_limiter::{RateLimiter, RateLimiters, RATE_WINDOW};
pub use retry::RetryPolicy;
