//! Bounded exponential backoff
//!
//! `RetryPolicy::run` wraps any fallible async operation. It knows nothing
//! about HTTP; it only asks the error whether another attempt could help.

use crate::config::ScraperConfig;
use crate::pacing::RateLimiter;
use crate::{Result, ScoutError};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry settings applied to a single operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first
    pub max_retries: u32,

    /// Delay before the first retry; doubled for each later one
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ScraperConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.max_retries, config.retry_base_delay())
    }

    /// Backoff before the retry that follows failed attempt `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Runs `operation` until it succeeds or the policy gives up
    ///
    /// When a limiter is supplied a slot is acquired before every attempt,
    /// retries included. Errors that report themselves as non-retryable are
    /// returned as-is straight away. Once `max_retries + 1` attempts have
    /// failed, the last error comes back wrapped in
    /// [`ScoutError::RetriesExhausted`] tagged with `context`.
    pub async fn run<T, F, Fut>(
        &self,
        context: &str,
        limiter: Option<&RateLimiter>,
        mut operation: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let total_attempts = self.max_retries + 1;
        let mut attempt = 0;

        loop {
            if let Some(limiter) = limiter {
                limiter.acquire().await;
            }

            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                tracing::debug!("{}: not retrying after {}", context, err);
                return Err(err);
            }

            if attempt >= self.max_retries {
                tracing::error!("{}: all {} attempts failed", context, total_attempts);
                return Err(ScoutError::RetriesExhausted {
                    context: context.to_string(),
                    attempts: total_attempts,
                    source: Box::new(err),
                });
            }

            let delay = self.delay_for(attempt);
            tracing::warn!(
                "{}: attempt {}/{} failed: {}. Retrying in {:?}",
                context,
                attempt + 1,
                total_attempts,
                err,
                delay
            );
            sleep(delay).await;
            attempt += 1;
        }
    }
}
