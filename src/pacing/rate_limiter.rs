//! Rolling-window rate limiting
//!
//! Each source gets its own limiter, so one saturated retailer never delays
//! requests to another. Waiters on the same limiter are served in arrival
//! order because the window lock is held across the suspension.

use crate::config::Config;
use crate::sources::Store;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Length of the trailing window calls are counted over
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Bounds call frequency for a single source
#[derive(Debug)]
pub struct RateLimiter {
    /// Source name (for logging)
    name: String,

    /// Maximum calls allowed within `RATE_WINDOW`
    calls_per_minute: u32,

    /// Timestamps of calls still inside the window, oldest first
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter with an empty window
    ///
    /// A ceiling of zero is treated as one; config validation rejects it anyway.
    pub fn new(name: impl Into<String>, calls_per_minute: u32) -> Self {
        let calls_per_minute = calls_per_minute.max(1);
        Self {
            name: name.into(),
            calls_per_minute,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn calls_per_minute(&self) -> u32 {
        self.calls_per_minute
    }

    /// Waits until one more call fits in the window, then records it
    ///
    /// Only the calling task is suspended; the wait is `60s - (now - oldest)`
    /// when the window is full.
    pub async fn acquire(&self) {
        let mut calls = self.calls.lock().await;
        let now = Instant::now();
        Self::prune(&mut calls, now);

        if calls.len() >= self.calls_per_minute as usize {
            if let Some(&oldest) = calls.front() {
                let wait = RATE_WINDOW.saturating_sub(now.duration_since(oldest));
                if !wait.is_zero() {
                    tracing::info!(
                        "{}: rate limit reached, waiting {:.2} seconds",
                        self.name,
                        wait.as_secs_f64()
                    );
                    sleep(wait).await;
                }
            }
            Self::prune(&mut calls, Instant::now());
        }

        calls.push_back(Instant::now());
    }

    /// Number of calls currently counted against the window
    pub async fn in_window(&self) -> usize {
        let mut calls = self.calls.lock().await;
        Self::prune(&mut calls, Instant::now());
        calls.len()
    }

    fn prune(calls: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = calls.front() {
            if now.duration_since(oldest) >= RATE_WINDOW {
                calls.pop_front();
            } else {
                break;
            }
        }
    }
}

/// One limiter per source, built once from configuration
#[derive(Debug, Clone)]
pub struct RateLimiters {
    limiters: HashMap<Store, Arc<RateLimiter>>,
}

impl RateLimiters {
    /// Builds a limiter for every known source using its configured ceiling
    pub fn from_config(config: &Config) -> Self {
        let limiters = Store::ALL
            .iter()
            .map(|&store| {
                let limiter = RateLimiter::new(store.label(), config.calls_per_minute(store));
                (store, Arc::new(limiter))
            })
            .collect();
        Self { limiters }
    }

    /// Returns the limiter for a source
    pub fn get(&self, store: Store) -> Arc<RateLimiter> {
        match self.limiters.get(&store) {
            Some(limiter) => limiter.clone(),
            // Every store is registered by from_config
            None => Arc::new(RateLimiter::new(
                store.label(),
                crate::config::DEFAULT_CALLS_PER_MINUTE,
            )),
        }
    }

    /// Acquires a slot on the given source's limiter
    pub async fn acquire(&self, store: Store) {
        self.get(store).acquire().await;
    }
}
