//! Retailer adapters
//!
//! This module defines the scraping contract every source implements and the
//! four built-in retailers:
//! - `product`: the normalized `Product` record, `Store` and `SearchRequest`
//! - `price`: price text cleaning shared by all adapters
//! - `retailer`: the selector-driven engine behind the built-in adapters
//! - `nike`, `footlocker`, `finishline`, `dicks`: per-site profiles

pub mod dicks;
pub mod finishline;
pub mod footlocker;
pub mod nike;
mod price;
mod product;
pub mod retailer;

pub use price::clean_price;
pub use product::{Product, SearchRequest, Store};
pub use retailer::{Retailer, SiteProfile};

use crate::config::Config;
use crate::pacing::{RateLimiters, RetryPolicy};
use crate::session::SessionManager;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The scraping contract for one retailer
///
/// Implementations must only ever emit records whose `store` is their own.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// The store this adapter produces records for
    fn store(&self) -> Store;

    /// Site root without a trailing slash, e.g. `https://www.nike.com`
    fn base_url(&self) -> &str;

    /// Searches the retailer and returns whatever listings could be parsed
    ///
    /// Built-in adapters recover from fetch and parse failures themselves and
    /// return an empty list; an `Err` is still tolerated by the aggregator.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Product>>;

    /// Fetches one product page with sizes, color and availability filled in
    async fn get_details(&self, url: &str) -> Result<Product>;

    /// Whether a product URL belongs to this retailer
    fn handles(&self, url: &str) -> bool {
        url.contains(self.base_url())
    }
}

/// Returns the built-in profile for a store
pub fn profile_for(store: Store) -> &'static SiteProfile {
    match store {
        Store::Nike => &nike::PROFILE,
        Store::FootLocker => &footlocker::PROFILE,
        Store::FinishLine => &finishline::PROFILE,
        Store::Dicks => &dicks::PROFILE,
    }
}

/// Builds one adapter per known store, sharing a single session manager
///
/// Each adapter gets its own rate limiter from the configured ceilings.
pub fn build_adapters(
    config: &Config,
    session: Arc<SessionManager>,
) -> Result<Vec<Arc<dyn SourceAdapter>>> {
    let limiters = RateLimiters::from_config(config);
    let retry = RetryPolicy::from_config(&config.scraper);

    Store::ALL
        .iter()
        .map(|&store| {
            let adapter = Retailer::new(
                profile_for(store),
                session.clone(),
                limiters.get(store),
                retry,
            )?;
            Ok(Arc::new(adapter) as Arc<dyn SourceAdapter>)
        })
        .collect()
}
