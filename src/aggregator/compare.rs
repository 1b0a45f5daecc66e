//! Concurrent price comparison across sources

use crate::config::Config;
use crate::session::{SessionManager, SessionScope};
use crate::sources::{build_adapters, Product, SearchRequest, SourceAdapter, Store};
use crate::Result;
use futures::future::join_all;
use std::sync::Arc;

/// Fans searches out to retailer adapters and merges what comes back
pub struct PriceComparison {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    session: Arc<SessionManager>,
}

impl PriceComparison {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, session: Arc<SessionManager>) -> Self {
        Self { adapters, session }
    }

    /// Builds the comparison with every built-in retailer
    pub fn from_config(config: &Config) -> Result<Self> {
        let session = Arc::new(SessionManager::new(&config.scraper));
        let adapters = build_adapters(config, session.clone())?;
        Ok(Self::new(adapters, session))
    }

    pub fn adapters(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.adapters
    }

    /// Stores that have an adapter, in registration order
    pub fn stores(&self) -> Vec<Store> {
        self.adapters.iter().map(|a| a.store()).collect()
    }

    pub fn adapter_for(&self, store: Store) -> Option<&Arc<dyn SourceAdapter>> {
        self.adapters.iter().find(|a| a.store() == store)
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Opens a search cycle spanning several calls
    ///
    /// While the returned guard lives, a search and the detail pass that
    /// follows it share sessions (and cookies) per retailer.
    pub fn cycle(&self) -> SessionScope<'_> {
        self.session.scope()
    }

    /// Searches every active source for the same query and returns the
    /// combined results ordered by price
    ///
    /// Never fails: a source that errors or panics contributes nothing.
    pub async fn compare(
        &self,
        query: &str,
        size: Option<&str>,
        color: Option<&str>,
        active_sources: &[Store],
    ) -> Vec<Product> {
        let request = SearchRequest::new(query)
            .with_size(size.map(str::to_string))
            .with_color(color.map(str::to_string));

        let plan: Vec<(Store, SearchRequest)> = active_sources
            .iter()
            .map(|&store| (store, request.clone()))
            .collect();

        self.compare_planned(plan).await
    }

    /// Like [`compare`](Self::compare), but with a separate request per source
    ///
    /// # Flow
    ///
    /// 1. Spawn one task per source (duplicates and unknown stores dropped)
    /// 2. Await every task; errors and panics count as zero results
    /// 3. Concatenate in plan order
    /// 4. Stable-sort by price
    ///
    /// Sessions are closed when the call returns unless an enclosing
    /// [`cycle`](Self::cycle) is still open.
    pub async fn compare_planned(&self, plan: Vec<(Store, SearchRequest)>) -> Vec<Product> {
        let _scope = self.session.scope();

        let mut seen = Vec::with_capacity(plan.len());
        let mut tasks = Vec::with_capacity(plan.len());

        for (store, request) in plan {
            if seen.contains(&store) {
                continue;
            }
            seen.push(store);

            let Some(adapter) = self.adapter_for(store).cloned() else {
                tracing::warn!("No adapter registered for {}, skipping", store);
                continue;
            };

            let handle = tokio::spawn(async move { adapter.search(&request).await });
            tasks.push((store, handle));
        }

        let mut products = Vec::new();
        for (store, handle) in tasks {
            match handle.await {
                Ok(Ok(found)) => {
                    let own: Vec<Product> = found
                        .into_iter()
                        .filter(|p| {
                            let matches = p.store == store;
                            if !matches {
                                tracing::warn!(
                                    "{} returned a record labelled {}, dropping it",
                                    store,
                                    p.store
                                );
                            }
                            matches
                        })
                        .collect();
                    tracing::debug!("{}: contributed {} record(s)", store, own.len());
                    products.extend(own);
                }
                Ok(Err(e)) => tracing::warn!("{}: search failed: {}", store, e),
                Err(e) => tracing::error!("{}: search task aborted: {}", store, e),
            }
        }

        sort_by_price(&mut products);
        tracing::info!(
            "Comparison finished: {} record(s) from {} source(s)",
            products.len(),
            seen.len()
        );
        products
    }

    /// Fetches full details for each record from the adapter that owns its URL
    ///
    /// Records with no matching adapter and pages that fail to load are left
    /// out of the result. Output follows input order.
    pub async fn get_product_details(&self, products: &[Product]) -> Vec<Product> {
        let _scope = self.session.scope();

        let lookups = products.iter().filter_map(|product| {
            let adapter = self.adapters.iter().find(|a| a.handles(&product.url));
            if adapter.is_none() {
                tracing::debug!("No adapter handles {}", product.url);
            }
            adapter.map(|adapter| adapter.get_details(&product.url))
        });

        join_all(lookups)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            })
            .collect()
    }
}

/// Stable ascending sort by price; equal prices keep arrival order
pub fn sort_by_price(products: &mut [Product]) {
    products.sort_by(|a, b| a.price.total_cmp(&b.price));
}
