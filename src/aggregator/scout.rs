//! End-to-end search pipeline with graceful degradation

use crate::aggregator::compare::PriceComparison;
use crate::aggregator::enhance::{ProductDescriptor, QueryEnhancer};
use crate::sources::{Product, SearchRequest, Store};
use std::sync::Arc;

/// Result of a full search, with what the pipeline decided along the way
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// How the enhancer read the request (raw text when it failed)
    pub descriptor: ProductDescriptor,

    /// Stores that were searched, in the order they were chosen
    pub sources: Vec<Store>,

    /// Results ordered by price
    pub products: Vec<Product>,
}

/// Runs searches through a query enhancer before comparing prices
pub struct Scout {
    comparison: PriceComparison,
    enhancer: Arc<dyn QueryEnhancer>,
}

impl Scout {
    pub fn new(comparison: PriceComparison, enhancer: Arc<dyn QueryEnhancer>) -> Self {
        Self {
            comparison,
            enhancer,
        }
    }

    pub fn comparison(&self) -> &PriceComparison {
        &self.comparison
    }

    /// Searches for free-text input
    ///
    /// # Flow
    ///
    /// 1. Identify the product; on failure use the raw text as its name
    /// 2. Pick sources; on failure, or if none are recognized, use every store
    /// 3. Rewrite the query per source; on failure use the normalized name
    /// 4. Compare prices across the chosen sources
    ///
    /// Enhancer failures are logged and never abort the search.
    pub async fn search(
        &self,
        raw: &str,
        size: Option<&str>,
        color: Option<&str>,
    ) -> SearchOutcome {
        let descriptor = match self.enhancer.identify(raw).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                tracing::warn!("Could not identify product, using raw query: {}", e);
                ProductDescriptor::from_raw(raw)
            }
        };

        let sources = self.choose_sources(&descriptor).await;

        let mut plan = Vec::with_capacity(sources.len());
        for &store in &sources {
            let query = match self
                .enhancer
                .optimize_query(&descriptor.normalized_name, store)
                .await
            {
                Ok(query) if !query.trim().is_empty() => query,
                Ok(_) => descriptor.normalized_name.clone(),
                Err(e) => {
                    tracing::warn!("{}: query optimization failed, using '{}': {}", store, descriptor.normalized_name, e);
                    descriptor.normalized_name.clone()
                }
            };
            tracing::debug!("{}: searching for '{}'", store, query);

            let request = SearchRequest::new(query)
                .with_size(size.map(str::to_string))
                .with_color(color.map(str::to_string));
            plan.push((store, request));
        }

        let products = self.comparison.compare_planned(plan).await;

        SearchOutcome {
            descriptor,
            sources,
            products,
        }
    }

    async fn choose_sources(&self, descriptor: &ProductDescriptor) -> Vec<Store> {
        let available = self.comparison.stores();

        let suggested = match self.enhancer.suggest_sources(descriptor).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Could not get source suggestions, searching all: {}", e);
                return available;
            }
        };

        let mut chosen = Vec::new();
        for name in &suggested {
            match Store::from_name(name) {
                Some(store) if available.contains(&store) && !chosen.contains(&store) => {
                    chosen.push(store)
                }
                Some(_) => {}
                None => tracing::debug!("Ignoring unknown source suggestion '{}'", name),
            }
        }

        if chosen.is_empty() {
            tracing::info!("No usable source suggestions, searching all configured sources");
            return available;
        }

        chosen
    }
}
