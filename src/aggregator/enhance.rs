//! Query-enhancement collaborator
//!
//! A query enhancer maps free text to a product descriptor, picks which
//! stores are worth searching, and rewrites the query for each store. The
//! real implementation is typically a language-model service; Sole-Scout
//! only depends on this trait and treats every call as fallible.

use crate::sources::Store;
use crate::{Result, ScoutError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What the enhancer understood the user to be looking for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDescriptor {
    pub brand: String,
    pub model: String,
    pub normalized_name: String,
    pub suggested_terms: Vec<String>,
}

impl ProductDescriptor {
    /// Descriptor that simply carries the raw text as the product name
    pub fn from_raw(raw: &str) -> Self {
        Self {
            normalized_name: raw.trim().to_string(),
            ..Self::default()
        }
    }

    /// Parses a descriptor from a collaborator's JSON reply
    pub fn from_json(json: &str) -> Result<Self> {
        let descriptor: Self = serde_json::from_str(json)
            .map_err(|e| ScoutError::Enhancement(format!("malformed descriptor: {}", e)))?;
        if descriptor.normalized_name.trim().is_empty() {
            return Err(ScoutError::Enhancement(
                "descriptor has no normalized_name".to_string(),
            ));
        }
        Ok(descriptor)
    }
}

#[async_trait]
pub trait QueryEnhancer: Send + Sync {
    /// Turns raw user text into a normalized descriptor
    async fn identify(&self, raw: &str) -> Result<ProductDescriptor>;

    /// Ranks the stores worth searching for this product, best first
    async fn suggest_sources(&self, descriptor: &ProductDescriptor) -> Result<Vec<String>>;

    /// Rewrites the product name into the search phrasing a store expects
    async fn optimize_query(&self, normalized_name: &str, store: Store) -> Result<String>;
}

/// Enhancer that changes nothing: raw text in, every store out
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughEnhancer;

#[async_trait]
impl QueryEnhancer for PassthroughEnhancer {
    async fn identify(&self, raw: &str) -> Result<ProductDescriptor> {
        Ok(ProductDescriptor::from_raw(raw))
    }

    async fn suggest_sources(&self, _descriptor: &ProductDescriptor) -> Result<Vec<String>> {
        Ok(Store::ALL.iter().map(|s| s.label().to_string()).collect())
    }

    async fn optimize_query(&self, normalized_name: &str, _store: Store) -> Result<String> {
        Ok(normalized_name.to_string())
    }
}
