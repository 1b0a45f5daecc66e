//! Search orchestration
//!
//! This module contains the code that turns one user search into a single
//! price-ordered result set:
//! - `compare`: concurrent fan-out over the selected adapters, failure
//!   isolation, stable price sort and the optional detail-enrichment pass
//! - `enhance`: the query-enhancement collaborator seam
//! - `scout`: the full pipeline that consults the collaborator and degrades to
//!   the raw query and every source whenever it fails

mod compare;
mod enhance;
mod scout;

pub use compare::{sort_by_price, PriceComparison};
pub use enhance::{PassthroughEnhancer, ProductDescriptor, QueryEnhancer};
pub use scout::{Scout, SearchOutcome};
