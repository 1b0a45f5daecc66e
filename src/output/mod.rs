//! Output module for rendering search results
//!
//! This module handles:
//! - Rendering price-ordered results as a terminal table
//! - Exporting results as JSON
//! - Summarizing results per store

pub mod stats;

pub use stats::{print_statistics, SearchStatistics, StoreSummary};

use crate::sources::Product;

const NAME_WIDTH: usize = 48;

/// Renders products as a fixed-width table, in the order given
pub fn render_table(products: &[Product]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>9}  {:<12}  {:<width$}  {:<8}  {}\n",
        "PRICE",
        "STORE",
        "NAME",
        "STOCK",
        "URL",
        width = NAME_WIDTH
    ));

    for product in products {
        let price = if product.price > 0.0 {
            format!("${:.2}", product.price)
        } else {
            "n/a".to_string()
        };
        let stock = if product.availability { "yes" } else { "no" };

        out.push_str(&format!(
            "{:>9}  {:<12}  {:<width$}  {:<8}  {}\n",
            price,
            product.store.label(),
            truncate(&product.name, NAME_WIDTH),
            stock,
            product.url,
            width = NAME_WIDTH
        ));
    }

    out
}

/// Renders products as a pretty-printed JSON array
pub fn render_json(products: &[Product]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(products)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
