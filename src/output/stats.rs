//! Per-store statistics for a result set

use crate::sources::{Product, Store};

/// Summary of one store's results
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub store: Store,

    /// Number of listings returned
    pub count: usize,

    /// Listings that are currently purchasable
    pub in_stock: usize,

    /// Lowest known price, ignoring unreadable (zero) prices
    pub cheapest: Option<f64>,
}

/// Search statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    /// Total number of listings
    pub total: usize,

    /// One entry per searched store, in the order the stores were given
    pub stores: Vec<StoreSummary>,
}

impl SearchStatistics {
    /// Builds statistics for `products` over the stores that were searched
    ///
    /// Stores with no results still get an entry so empty sources show up.
    pub fn collect(products: &[Product], searched: &[Store]) -> Self {
        let stores = searched
            .iter()
            .map(|&store| {
                let listings: Vec<&Product> = products.iter().filter(|p| p.store == store).collect();
                let cheapest = listings
                    .iter()
                    .map(|p| p.price)
                    .filter(|price| *price > 0.0)
                    .min_by(f64::total_cmp);

                StoreSummary {
                    store,
                    count: listings.len(),
                    in_stock: listings.iter().filter(|p| p.availability).count(),
                    cheapest,
                }
            })
            .collect();

        Self {
            total: products.len(),
            stores,
        }
    }

    /// Overall cheapest known price
    pub fn cheapest(&self) -> Option<(Store, f64)> {
        self.stores
            .iter()
            .filter_map(|s| s.cheapest.map(|price| (s.store, price)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &SearchStatistics) {
    println!("=== Search Summary ===\n");
    println!("Total listings: {}", stats.total);
    println!();

    println!("By Store:");
    for summary in &stats.stores {
        match summary.cheapest {
            Some(price) => println!(
                "  {:<12} {:>3} listings ({} in stock), from ${:.2}",
                summary.store.label(),
                summary.count,
                summary.in_stock,
                price
            ),
            None => println!(
                "  {:<12} {:>3} listings",
                summary.store.label(),
                summary.count
            ),
        }
    }
    println!();

    if let Some((store, price)) = stats.cheapest() {
        println!("Best Price: ${:.2} at {}", price, store);
    }
}
