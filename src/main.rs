//! Sole-Scout main entry point
//!
//! This is the command-line interface for the Sole-Scout price comparison engine.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sole_scout::aggregator::{PassthroughEnhancer, PriceComparison, Scout};
use sole_scout::config::{load_config_with_hash, Config};
use sole_scout::output::{print_statistics, render_json, render_table, SearchStatistics};
use sole_scout::{Product, Store};
use tracing_subscriber::EnvFilter;

/// Sole-Scout: compare sneaker prices across retailers
///
/// Searches Nike, Foot Locker, Finish Line and Dick's Sporting Goods
/// concurrently and prints every listing found, cheapest first.
#[derive(Parser, Debug)]
#[command(name = "sole-scout")]
#[command(version = "1.0.0")]
#[command(about = "Compare sneaker prices across retailers", long_about = None)]
struct Cli {
    /// What to search for, e.g. "Air Jordan 1"
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    query: Vec<String>,

    /// Shoe size to look for
    #[arg(long)]
    size: Option<String>,

    /// Preferred colorway
    #[arg(long)]
    color: Option<String>,

    /// Comma-separated stores to search (default: all)
    #[arg(long, value_delimiter = ',')]
    sources: Vec<String>,

    /// Fetch full product pages for the N cheapest results
    #[arg(long, value_name = "N")]
    details: Option<usize>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let sources = parse_sources(&cli.sources)?;
    let query = cli.query.join(" ");

    let comparison = PriceComparison::from_config(&config)?;
    let (searched, mut products) = if sources.is_empty() {
        let scout = Scout::new(comparison, Arc::new(PassthroughEnhancer));
        let _cycle = scout.comparison().cycle();
        let outcome = scout
            .search(&query, cli.size.as_deref(), cli.color.as_deref())
            .await;
        let products = with_details(scout.comparison(), outcome.products, cli.details).await;
        (outcome.sources, products)
    } else {
        let _cycle = comparison.cycle();
        let products = comparison
            .compare(&query, cli.size.as_deref(), cli.color.as_deref(), &sources)
            .await;
        let products = with_details(&comparison, products, cli.details).await;
        (sources, products)
    };

    sole_scout::aggregator::sort_by_price(&mut products);

    if cli.json {
        println!("{}", render_json(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        println!("No listings found for '{}'", query);
    } else {
        print!("{}", render_table(&products));
    }
    println!();
    print_statistics(&SearchStatistics::collect(&products, &searched));

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sole_scout=info,warn"),
            1 => EnvFilter::new("sole_scout=debug,info"),
            2 => EnvFilter::new("sole_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_sources(names: &[String]) -> anyhow::Result<Vec<Store>> {
    let mut stores = Vec::new();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        match Store::from_name(name) {
            Some(store) if !stores.contains(&store) => stores.push(store),
            Some(_) => {}
            None => bail!(
                "Unknown source '{}' (expected one of: nike, foot-locker, finish-line, dicks)",
                name
            ),
        }
    }
    Ok(stores)
}

/// Replaces the `limit` cheapest listings with their detail-page versions
///
/// Listings whose detail fetch fails are kept as they were.
async fn with_details(
    comparison: &PriceComparison,
    products: Vec<Product>,
    limit: Option<usize>,
) -> Vec<Product> {
    let limit = match limit {
        Some(n) if n > 0 => n.min(products.len()),
        _ => return products,
    };

    tracing::info!("Fetching details for {} listings", limit);
    let details = comparison.get_product_details(&products[..limit]).await;

    let mut enriched = Vec::with_capacity(products.len());
    for product in products.iter().take(limit) {
        let detailed = details
            .iter()
            .find(|d| d.url == product.url && d.store == product.store);
        enriched.push(detailed.cloned().unwrap_or_else(|| product.clone()));
    }
    enriched.extend(products.into_iter().skip(limit));
    enriched
}
