//! Shared scraping engine behind every retailer adapter
//!
//! A retailer is described by a [`SiteProfile`]: where its search page
//! lives and which CSS selectors pick product data out of its listing and
//! product pages. [`Retailer`] turns a profile into a [`SourceAdapter`] that
//! fetches through the session layer under the source's rate limiter and
//! retry policy.

use crate::pacing::{RateLimiter, RetryPolicy};
use crate::session::SessionManager;
use crate::sources::price::clean_price;
use crate::sources::product::{Product, SearchRequest, Store};
use crate::sources::SourceAdapter;
use crate::url::resolve_link;
use crate::{Result, ScoutError};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use url::Url;

/// Selectors for one card on a search results page
#[derive(Debug, Clone, Copy)]
pub struct ListingSelectors {
    /// Container element of a single result
    pub card: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    /// Element carrying the product page `href`
    pub link: &'static str,
    pub image: &'static str,
}

/// How a product page signals that it cannot be bought
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockRule {
    /// Out of stock when this selector matches
    Marker(&'static str),
    /// In stock while at least one size is purchasable
    AnySize,
}

/// Selectors for a single product page
#[derive(Debug, Clone, Copy)]
pub struct DetailSelectors {
    pub name: &'static str,
    pub price: &'static str,
    /// Matches each purchasable size option
    pub sizes: &'static str,
    pub color: &'static str,
    pub stock: StockRule,
}

/// Everything that differs between retailers
#[derive(Debug, Clone, Copy)]
pub struct SiteProfile {
    pub store: Store,
    /// Path of the search page, relative to the site root
    pub search_path: &'static str,
    /// Query parameter that carries the keywords
    pub query_param: &'static str,
    pub listing: ListingSelectors,
    pub detail: DetailSelectors,
}

impl SiteProfile {
    /// Builds the search URL for a request against the given site root
    pub fn search_url(&self, base_url: &Url, request: &SearchRequest) -> Result<Url> {
        let mut url = base_url
            .join(self.search_path)
            .map_err(|e| crate::UrlError::Parse(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair(self.query_param, &request.keywords());
        Ok(url)
    }
}

/// A [`SourceAdapter`] driven by a [`SiteProfile`]
pub struct Retailer {
    profile: &'static SiteProfile,
    base_url: Url,
    base_str: String,
    session: Arc<SessionManager>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl Retailer {
    /// Creates an adapter pointed at the store's production site
    pub fn new(
        profile: &'static SiteProfile,
        session: Arc<SessionManager>,
        limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        Self::with_base_url(profile, profile.store.base_url(), session, limiter, retry)
    }

    /// Creates an adapter pointed at an alternate site root (mirrors, test servers)
    pub fn with_base_url(
        profile: &'static SiteProfile,
        base_url: &str,
        session: Arc<SessionManager>,
        limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| crate::UrlError::Parse(e.to_string()))?;
        let base_str = base_url.as_str().trim_end_matches('/').to_string();
        Ok(Self {
            profile,
            base_url,
            base_str,
            session,
            limiter,
            retry,
        })
    }

    pub fn profile(&self) -> &'static SiteProfile {
        self.profile
    }

    /// Fetches a page under this source's limiter and retry policy
    async fn fetch(&self, url: &str) -> Result<String> {
        let session = &*self.session;
        self.retry
            .run(url, Some(&*self.limiter), move || session.fetch(url))
            .await
    }
}

#[async_trait]
impl SourceAdapter for Retailer {
    fn store(&self) -> Store {
        self.profile.store
    }

    fn base_url(&self) -> &str {
        &self.base_str
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Product>> {
        let store = self.profile.store;
        let url = match self.profile.search_url(&self.base_url, request) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("{}: could not build search URL: {}", store, e);
                return Ok(Vec::new());
            }
        };

        let body = match self.fetch(url.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("{}: search failed: {}", store, e);
                return Ok(Vec::new());
            }
        };

        match parse_listing(&body, &url, self.profile) {
            Ok(products) => {
                tracing::info!("{}: {} result(s) for '{}'", store, products.len(), request.query);
                Ok(products)
            }
            Err(e) => {
                tracing::warn!("{}: could not parse results page: {}", store, e);
                Ok(Vec::new())
            }
        }
    }

    async fn get_details(&self, url: &str) -> Result<Product> {
        let detail = async {
            let body = self.fetch(url).await?;
            parse_detail(&body, url, self.profile)
        };

        detail.await.map_err(|source| ScoutError::DetailFetch {
            url: url.to_string(),
            source: Box::new(source),
        })
    }
}

/// Parses a search results page into product records
///
/// Cards missing a name, price or link are skipped; only an unusable
/// selector fails the whole page.
pub fn parse_listing(html: &str, page_url: &Url, profile: &SiteProfile) -> Result<Vec<Product>> {
    let selectors = &profile.listing;
    let card_sel = compile(selectors.card, page_url.as_str())?;
    let name_sel = compile(selectors.name, page_url.as_str())?;
    let price_sel = compile(selectors.price, page_url.as_str())?;
    let link_sel = compile(selectors.link, page_url.as_str())?;
    let image_sel = compile(selectors.image, page_url.as_str())?;

    let document = Html::parse_document(html);
    let mut products = Vec::new();

    for element in document.select(&card_sel) {
        let parsed = (|| -> std::result::Result<Product, &'static str> {
            let name = element
                .select(&name_sel)
                .next()
                .map(text_of)
                .filter(|n| !n.is_empty())
                .ok_or("missing name")?;
            let price = element
                .select(&price_sel)
                .next()
                .map(|p| clean_price(&text_of(p)))
                .ok_or("missing price")?;
            let url = element
                .select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve_link(href, page_url))
                .ok_or("missing link")?;
            let image_url = element
                .select(&image_sel)
                .next()
                .and_then(|img| img.value().attr("src").or_else(|| img.value().attr("data-src")))
                .and_then(|src| resolve_link(src, page_url));

            let mut product = Product::new(name, price, url, profile.store);
            product.image_url = image_url;
            Ok(product)
        })();

        match parsed {
            Ok(product) => products.push(product),
            Err(reason) => tracing::debug!("{}: skipping result card ({})", profile.store, reason),
        }
    }

    Ok(products)
}

/// Parses a product page into a fully detailed record
pub fn parse_detail(html: &str, url: &str, profile: &SiteProfile) -> Result<Product> {
    let selectors = &profile.detail;
    let document = Html::parse_document(html);

    let name = first_text(&document, selectors.name, url)?
        .filter(|n| !n.is_empty())
        .ok_or_else(|| parse_error(url, "product name not found"))?;
    let price = first_text(&document, selectors.price, url)?
        .map(|p| clean_price(&p))
        .ok_or_else(|| parse_error(url, "product price not found"))?;

    let size_selector = compile(selectors.sizes, url)?;
    let sizes: Vec<String> = document
        .select(&size_selector)
        .map(text_of)
        .filter(|s| !s.is_empty())
        .collect();

    let color = first_text(&document, selectors.color, url)?.filter(|c| !c.is_empty());

    let availability = match selectors.stock {
        StockRule::Marker(marker) => {
            let marker = compile(marker, url)?;
            document.select(&marker).next().is_none()
        }
        StockRule::AnySize => !sizes.is_empty(),
    };

    let mut product = Product::new(name, price, url, profile.store);
    product.size = (!sizes.is_empty()).then(|| sizes.join(","));
    product.color = color;
    product.availability = availability;
    Ok(product)
}

fn compile(selector: &str, url: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| parse_error(url, &format!("invalid selector '{}': {:?}", selector, e)))
}

fn first_text(document: &Html, selector: &str, url: &str) -> Result<Option<String>> {
    let selector = compile(selector, url)?;
    Ok(document.select(&selector).next().map(text_of))
}

/// Element text with whitespace runs collapsed
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_error(url: &str, message: &str) -> ScoutError {
    ScoutError::Parse {
        url: url.to_string(),
        message: message.to_string(),
    }
}
