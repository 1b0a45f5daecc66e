use serde::Serialize;
use std::fmt;

/// The fixed set of retailers Sole-Scout knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Store {
    #[serde(rename = "Nike")]
    Nike,
    #[serde(rename = "Foot Locker")]
    FootLocker,
    #[serde(rename = "Finish Line")]
    FinishLine,
    #[serde(rename = "Dick's Sporting Goods")]
    Dicks,
}

impl Store {
    /// Every store, in the default search order
    pub const ALL: [Store; 4] = [
        Store::Nike,
        Store::FootLocker,
        Store::FinishLine,
        Store::Dicks,
    ];

    /// Stable identifier used in configuration and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Self::Nike => "nike",
            Self::FootLocker => "foot-locker",
            Self::FinishLine => "finish-line",
            Self::Dicks => "dicks",
        }
    }

    /// Human-readable store name carried on every product record
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nike => "Nike",
            Self::FootLocker => "Foot Locker",
            Self::FinishLine => "Finish Line",
            Self::Dicks => "Dick's Sporting Goods",
        }
    }

    /// Production site root
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Nike => "https://www.nike.com",
            Self::FootLocker => "https://www.footlocker.com",
            Self::FinishLine => "https://www.finishline.com",
            Self::Dicks => "https://www.dickssportinggoods.com",
        }
    }

    /// Resolves a store from its key or label
    ///
    /// Matching ignores case, spaces and punctuation, so `"Foot Locker"`,
    /// `"foot-locker"` and `"footlocker"` all resolve to the same store.
    pub fn from_name(name: &str) -> Option<Store> {
        let wanted = compact(name);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|store| compact(store.key()) == wanted || compact(store.label()) == wanted)
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn compact(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A single normalized listing
///
/// Produced only by the adapter for `store`; the aggregator reorders and
/// filters records but never edits them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub name: String,

    /// Price in the store's currency; `0.0` means the price could not be read
    pub price: f64,

    /// Absolute URL of the product page
    pub url: String,

    /// Comma-joined list of purchasable sizes, when known
    pub size: Option<String>,

    pub color: Option<String>,

    pub store: Store,

    pub availability: bool,

    pub image_url: Option<String>,
}

impl Product {
    /// Creates an in-stock record with no size, color or image details
    pub fn new(name: impl Into<String>, price: f64, url: impl Into<String>, store: Store) -> Self {
        Self {
            name: name.into(),
            price,
            url: url.into(),
            size: None,
            color: None,
            store,
            availability: true,
            image_url: None,
        }
    }
}

/// What the user asked for, as handed to one adapter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRequest {
    pub query: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            size: None,
            color: None,
        }
    }

    pub fn with_size(mut self, size: Option<String>) -> Self {
        self.size = size.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color.filter(|c| !c.trim().is_empty());
        self
    }

    /// Keyword string sent to a retailer's search box
    ///
    /// Color and size are appended as plain terms unless the query already
    /// mentions them.
    pub fn keywords(&self) -> String {
        let mut keywords = self.query.trim().to_string();
        let lowered = keywords.to_lowercase();

        if let Some(color) = &self.color {
            let color = color.trim();
            if !lowered.contains(&color.to_lowercase()) {
                keywords.push(' ');
                keywords.push_str(color);
            }
        }

        if let Some(size) = &self.size {
            let size = size.trim();
            if !lowered.contains(&format!("size {}", size.to_lowercase())) {
                keywords.push_str(" size ");
                keywords.push_str(size);
            }
        }

        keywords
    }
}
