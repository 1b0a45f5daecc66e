//! Nike (nike.com)
//!
//! Nike's search lives under `/w?q=`. Product pages list size tiles and grey
//! out the unavailable ones, so a product with no selectable tile is sold out.

use crate::sources::product::Store;
use crate::sources::retailer::{DetailSelectors, ListingSelectors, SiteProfile, StockRule};

pub static PROFILE: SiteProfile = SiteProfile {
    store: Store::Nike,
    search_path: "/w",
    query_param: "q",
    listing: ListingSelectors {
        card: "div.product-card",
        name: ".product-name",
        price: ".product-price",
        link: "a",
        image: "img",
    },
    detail: DetailSelectors {
        name: "h1.product-name",
        price: "div.product-price",
        sizes: "div.size-option:not(.disabled)",
        color: "div.color-description",
        stock: StockRule::AnySize,
    },
};
