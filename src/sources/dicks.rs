//! Dick's Sporting Goods (dickssportinggoods.com)

use crate::sources::product::Store;
use crate::sources::retailer::{DetailSelectors, ListingSelectors, SiteProfile, StockRule};

pub static PROFILE: SiteProfile = SiteProfile {
    store: Store::Dicks,
    search_path: "/search",
    query_param: "query",
    listing: ListingSelectors {
        card: "div.product-card",
        name: "a.product-card-title",
        price: "span.product-price",
        link: "a.product-card-title",
        image: "img.product-image",
    },
    detail: DetailSelectors {
        name: "h1.product-title",
        price: "span.price-value",
        sizes: "div.size-selector button[data-disabled='false']",
        color: "span.color-label",
        stock: StockRule::Marker("div.out-of-stock"),
    },
};
