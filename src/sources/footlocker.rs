//! Foot Locker (footlocker.com)

use crate::sources::product::Store;
use crate::sources::retailer::{DetailSelectors, ListingSelectors, SiteProfile, StockRule};

pub static PROFILE: SiteProfile = SiteProfile {
    store: Store::FootLocker,
    search_path: "/search",
    query_param: "query",
    listing: ListingSelectors {
        card: "div.ProductCard",
        name: "span.ProductName",
        price: "span.ProductPrice",
        link: "a",
        image: "img",
    },
    detail: DetailSelectors {
        name: "h1.ProductName",
        price: "span.ProductPrice",
        sizes: "div.SizeContainer button[aria-disabled='false']",
        color: "span.ProductColor",
        stock: StockRule::Marker("span.OutOfStock"),
    },
};
