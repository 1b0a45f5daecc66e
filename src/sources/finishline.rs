//! Finish Line (finishline.com)

use crate::sources::product::Store;
use crate::sources::retailer::{DetailSelectors, ListingSelectors, SiteProfile, StockRule};

pub static PROFILE: SiteProfile = SiteProfile {
    store: Store::FinishLine,
    search_path: "/store/search",
    query_param: "query",
    listing: ListingSelectors {
        card: "div.product-card",
        name: "div.product-name",
        price: "span.product-price",
        link: "a.product-link",
        image: "img.product-image",
    },
    detail: DetailSelectors {
        name: "h1.product-title",
        price: "span.current-price",
        sizes: "div.size-selector button[data-available='true']",
        color: "span.selected-color",
        stock: StockRule::AnySize,
    },
};
