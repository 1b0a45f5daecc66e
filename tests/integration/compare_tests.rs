//! Full comparison cycle across several mock retailers

use crate::fast_config;
use sole_scout::aggregator::{PassthroughEnhancer, PriceComparison, Scout};
use sole_scout::pacing::{RateLimiter, RetryPolicy};
use sole_scout::sources::retailer::{Retailer, SiteProfile};
use sole_scout::sources::{footlocker, nike};
use sole_scout::{SessionManager, SourceAdapter, Store};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NIKE_LISTING: &str = r#"
<div class="product-card">
  <a href="/t/aj1-high"></a>
  <h3 class="product-name">Air Jordan 1 Retro High OG</h3>
  <div class="product-price">$180.00</div>
</div>
<div class="product-card">
  <a href="/t/aj1-mid"></a>
  <h3 class="product-name">Air Jordan 1 Mid</h3>
  <div class="product-price">$125.00</div>
</div>
"#;

const NIKE_DETAIL: &str = r#"
<h1 class="product-name">Air Jordan 1 Mid</h1>
<div class="product-price">$119.99</div>
<div class="size-option disabled">10</div>
"#;

fn adapter(
    profile: &'static SiteProfile,
    server: &MockServer,
    session: &Arc<SessionManager>,
) -> Arc<dyn SourceAdapter> {
    adapter_at(profile, &server.uri(), session)
}

fn adapter_at(
    profile: &'static SiteProfile,
    base_url: &str,
    session: &Arc<SessionManager>,
) -> Arc<dyn SourceAdapter> {
    let limiter = Arc::new(RateLimiter::new(profile.store.key(), 60));
    let retry = RetryPolicy::new(1, Duration::from_millis(10));
    let retailer =
        Retailer::with_base_url(profile, base_url, session.clone(), limiter, retry).unwrap();
    Arc::new(retailer)
}

/// Address of a server that has already shut down
async fn closed_address() -> String {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);
    uri
}

async fn nike_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NIKE_LISTING))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/t/aj1-mid"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NIKE_DETAIL))
        .mount(&server)
        .await;
    server
}

async fn broken_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_failing_source_does_not_affect_others() {
    let nike_mock = nike_server().await;
    let footlocker_mock = broken_server().await;

    let session = Arc::new(SessionManager::new(&fast_config()));
    let comparison = PriceComparison::new(
        vec![
            adapter(&nike::PROFILE, &nike_mock, &session),
            adapter(&footlocker::PROFILE, &footlocker_mock, &session),
        ],
        session.clone(),
    );

    let products = comparison
        .compare(
            "Air Jordan 1",
            Some("10"),
            None,
            &[Store::Nike, Store::FootLocker],
        )
        .await;

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Air Jordan 1 Mid");
    assert_eq!(products[0].price, 125.0);
    assert_eq!(products[1].price, 180.0);
    assert!(products.iter().all(|p| p.store == Store::Nike));

    // Sessions are torn down at the end of the cycle
    assert_eq!(session.open_sessions(), 0);
    assert_eq!(footlocker_mock.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unreachable_source_does_not_affect_others() {
    let nike_mock = nike_server().await;
    let unreachable = closed_address().await;

    let session = Arc::new(SessionManager::new(&fast_config()));
    let comparison = PriceComparison::new(
        vec![
            adapter(&nike::PROFILE, &nike_mock, &session),
            adapter_at(&footlocker::PROFILE, &unreachable, &session),
        ],
        session.clone(),
    );

    let products = comparison
        .compare(
            "Air Jordan 1",
            Some("10"),
            None,
            &[Store::FootLocker, Store::Nike],
        )
        .await;

    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p.store == Store::Nike));
    assert!(products[0].price <= products[1].price);
    assert_eq!(session.open_sessions(), 0);
}

#[tokio::test]
async fn test_cycle_keeps_cookies_from_search_to_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "visitor=abc; Path=/")
                .set_body_string(NIKE_LISTING),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/t/aj1-mid"))
        .and(header("cookie", "visitor=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NIKE_DETAIL))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Arc::new(SessionManager::new(&fast_config()));
    let comparison = PriceComparison::new(
        vec![adapter(&nike::PROFILE, &mock_server, &session)],
        session.clone(),
    );

    let details = {
        let _cycle = comparison.cycle();
        let found = comparison
            .compare("Air Jordan 1", None, None, &[Store::Nike])
            .await;
        assert_eq!(found.len(), 2);
        assert_eq!(session.open_sessions(), 1);

        let mid: Vec<_> = found
            .into_iter()
            .filter(|p| p.url.ends_with("/t/aj1-mid"))
            .collect();
        comparison.get_product_details(&mid).await
    };

    assert_eq!(details.len(), 1);
    assert_eq!(details[0].price, 119.99);
    assert_eq!(session.open_sessions(), 0);
}

#[tokio::test]
async fn test_inactive_sources_are_not_contacted() {
    let nike_mock = nike_server().await;
    let footlocker_mock = broken_server().await;

    let session = Arc::new(SessionManager::new(&fast_config()));
    let comparison = PriceComparison::new(
        vec![
            adapter(&nike::PROFILE, &nike_mock, &session),
            adapter(&footlocker::PROFILE, &footlocker_mock, &session),
        ],
        session,
    );

    let products = comparison
        .compare("Air Jordan 1", None, None, &[Store::Nike])
        .await;

    assert_eq!(products.len(), 2);
    assert!(footlocker_mock.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_details_for_compared_products() {
    let nike_mock = nike_server().await;

    let session = Arc::new(SessionManager::new(&fast_config()));
    let comparison =
        PriceComparison::new(vec![adapter(&nike::PROFILE, &nike_mock, &session)], session);

    let products = comparison
        .compare("Air Jordan 1", None, None, &[Store::Nike])
        .await;
    let details = comparison.get_product_details(&products).await;

    // The high-top detail page is not mounted, so only the mid survives
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].price, 119.99);
    assert_eq!(details[0].size, None);
    assert!(!details[0].availability);
}

#[tokio::test]
async fn test_scout_end_to_end() {
    let nike_mock = nike_server().await;
    let footlocker_mock = broken_server().await;

    let session = Arc::new(SessionManager::new(&fast_config()));
    let comparison = PriceComparison::new(
        vec![
            adapter(&nike::PROFILE, &nike_mock, &session),
            adapter(&footlocker::PROFILE, &footlocker_mock, &session),
        ],
        session,
    );
    let scout = Scout::new(comparison, Arc::new(PassthroughEnhancer));

    let outcome = scout.search("Air Jordan 1", Some("10"), None).await;

    assert_eq!(outcome.sources, vec![Store::Nike, Store::FootLocker]);
    assert_eq!(outcome.products.len(), 2);
    assert!(outcome.products[0].price <= outcome.products[1].price);
}
