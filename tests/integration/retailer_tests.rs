//! Site adapters against a mock retailer

use crate::fast_config;
use sole_scout::pacing::{RateLimiter, RetryPolicy};
use sole_scout::sources::nike;
use sole_scout::sources::retailer::Retailer;
use sole_scout::{ScoutError, SearchRequest, SessionManager, SourceAdapter, Store};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"
<html><body>
  <div class="product-card">
    <a href="/t/air-jordan-1-mid-shoes/DQ8426-061"><img src="/img/aj1-mid.png"></a>
    <h3 class="product-name">Air Jordan 1 Mid</h3>
    <div class="product-price">$125.00</div>
  </div>
  <div class="product-card">
    <a href="/t/air-jordan-1-low-shoes/553558-161"></a>
    <h3 class="product-name">Air Jordan 1 Low</h3>
    <div class="product-price">$110.00</div>
  </div>
  <div class="product-card">
    <h3 class="product-name">Card Without Link</h3>
    <div class="product-price">$99.00</div>
  </div>
</body></html>
"#;

const DETAIL: &str = r#"
<html><body>
  <h1 class="product-name">Air Jordan 1 Mid</h1>
  <div class="product-price">$125.00</div>
  <div class="color-description">Black/White</div>
  <div class="size-option">9</div>
  <div class="size-option disabled">9.5</div>
  <div class="size-option">10</div>
</body></html>
"#;

fn nike_adapter(server: &MockServer, retry: RetryPolicy) -> Retailer {
    let session = Arc::new(SessionManager::new(&fast_config()));
    let limiter = Arc::new(RateLimiter::new("nike", 60));
    Retailer::with_base_url(&nike::PROFILE, &server.uri(), session, limiter, retry).unwrap()
}

#[tokio::test]
async fn test_search_parses_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w"))
        .and(query_param("q", "Air Jordan 1 size 10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
        .expect(1)
        .mount(&mock_server)
        .await;

    let adapter = nike_adapter(&mock_server, RetryPolicy::new(0, Duration::ZERO));
    let request = SearchRequest::new("Air Jordan 1").with_size(Some("10".to_string()));
    let products = adapter.search(&request).await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Air Jordan 1 Mid");
    assert_eq!(products[0].price, 125.0);
    assert_eq!(products[0].store, Store::Nike);
    assert_eq!(
        products[0].url,
        format!("{}/t/air-jordan-1-mid-shoes/DQ8426-061", mock_server.uri())
    );
    assert_eq!(
        products[0].image_url.as_deref(),
        Some(format!("{}/img/aj1-mid.png", mock_server.uri()).as_str())
    );
    assert_eq!(products[1].image_url, None);
    assert!(adapter.handles(&products[0].url));
}

#[tokio::test]
async fn test_search_retries_transient_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
        .mount(&mock_server)
        .await;

    let adapter = nike_adapter(&mock_server, RetryPolicy::new(2, Duration::from_millis(10)));
    let products = adapter.search(&SearchRequest::new("jordan")).await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_failure_yields_empty_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let adapter = nike_adapter(&mock_server, RetryPolicy::new(1, Duration::from_millis(10)));
    let products = adapter.search(&SearchRequest::new("jordan")).await.unwrap();

    assert!(products.is_empty());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_challenge_page_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Verify you are human"))
        .mount(&mock_server)
        .await;

    let adapter = nike_adapter(&mock_server, RetryPolicy::new(3, Duration::from_millis(10)));
    let products = adapter.search(&SearchRequest::new("jordan")).await.unwrap();

    assert!(products.is_empty());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/t/air-jordan-1-mid-shoes/DQ8426-061"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL))
        .mount(&mock_server)
        .await;

    let adapter = nike_adapter(&mock_server, RetryPolicy::new(0, Duration::ZERO));
    let url = format!("{}/t/air-jordan-1-mid-shoes/DQ8426-061", mock_server.uri());
    let product = adapter.get_details(&url).await.unwrap();

    assert_eq!(product.name, "Air Jordan 1 Mid");
    assert_eq!(product.price, 125.0);
    assert_eq!(product.size.as_deref(), Some("9,10"));
    assert_eq!(product.color.as_deref(), Some("Black/White"));
    assert!(product.availability);
    assert_eq!(product.url, url);
}

#[tokio::test]
async fn test_get_details_missing_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let adapter = nike_adapter(&mock_server, RetryPolicy::new(3, Duration::from_millis(10)));
    let url = format!("{}/t/discontinued", mock_server.uri());
    let err = adapter.get_details(&url).await.unwrap_err();

    match err {
        ScoutError::DetailFetch { source, .. } => {
            assert!(matches!(*source, ScoutError::NotFound { .. }))
        }
        other => panic!("expected detail fetch error, got {:?}", other),
    }
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}
