//! Session layer against a live mock server

use crate::fast_config;
use sole_scout::{ScoutError, SessionManager};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[tokio::test]
async fn test_fetch_sends_browser_headers() {
    let mock_server = MockServer::start().await;
    let referer = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/w"))
        .and(header_exists("user-agent"))
        .and(header("accept-language", "en-US,en;q=0.5"))
        .and(header("referer", referer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = SessionManager::new(&fast_config());
    let body = session
        .fetch(&format!("{}/w?q=dunk", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "<html>ok</html>");
    assert_eq!(session.open_sessions(), 1);
}

#[tokio::test]
async fn test_cookies_are_replayed_within_a_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "visitor=abc123; Path=/")
                .set_body_string("home"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w"))
        .and(header("cookie", "visitor=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("results"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = SessionManager::new(&fast_config());
    session.fetch(&format!("{}/", mock_server.uri())).await.unwrap();
    let body = session
        .fetch(&format!("{}/w?q=dunk", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, "results");
}

#[tokio::test]
async fn test_closing_sessions_forgets_cookies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "visitor=abc123; Path=/")
                .set_body_string("home"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w"))
        .respond_with(ResponseTemplate::new(200).set_body_string("results"))
        .mount(&mock_server)
        .await;

    let session = SessionManager::new(&fast_config());
    session.fetch(&format!("{}/", mock_server.uri())).await.unwrap();
    assert_eq!(session.close_all(), 1);
    assert_eq!(session.open_sessions(), 0);

    session
        .fetch(&format!("{}/w?q=dunk", mock_server.uri()))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert!(!last
        .headers
        .keys()
        .any(|name| name.as_str().eq_ignore_ascii_case("cookie")));
}

#[tokio::test]
async fn test_tracking_parameters_are_stripped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/t/air-max-90"))
        .and(query_param("color", "black"))
        .respond_with(ResponseTemplate::new(200).set_body_string("product"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = SessionManager::new(&fast_config());
    session
        .fetch(&format!(
            "{}/t/air-max-90?utm_source=mail&color=black&fbclid=xyz&ref=home",
            mock_server.uri()
        ))
        .await
        .unwrap();

    let requests: Vec<Request> = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("color=black"));
}

#[tokio::test]
async fn test_forbidden_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let session = SessionManager::new(&fast_config());
    let err = session
        .fetch(&format!("{}/w?q=dunk", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ScoutError::Forbidden { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_not_found_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let session = SessionManager::new(&fast_config());
    let err = session
        .fetch(&format!("{}/t/gone", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ScoutError::NotFound { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_server_error_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let session = SessionManager::new(&fast_config());
    let err = session
        .fetch(&format!("{}/w", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ScoutError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_captcha_page_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><div id="px-captcha">Press &amp; Hold</div></html>"#),
        )
        .mount(&mock_server)
        .await;

    let session = SessionManager::new(&fast_config());
    let err = session
        .fetch(&format!("{}/w?q=dunk", mock_server.uri()))
        .await
        .unwrap_err();

    match err {
        ScoutError::BotDetected { marker, .. } => assert_eq!(marker, "captcha"),
        other => panic!("expected bot detection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = fast_config();
    config.request_timeout_secs = 1;
    let session = SessionManager::new(&config);
    let err = session
        .fetch(&format!("{}/w", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ScoutError::Timeout { .. }));
}
