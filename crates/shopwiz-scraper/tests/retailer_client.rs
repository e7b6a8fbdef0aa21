//! Integration tests for `RetailerClient::fetch_html`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use std::collections::BTreeMap;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopwiz_scraper::client::build_search_url;
use shopwiz_scraper::{RetailerClient, ScraperError};

/// 5-second timeout, descriptive UA, no retries.
fn test_client() -> RetailerClient {
    RetailerClient::new(5, "shopwiz-test/0.1", 0, 0).expect("failed to build test RetailerClient")
}

fn test_client_with_retries(max_retries: u32) -> RetailerClient {
    RetailerClient::new(5, "shopwiz-test/0.1", max_retries, 0)
        .expect("failed to build test RetailerClient")
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_html_returns_body_and_sends_configured_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groceries/en-IE/search"))
        .and(query_param("query", "milk"))
        .and(header("cookie", "session=abc"))
        .and(header("user-agent", "shopwiz-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut extra = BTreeMap::new();
    extra.insert("cookie".to_owned(), "session=abc".to_owned());
    let headers = RetailerClient::request_headers(&server.uri(), &extra).unwrap();
    let url = build_search_url(&server.uri(), "/groceries/en-IE/search", &[("query", "milk")])
        .unwrap();

    let body = test_client().fetch_html(&url, &headers).await.unwrap();
    assert_eq!(body, "<html>ok</html>");
}

// ---------------------------------------------------------------------------
// Status mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_html_maps_403_to_blocked() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let url = format!("{}/results", server.uri());
    let err = test_client()
        .fetch_html(&url, &Default::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::Blocked { ref url, .. } if url.ends_with("/results")),
        "expected Blocked, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_html_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = test_client()
        .fetch_html(&url, &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn fetch_html_maps_429_to_rate_limited_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let url = format!("{}/search", server.uri());
    let err = test_client()
        .fetch_html(&url, &Default::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::RateLimited { retry_after_secs: 7, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_html_maps_other_status_to_unexpected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/search", server.uri());
    let err = test_client_with_retries(2)
        .fetch_html(&url, &Default::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 503, .. }),
        "got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Retry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_html_retries_rate_limit_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>second</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/search", server.uri());
    let body = test_client_with_retries(1)
        .fetch_html(&url, &Default::default())
        .await
        .unwrap();
    assert_eq!(body, "<html>second</html>");
}

#[tokio::test]
async fn fetch_html_does_not_retry_blocked() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/search", server.uri());
    let result = test_client_with_retries(3)
        .fetch_html(&url, &Default::default())
        .await;
    assert!(matches!(result, Err(ScraperError::Blocked { .. })));
}
