//! Integration tests for the HTTP fetcher
//!
//! These tests use wiremock to create mock HTTP servers and check status
//! handling, retries and the user agent header.

mod common;

use catalog_harvest::crawler::{Fetch, HttpFetcher, Request};
use catalog_harvest::state::Stage;
use catalog_harvest::CrawlError;
use common::create_test_config;
use tempfile::tempdir;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(base_url: &str) -> HttpFetcher {
    let dir = tempdir().unwrap();
    HttpFetcher::new(&create_test_config(base_url, dir.path())).unwrap()
}

fn request(base_url: &str, page: &str) -> Request {
    Request::new(
        Url::parse(&format!("{}{}", base_url, page)).unwrap(),
        Stage::SeedCatalog,
    )
}

#[tokio::test]
async fn test_fetch_success_sends_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/hoodies-c-181.html"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = fetcher(&base_url)
        .fetch(&request(&base_url, "/hoodies-c-181.html"))
        .await
        .unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.body, "<html>ok</html>");
    assert_eq!(page.url.path(), "/hoodies-c-181.html");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/gone.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = fetcher(&base_url)
        .fetch(&request(&base_url, "/gone.html"))
        .await;

    assert!(matches!(result, Err(CrawlError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_server_errors_retried_then_reported() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // One attempt plus two retries
    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let result = fetcher(&base_url)
        .fetch(&request(&base_url, "/flaky.html"))
        .await;

    assert!(matches!(result, Err(CrawlError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_recovers_after_transient_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .mount(&mock_server)
        .await;

    let page = fetcher(&base_url)
        .fetch(&request(&base_url, "/flaky.html"))
        .await
        .unwrap();

    assert_eq!(page.body, "finally");
}

#[tokio::test]
async fn test_render_failure_reported_with_target_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/render.html"))
        .respond_with(ResponseTemplate::new(504))
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let mut config = create_test_config(&base_url, dir.path());
    config.crawler.max_retries = 0;
    config.render = Some(catalog_harvest::config::RenderConfig {
        endpoint: format!("{}/render.html", base_url),
        wait_secs: 1,
    });
    let fetcher = HttpFetcher::new(&config).unwrap();

    let target = format!("{}/hoodies-c-181-page-1.html", base_url);
    let rendered = Request::rendered(Url::parse(&target).unwrap(), Stage::CatalogPage);

    match fetcher.fetch(&rendered).await {
        Err(CrawlError::Render { url, .. }) => assert_eq!(url, target),
        other => panic!("expected render error, got {:?}", other.map(|p| p.status)),
    }
}
