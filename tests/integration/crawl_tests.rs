//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use scopecrawl::config::{load_config, Config};
use scopecrawl::crawler::{crawl, CrawlOutcome, CrawlerBuilder};
use scopecrawl::FrontierState;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration tuned for fast local runs
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.threads = 3;
    config.crawler.idle_timeout_ms = 100;
    config.crawler.max_run_secs = 30;
    config.crawler.shutdown_grace_ms = 500;
    config.fetcher.timeout_ms = 2000;
    config.fetcher.max_attempts = 3;
    config.fetcher.retry_delay_ms = 50;
    config.fetcher.user_agent = "TestBot/1.0".to_string();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">Page 1</a><a href="/page2">Page 2</a>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<a href="/">Home</a><a href="/page2#top">Page 2</a>"#,
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        r#"<a href="page1">Page 1</a><a href="https://elsewhere.example/">Away</a>"#,
        1,
    )
    .await;

    let seed = format!("{}/", base_url);
    let report = crawl(create_test_config(), &seed)
        .await
        .expect("Crawl failed")
        .expect("Seed should be in scope");

    assert_eq!(report.total(), 3, "visited: {:?}", report.visited);
    assert!(report.visited.contains(&seed));
    assert!(report.visited.contains(&format!("{}/page1", base_url)));
    assert!(report.visited.contains(&format!("{}/page2", base_url)));
    assert!(!report.visited.iter().any(|a| a.contains("elsewhere")));
    assert_eq!(report.stats.fetched, 3);
    assert!(report.stats.out_of_scope >= 1);
}

#[tokio::test]
async fn test_links_on_error_pages_are_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/missing">Missing</a>"#, 1).await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"<html><body><a href="/hidden">Hidden</a></body></html>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/hidden", "", 0).await;

    let seed = format!("{}/", base_url);
    let report = crawl(create_test_config(), &seed)
        .await
        .expect("Crawl failed")
        .expect("Seed should be in scope");

    assert_eq!(report.total(), 2);
    assert!(report.visited.contains(&format!("{}/missing", base_url)));
    assert!(!report.visited.contains(&format!("{}/hidden", base_url)));
}

#[tokio::test]
async fn test_transient_failures_are_retried_once_per_address() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // First two requests hang past the client timeout
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html("").set_delay(Duration::from_secs(2)))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/flaky", r#"<a href="/child">Child</a>"#, 1).await;
    mount_page(&mock_server, "/child", "", 1).await;

    let mut config = create_test_config();
    config.fetcher.timeout_ms = 300;

    let seed = format!("{}/flaky", base_url);
    let report = crawl(config, &seed)
        .await
        .expect("Crawl failed")
        .expect("Seed should be in scope");

    assert_eq!(report.total(), 2);
    assert_eq!(report.stats.fetched, 2);
    assert_eq!(report.stats.fetch_failures, 0);
}

#[tokio::test]
async fn test_exhausted_retries_mark_address_visited() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/slow">Slow</a>"#, 1).await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("").set_delay(Duration::from_secs(2)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config();
    config.fetcher.timeout_ms = 200;
    config.fetcher.max_attempts = 2;

    let seed = format!("{}/", base_url);
    let report = crawl(config, &seed)
        .await
        .expect("Crawl failed")
        .expect("Seed should be in scope");

    assert!(report.visited.contains(&format!("{}/slow", base_url)));
    assert_eq!(report.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_out_of_scope_seed_is_not_crawled() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "", 0).await;

    let mut config = create_test_config();
    config.scope.domain = Some("teya.com".to_string());

    let controller = CrawlerBuilder::new(config)
        .build(&format!("{}/", mock_server.uri()))
        .expect("Failed to build controller");

    let outcome = controller
        .begin_crawl(&format!("{}/", mock_server.uri()))
        .await;

    assert_eq!(outcome, CrawlOutcome::SeedRejected);
    assert!(controller.visited_uris().is_empty());
    assert_eq!(controller.frontier().state(), FrontierState::Idle);
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/about">About</a>"#, 1).await;
    mount_page(&mock_server, "/about", r#"<a href="/">Home</a>"#, 1).await;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[crawler]
threads = 2
idle-timeout-ms = 100
max-run-secs = 30

[fetcher]
timeout-ms = 2000
max-attempts = 1
user-agent = "TestBot/1.0"
"#,
    )
    .unwrap();
    file.flush().unwrap();

    let config = load_config(file.path()).expect("Failed to load config");
    let report = crawl(config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed")
        .expect("Seed should be in scope");

    assert_eq!(report.total(), 2);
}
