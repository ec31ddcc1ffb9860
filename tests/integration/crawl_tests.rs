//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, robots.txt included.

use topical_crawler::config::{Config, CrawlerConfig, UserAgentConfig};
use topical_crawler::crawler::{crawl, Coordinator};
use topical_crawler::CrawlPhase;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short delays
fn create_test_config(max_pages: usize, respect_robots: bool) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages,
            max_concurrent_fetches: 4,
            politeness_delay_ms: 10, // Very short for testing
            fetch_timeout_secs: 5,
            respect_robots,
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: Some("https://example.com/contact".to_string()),
            contact_email: Some("test@example.com".to_string()),
        },
        transliteration: None,
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

/// Mounts a small site:
///
/// - `/` mentions the query and links to page1, page2 and private
/// - `/page1/` mentions the query
/// - `/page2/` links back home
/// - robots.txt disallows `/private`
async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<h1>Breaking Story</h1>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="/private">Private</a>
            <a href="mailto:editor@example.com">Mail</a>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1/"))
        .respond_with(html("<p>Another breaking   story today</p>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2/"))
        .respond_with(html(r#"<p>Weather</p><a href="/">Home</a>"#))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_respects_robots() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    Mock::given(method("GET"))
        .and(path("/private/"))
        .respond_with(html("<p>breaking story</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(10, true);
    let summary = crawl(config, &server.uri(), "news", "breaking story")
        .await
        .expect("crawl failed");

    assert_eq!(summary.pages_crawled, 3);
    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.fetch_failures, 0);
    assert_eq!(summary.disallowed, 1);
    // Seed, page1, page2 and private
    assert_eq!(summary.distinct_urls, 4);

    let mut relevant = summary.relevant_pages.clone();
    relevant.sort();
    assert_eq!(
        relevant,
        vec![
            format!("{}/", server.uri()),
            format!("{}/page1/", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_ignoring_robots_fetches_everything() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    Mock::given(method("GET"))
        .and(path("/private/"))
        .respond_with(html("<p>nothing</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(10, false);
    let summary = crawl(config, &server.uri(), "news", "breaking story")
        .await
        .expect("crawl failed");

    assert_eq!(summary.pages_crawled, 4);
    assert_eq!(summary.disallowed, 0);
}

#[tokio::test]
async fn test_single_page_limit() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let config = create_test_config(1, true);
    let mut coordinator =
        Coordinator::with_http(config, &server.uri(), "news", "breaking story").unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(coordinator.phase(), CrawlPhase::Done);
    assert_eq!(summary.pages_crawled, 1);
    assert_eq!(summary.relevant_count(), 1);
    // The seed plus the three http links it exposes
    assert_eq!(summary.distinct_urls, 4);
}

#[tokio::test]
async fn test_unreachable_seed_completes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(5, true);
    let summary = crawl(config, &server.uri(), "news", "breaking story")
        .await
        .expect("crawl failed");

    assert_eq!(summary.pages_crawled, 1);
    assert_eq!(summary.pages_fetched, 0);
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(summary.relevant_count(), 0);
    assert_eq!(summary.distinct_urls, 1);
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let config = create_test_config(5, true);
    let result = crawl(config, "ftp://files.example.com/", "news", "breaking story").await;
    assert!(result.is_err());
}
