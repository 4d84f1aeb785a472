//! Integration tests for the network text strategies and chain failover.
//!
//! Each strategy is pointed at a local mock server standing in for the
//! upstream news endpoints.

use std::sync::Arc;

use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zero_sentiment::sources::{
    http_client, HtmlScrapeSource, RssFeedSource, SourceChain, SourceError, StructuredFeedSource,
    TextSource,
};
use zero_sentiment::Entity;

fn apple() -> Entity {
    Entity::new("AAPL", "Apple Inc.")
}

fn client() -> reqwest::Client {
    http_client(5).unwrap()
}

const RSS_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>AAPL headlines</title>
    <link>https://example.com</link>
    <description>News</description>
    <item><title>Apple shares climb after upbeat guidance</title></item>
    <item><title>Apple faces antitrust inquiry in Europe</title></item>
  </channel>
</rss>"#;

const NEWS_PAGE: &str = r#"<html><body>
  <h3>Apple supplier warns on quarterly shipments</h3>
  <h3>Short</h3>
  <h3>Analysts lift Apple price target ahead of launch</h3>
</body></html>"#;

// ============================================================================
// Structured Feed
// ============================================================================

#[tokio::test]
async fn test_structured_feed_titles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/finance/search"))
        .and(query_param("q", "AAPL"))
        .and(query_param("newsCount", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "news": [
                { "title": "Apple beats estimates" },
                { "headline": "Apple unveils new chip" },
                { "uuid": "no-title" }
            ]
        })))
        .mount(&server)
        .await;

    let source = StructuredFeedSource::with_base_url(client(), server.uri());
    let texts = source.fetch(&apple()).await.unwrap();

    assert_eq!(texts, vec!["Apple beats estimates", "Apple unveils new chip"]);
}

#[tokio::test]
async fn test_structured_feed_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/finance/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let source = StructuredFeedSource::with_base_url(client(), server.uri());
    let err = source.fetch(&apple()).await.unwrap_err();

    assert!(matches!(err, SourceError::Status(429)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_structured_feed_empty_news() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/finance/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "news": [] })))
        .mount(&server)
        .await;

    let source = StructuredFeedSource::with_base_url(client(), server.uri());
    let err = source.fetch(&apple()).await.unwrap_err();
    assert!(matches!(err, SourceError::Empty));
}

// ============================================================================
// RSS Feed
// ============================================================================

#[tokio::test]
async fn test_rss_feed_titles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/2.0/headline"))
        .and(query_param("s", "AAPL"))
        .and(query_param("region", "US"))
        .and(query_param("lang", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSS_BODY))
        .mount(&server)
        .await;

    let source = RssFeedSource::with_base_url(client(), server.uri());
    let texts = source.fetch(&apple()).await.unwrap();

    assert_eq!(
        texts,
        vec![
            "Apple shares climb after upbeat guidance",
            "Apple faces antitrust inquiry in Europe"
        ]
    );
}

#[tokio::test]
async fn test_rss_feed_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/2.0/headline"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not xml at all"))
        .mount(&server)
        .await;

    let source = RssFeedSource::with_base_url(client(), server.uri());
    let err = source.fetch(&apple()).await.unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)));
    assert!(!err.is_transport());
}

// ============================================================================
// HTML Scrape
// ============================================================================

#[tokio::test]
async fn test_html_scrape_headlines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/AAPL/news"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NEWS_PAGE))
        .mount(&server)
        .await;

    let source = HtmlScrapeSource::with_base_url(client(), server.uri());
    let texts = source.fetch(&apple()).await.unwrap();

    assert_eq!(
        texts,
        vec![
            "Apple supplier warns on quarterly shipments",
            "Analysts lift Apple price target ahead of launch"
        ]
    );
}

#[tokio::test]
async fn test_html_scrape_no_headlines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/AAPL/news"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let source = HtmlScrapeSource::with_base_url(client(), server.uri());
    let err = source.fetch(&apple()).await.unwrap_err();
    assert!(matches!(err, SourceError::Empty));
}

// ============================================================================
// Chain Failover
// ============================================================================

#[tokio::test]
async fn test_chain_falls_back_to_rss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/finance/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rss/2.0/headline"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSS_BODY))
        .mount(&server)
        .await;

    let chain = SourceChain::new(vec![
        Arc::new(StructuredFeedSource::with_base_url(client(), server.uri())) as Arc<dyn TextSource>,
        Arc::new(RssFeedSource::with_base_url(client(), server.uri())),
        Arc::new(HtmlScrapeSource::with_base_url(client(), server.uri())),
    ]);

    let batch = chain.acquire(&apple()).await;
    assert_eq!(batch.source, "rss_feed");
    assert!(batch.network);
    assert_eq!(batch.texts.len(), 2);

    let stats = chain.stats().await;
    assert_eq!(stats[0].name, "structured_feed");
    assert_eq!(stats[0].failures, 1);
    assert_eq!(stats[0].last_error.as_deref(), Some("HTTP status 503"));
    assert_eq!(stats[1].successes, 1);
    // The scrape strategy was never reached.
    assert_eq!(stats[2].attempts, 0);
}

#[tokio::test]
async fn test_chain_all_network_failures_use_synthetic() {
    // Nothing mounted: every request gets a 404.
    let server = MockServer::start().await;

    let chain = SourceChain::new(vec![
        Arc::new(StructuredFeedSource::with_base_url(client(), server.uri())) as Arc<dyn TextSource>,
        Arc::new(RssFeedSource::with_base_url(client(), server.uri())),
        Arc::new(HtmlScrapeSource::with_base_url(client(), server.uri())),
    ]);

    let batch = chain.acquire(&apple()).await;
    assert_eq!(batch.source, "synthetic");
    assert!(!batch.network);
    assert_eq!(batch.texts.len(), 3);
    assert!(batch.texts.iter().all(|t| !t.is_empty()));

    let stats = chain.stats().await;
    assert_eq!(stats.len(), 4);
    assert!(stats[..3].iter().all(|s| s.failures == 1 && s.successes == 0));
    assert_eq!(stats[3].name, "synthetic");
    assert_eq!(stats[3].successes, 1);
}
