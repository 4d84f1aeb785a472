//! Structured news feed: the Yahoo Finance search API.

use async_trait::async_trait;
use serde::Deserialize;

use super::{clean_texts, SourceError, TextSource, MAX_TEXTS};
use crate::universe::Entity;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    title: Option<String>,
    headline: Option<String>,
}

/// Article titles from `GET /v1/finance/search?q={symbol}`.
pub struct StructuredFeedSource {
    client: reqwest::Client,
    base_url: String,
}

impl StructuredFeedSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TextSource for StructuredFeedSource {
    fn name(&self) -> &'static str {
        "structured_feed"
    }

    fn priority(&self) -> u8 {
        10
    }

    async fn fetch(&self, entity: &Entity) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/v1/finance/search", self.base_url);
        let count = MAX_TEXTS.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("q", entity.symbol.as_str()), ("newsCount", count.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        // Some payloads carry `headline` instead of `title`.
        let texts = clean_texts(
            body.news
                .into_iter()
                .take(MAX_TEXTS)
                .filter_map(|item| item.title.or(item.headline)),
        );

        if texts.is_empty() {
            return Err(SourceError::Empty);
        }

        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "count": 3,
            "news": [
                { "uuid": "1", "title": "Apple beats estimates" },
                { "uuid": "2", "headline": "Apple unveils new chip" },
                { "uuid": "3" }
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let titles: Vec<String> = parsed
            .news
            .into_iter()
            .filter_map(|item| item.title.or(item.headline))
            .collect();
        assert_eq!(titles, vec!["Apple beats estimates", "Apple unveils new chip"]);
    }

    #[test]
    fn test_missing_news_field() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"quotes": []}"#).unwrap();
        assert!(parsed.news.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let source = StructuredFeedSource::with_base_url(reqwest::Client::new(), "http://x/");
        assert_eq!(source.base_url, "http://x");
        assert_eq!(source.name(), "structured_feed");
    }
}
