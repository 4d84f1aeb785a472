//! Headline RSS feed keyed by symbol.

use async_trait::async_trait;

use super::{clean_texts, SourceError, TextSource, MAX_TEXTS};
use crate::universe::Entity;

const DEFAULT_BASE_URL: &str = "https://feeds.finance.yahoo.com";

/// Item titles from `GET /rss/2.0/headline?s={symbol}`.
pub struct RssFeedSource {
    client: reqwest::Client,
    base_url: String,
}

impl RssFeedSource {
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

/// Titles of the first [`MAX_TEXTS`] items of an RSS document.
pub fn parse_titles(content: &[u8]) -> Result<Vec<String>, SourceError> {
    let channel =
        rss::Channel::read_from(content).map_err(|e| SourceError::Parse(e.to_string()))?;

    Ok(clean_texts(
        channel
            .items()
            .iter()
            .take(MAX_TEXTS)
            .filter_map(|item| item.title()),
    ))
}

#[async_trait]
impl TextSource for RssFeedSource {
    fn name(&self) -> &'static str {
        "rss_feed"
    }

    fn priority(&self) -> u8 {
        20
    }

    async fn fetch(&self, entity: &Entity) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/rss/2.0/headline", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("s", entity.symbol.as_str()),
                ("region", "US"),
                ("lang", "en-US"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let content = response.bytes().await?;
        let texts = parse_titles(&content)?;

        if texts.is_empty() {
            return Err(SourceError::Empty);
        }

        Ok(texts)
    }
}
