//! Best-effort HTML scrape of the quote news page.
//!
//! Page markup changes without notice, so this strategy is expected to
//! degrade to [`SourceError::Empty`] rather than to be reliable.

use async_trait::async_trait;
use scraper::{Html, Selector};

use super::{SourceError, TextSource, MAX_TEXTS};
use crate::universe::Entity;

const DEFAULT_BASE_URL: &str = "https://finance.yahoo.com";

/// Selectors tried in order until enough candidates accumulate.
const HEADLINE_SELECTORS: &[&str] = &[
    "h3",
    r#"[data-test-locator="headline"]"#,
    r".Mb\(5px\)",
    r#"a[data-test-locator="stream-item-title"]"#,
];

/// Matches examined per selector.
const PER_SELECTOR: usize = 10;

/// Stop trying further selectors once this many candidates are collected.
const ENOUGH: usize = 5;

/// Headline length bounds in characters, both exclusive.
const MIN_LEN: usize = 15;
const MAX_LEN: usize = 200;

/// Extract headline candidates from a news page.
pub fn extract_headlines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut headlines = Vec::new();

    for pattern in HEADLINE_SELECTORS {
        let Ok(selector) = Selector::parse(pattern) else {
            tracing::debug!(selector = pattern, "Skipping unparsable selector");
            continue;
        };

        for element in document.select(&selector).take(PER_SELECTOR) {
            let text = element.text().collect::<String>();
            let text = text.trim();
            let len = text.chars().count();
            if len > MIN_LEN && len < MAX_LEN {
                headlines.push(text.to_string());
            }
        }

        if headlines.len() >= ENOUGH {
            break;
        }
    }

    headlines.truncate(MAX_TEXTS);
    headlines
}

/// Headlines scraped from `GET /quote/{symbol}/news`.
pub struct HtmlScrapeSource {
    client: reqwest::Client,
    base_url: String,
}

impl HtmlScrapeSource {
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
impl TextSource for HtmlScrapeSource {
    fn name(&self) -> &'static str {
        "html_scrape"
    }

    fn priority(&self) -> u8 {
        30
    }

    async fn fetch(&self, entity: &Entity) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/quote/{}/news", self.base_url, entity.symbol);

        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let html = response.text().await?;
        let headlines = extract_headlines(&html);

        if headlines.is_empty() {
            return Err(SourceError::Empty);
        }

        Ok(headlines)
    }
}
