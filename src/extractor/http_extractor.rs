use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::app::{Result, StashError};
use crate::domain::ArticleRecord;
use crate::extractor::{ContentExtractor, Extractor, ExtractorConfig};

/// Fetches a page over HTTP and runs [`ContentExtractor`] on it.
pub struct HtmlExtractor {
    client: Client,
    content: ContentExtractor,
}

impl HtmlExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.clone());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| StashError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            content: ContentExtractor::new(config),
        })
    }

    async fn fetch_html(&self, url: &Url) -> Result<String> {
        let fetch_error = |e: reqwest::Error| StashError::Extraction(format!("fetch {} failed: {}", url, e));

        let response = self.client.get(url.clone()).send().await.map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StashError::Extraction(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("html") {
                return Err(StashError::Extraction(format!(
                    "{} is not an HTML page ({})",
                    url, content_type
                )));
            }
        }

        response.text().await.map_err(fetch_error)
    }
}

#[async_trait]
impl Extractor for HtmlExtractor {
    async fn extract(&self, url: &str) -> Result<ArticleRecord> {
        let base = Url::parse(url)?;

        debug!("Fetching {}", url);
        let html = self.fetch_html(&base).await?;

        let mut article = self.content.extract(&html, &base)?;
        article.url = url.to_string();

        info!(
            "Extracted {} ({} chars of text)",
            url,
            article.text_content.chars().count()
        );
        Ok(article)
    }
}
