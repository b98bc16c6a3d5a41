use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::app::{Result, StashError};
use crate::config::service_url;
use crate::domain::ArticleRecord;
use crate::extractor::{Extractor, ExtractorConfig};

#[derive(Deserialize)]
struct ServiceError {
    error: String,
}

/// Extracts through a running extraction service (`GET /readability?url=`).
///
/// The service only returns `{url, title, excerpt}`, so the text, HTML and
/// site name of the resulting record are empty. Requests carry the
/// configured user agent and timeout.
pub struct RemoteExtractor {
    client: Client,
    endpoint: Url,
}

impl RemoteExtractor {
    pub fn new(base: &str, config: &ExtractorConfig) -> Result<Self> {
        let endpoint = service_url(base, "readability")?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StashError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Extractor for RemoteExtractor {
    async fn extract(&self, url: &str) -> Result<ArticleRecord> {
        let mut request_url = self.endpoint.clone();
        request_url.query_pairs_mut().append_pair("url", url);

        debug!("Requesting extraction of {} from {}", url, self.endpoint);
        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| StashError::Extraction(format!("extraction service unreachable: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ArticleRecord>()
                .await
                .map_err(|e| StashError::Extraction(format!("bad extraction response: {}", e)));
        }

        let detail = match response.json::<ServiceError>().await {
            Ok(body) => body.error,
            Err(_) => format!("extraction service returned HTTP {}", status),
        };
        Err(StashError::Extraction(detail))
    }
}
