use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::app::{Result, StashError};
use crate::config::service_url;
use crate::domain::WireBookmark;
use crate::sync::Collector;

/// Collector reached over HTTP: `POST {endpoint}/sync` with a JSON array.
///
/// Any 2xx is an acknowledgment. Otherwise the response body is returned
/// verbatim as the [`StashError::Sync`] detail.
pub struct HttpCollector {
    client: Client,
    endpoint: Url,
}

impl HttpCollector {
    pub fn new(base: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = service_url(base, "sync")?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
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
impl Collector for HttpCollector {
    async fn submit(&self, batch: &[WireBookmark]) -> Result<()> {
        debug!("POST {} ({} bookmarks)", self.endpoint, batch.len());

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(batch)
            .send()
            .await
            .map_err(|e| StashError::Sync(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!("Collector acknowledged with {}", status);
            return Ok(());
        }

        let body = response
            .text()
            .await
            .map_err(|e| StashError::Sync(e.to_string()))?;

        if body.is_empty() {
            Err(StashError::Sync(format!("collector returned HTTP {}", status)))
        } else {
            Err(StashError::Sync(body))
        }
    }
}
