use crate::domain::ports::{DocumentFetcher, FetchedPage};
use crate::infrastructure::core::check_status;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;

/// Plain GET access to the exchange website over a shared HTTP session.
pub struct LseWebClient {
    client: ClientWithMiddleware,
}

impl LseWebClient {
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for LseWebClient {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        let final_url = response.url().to_string();
        check_status(&final_url, status)?;

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;
        debug!("LseWebClient: {} -> {} ({} bytes)", url, final_url, body.len());

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }
}
