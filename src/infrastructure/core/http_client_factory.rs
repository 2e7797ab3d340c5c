use crate::config::HttpEnvConfig;
use crate::domain::errors::ScrapeError;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use url::{Url, form_urlencoded};

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP session with a cookie jar and retry middleware.
    pub fn create_client(config: &HttpEnvConfig) -> Result<ClientWithMiddleware> {
        // Retry policy:
        // - Exponential backoff
        // - Transient errors only (5xx, 429, connection failures)
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(5)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build())
    }
}

/// Helper function to build a URL with query parameters.
/// reqwest-middleware's RequestBuilder has no `.query()`, so the query string
/// is appended to the URL here. Existing query pairs are kept.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> Result<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(base_url).with_context(|| format!("Invalid URL: {}", base_url))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k.as_ref(), v.as_ref());
        }
    }
    Ok(url.into())
}

/// Form-encode a single value for embedding in a request body.
pub(crate) fn form_encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Map a non-2xx response status to [`ScrapeError::HttpStatus`].
pub fn check_status(url: &str, status: StatusCode) -> Result<(), ScrapeError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ScrapeError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}
