//! HTTP client configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpEnvConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for HttpEnvConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_retries: 3,
            user_agent: format!("ftse-reports/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            timeout: Duration::from_secs(Self::parse_u64(
                "HTTP_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
            connect_timeout: Duration::from_secs(Self::parse_u64(
                "HTTP_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )?),
            max_retries: env::var("HTTP_MAX_RETRIES")
                .unwrap_or_else(|_| defaults.max_retries.to_string())
                .parse::<u32>()
                .context("Failed to parse HTTP_MAX_RETRIES")?,
            user_agent: env::var("HTTP_USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }

    fn parse_u64(key: &str, default: u64) -> Result<u64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u64>()
            .context(format!("Failed to parse {}", key))
    }
}
