//! Website and API endpoint configuration parsed from environment variables.
//!
//! Defaults point at the public London Stock Exchange pages and the Refinitiv
//! widgets time-series API used by the site's charts.

use anyhow::Result;
use std::env;
use std::str::FromStr;

/// Where constituent rows are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Server-rendered HTML table pages
    Html,
    /// JSON components refresh API behind the table
    Api,
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(SourceKind::Html),
            "api" => Ok(SourceKind::Api),
            _ => anyhow::bail!("Invalid CONSTITUENT_SOURCE: {}. Must be 'html' or 'api'", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteEnvConfig {
    pub homepage_url: String,
    pub constituents_url: String,
    pub constituents_table_url: String,
    pub refresh_api_url: String,
    pub refresh_path: String,
    pub refresh_parameters: String,
    pub refresh_component_id: String,
    pub historical_api_url: String,
    pub historical_ric: String,
    pub source: SourceKind,
}

impl Default for SiteEnvConfig {
    fn default() -> Self {
        Self {
            homepage_url: "https://www.londonstockexchange.com/".to_string(),
            constituents_url: "https://www.londonstockexchange.com/indices/ftse-100/constituents"
                .to_string(),
            constituents_table_url:
                "https://www.londonstockexchange.com/indices/ftse-100/constituents/table"
                    .to_string(),
            refresh_api_url: "https://api.londonstockexchange.com/api/v1/components/refresh"
                .to_string(),
            refresh_path: "ftse-constituents".to_string(),
            refresh_parameters: "indexname=ftse-100&tab=table".to_string(),
            refresh_component_id: "block_content:afe540a2-2a0c-46af-8497-407dc4c7fd71"
                .to_string(),
            historical_api_url:
                "https://refinitiv-widgets.financial.com/rest/api/timeseries/historical"
                    .to_string(),
            historical_ric: ".FTSE".to_string(),
            source: SourceKind::Html,
        }
    }
}

impl SiteEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let source = match env::var("CONSTITUENT_SOURCE") {
            Ok(v) => SourceKind::from_str(&v)?,
            Err(_) => defaults.source,
        };

        Ok(Self {
            homepage_url: env::var("LSE_HOMEPAGE_URL").unwrap_or(defaults.homepage_url),
            constituents_url: env::var("LSE_CONSTITUENTS_URL")
                .unwrap_or(defaults.constituents_url),
            constituents_table_url: env::var("LSE_CONSTITUENTS_TABLE_URL")
                .unwrap_or(defaults.constituents_table_url),
            refresh_api_url: env::var("LSE_REFRESH_API_URL").unwrap_or(defaults.refresh_api_url),
            refresh_path: env::var("LSE_REFRESH_PATH").unwrap_or(defaults.refresh_path),
            refresh_parameters: env::var("LSE_REFRESH_PARAMETERS")
                .unwrap_or(defaults.refresh_parameters),
            refresh_component_id: env::var("LSE_REFRESH_COMPONENT_ID")
                .unwrap_or(defaults.refresh_component_id),
            historical_api_url: env::var("HISTORICAL_API_URL")
                .unwrap_or(defaults.historical_api_url),
            historical_ric: env::var("HISTORICAL_RIC").unwrap_or(defaults.historical_ric),
            source,
        })
    }
}
