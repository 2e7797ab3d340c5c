//! Configuration module for ftse-reports.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Site endpoints, Reports, and HTTP.

mod http_config;
mod report_config;
mod site_config;

pub use http_config::HttpEnvConfig;
pub use report_config::ReportEnvConfig;
pub use site_config::{SiteEnvConfig, SourceKind};

use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub site: SiteEnvConfig,
    pub report: ReportEnvConfig,
    pub http: HttpEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let site = SiteEnvConfig::from_env().context("Failed to load site config")?;
        let report = ReportEnvConfig::from_env().context("Failed to load report config")?;
        let http = HttpEnvConfig::from_env().context("Failed to load http config")?;

        Ok(Self { site, report, http })
    }
}
