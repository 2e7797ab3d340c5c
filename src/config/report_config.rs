//! Report configuration parsing from environment variables.
//!
//! Output location, report sizes and the thresholds checked on scraped data.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ReportEnvConfig {
    pub reports_dir: PathBuf,
    pub top_n: usize,
    /// Minimum market cap, in pounds
    pub market_cap_threshold: Decimal,
    /// Multiplier from the displayed market cap cell to pounds (cells are £m)
    pub market_cap_unit: Decimal,
    pub history_years: u32,
    pub page_size: u32,
    pub max_pages: u32,
}

impl Default for ReportEnvConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            top_n: 10,
            market_cap_threshold: Decimal::from(7_000_000),
            market_cap_unit: Decimal::from(1_000_000),
            history_years: 20,
            page_size: 20,
            max_pages: 20,
        }
    }
}

impl ReportEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            reports_dir: env::var("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.reports_dir),
            top_n: Self::parse_usize("TOP_N", defaults.top_n)?,
            market_cap_threshold: Self::parse_decimal(
                "MARKET_CAP_THRESHOLD",
                defaults.market_cap_threshold,
            )?,
            market_cap_unit: Self::parse_decimal("MARKET_CAP_UNIT", defaults.market_cap_unit)?,
            history_years: Self::parse_u32("HISTORY_YEARS", defaults.history_years)?,
            page_size: Self::parse_u32("PAGE_SIZE", defaults.page_size)?,
            max_pages: Self::parse_u32("MAX_PAGES", defaults.max_pages)?,
        })
    }

    fn parse_usize(key: &str, default: usize) -> Result<usize> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<usize>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_u32(key: &str, default: u32) -> Result<u32> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<u32>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_decimal(key: &str, default: Decimal) -> Result<Decimal> {
        match env::var(key) {
            Ok(v) => Decimal::from_str(v.trim()).context(format!("Failed to parse {}", key)),
            Err(_) => Ok(default),
        }
    }
}
