use crate::domain::errors::ScrapeError;
use crate::domain::historical::HistoricalDataPoint;
use crate::domain::ports::HistoricalDataSource;
use crate::infrastructure::core::{build_url_with_query, check_status};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, REFERER};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info};

const FIELDS: &str = "_DATE_END,LOW_1,CLOSE_PRC,HIGH_1,OPEN_PRC";

/// Daily index history from the Refinitiv widgets time-series API
/// (the feed behind the exchange's index charts).
pub struct RefinitivHistoricalClient {
    client: ClientWithMiddleware,
    base_url: String,
    referer: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoricalResponse {
    Wrapped { data: Vec<HistoricalDataPoint> },
    Bare(Vec<HistoricalDataPoint>),
}

impl RefinitivHistoricalClient {
    pub fn new(
        client: ClientWithMiddleware,
        base_url: impl Into<String>,
        referer: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            referer: referer.into(),
        }
    }

    pub fn history_url(&self, ric: &str, from: NaiveDate, to: NaiveDate) -> Result<String> {
        let from_str = format!("{}T00:00:00", from.format("%Y-%m-%d"));
        let to_str = format!("{}T23:59:59", to.format("%Y-%m-%d"));
        build_url_with_query(
            &self.base_url,
            &[
                ("ric", ric),
                ("fids", FIELDS),
                ("samples", "D"),
                ("appendRecentData", "all"),
                ("fromDate", from_str.as_str()),
                ("toDate", to_str.as_str()),
            ],
        )
    }
}

/// Accepts `{"data": [...]}` or a bare array of points.
pub fn parse_history_response(body: &str) -> Result<Vec<HistoricalDataPoint>> {
    let parsed: HistoricalResponse =
        serde_json::from_str(body).map_err(|e| ScrapeError::InvalidPayload {
            source_name: "timeseries API".to_string(),
            reason: e.to_string(),
        })?;
    Ok(match parsed {
        HistoricalResponse::Wrapped { data } => data,
        HistoricalResponse::Bare(points) => points,
    })
}

#[async_trait]
impl HistoricalDataSource for RefinitivHistoricalClient {
    async fn fetch_history(
        &self,
        ric: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalDataPoint>> {
        let url = self.history_url(ric, from, to)?;
        debug!("RefinitivHistoricalClient: GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(REFERER, &self.referer)
            .send()
            .await
            .context("Failed to fetch historical series")?;

        check_status(&url, response.status())?;

        let body = response
            .text()
            .await
            .context("Failed to read historical series")?;
        let points = parse_history_response(&body)?;
        info!(
            "RefinitivHistoricalClient: {} points for {} ({} to {})",
            points.len(),
            ric,
            from,
            to
        );
        Ok(points)
    }
}
