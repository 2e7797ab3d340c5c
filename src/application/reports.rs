use crate::application::ftse100_page::Ftse100Page;
use crate::application::homepage::{Homepage, HomepageSnapshot};
use crate::application::monthly_average::{MonthlyAverage, lowest_average, monthly_low_averages};
use crate::application::validation;
use crate::domain::constituent::Constituent;
use crate::domain::errors::ReportError;
use crate::domain::historical::MonthKey;
use crate::domain::ports::HistoricalDataSource;
use crate::domain::sorting::{SortDirection, SortField, SortSpec};
use crate::infrastructure::csv_report::CsvReportWriter;
use anyhow::{Context, Result};
use chrono::{Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Settings shared by the report scenarios
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub market_cap_unit: Decimal,
    pub historical_ric: String,
}

/// Rows of one exported report and where they were written
#[derive(Debug, Clone)]
pub struct ExportedReport<T> {
    pub rows: Vec<T>,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LowestMonthReport {
    pub month: MonthKey,
    pub average_low: f64,
    pub months: Vec<MonthlyAverage>,
    pub path: PathBuf,
}

/// Runs each scraping scenario end to end: open, read, check, export.
pub struct ReportService {
    homepage: Homepage,
    ftse100: Ftse100Page,
    history: Arc<dyn HistoricalDataSource>,
    writer: CsvReportWriter,
    settings: ReportSettings,
}

impl ReportService {
    pub fn new(
        homepage: Homepage,
        ftse100: Ftse100Page,
        history: Arc<dyn HistoricalDataSource>,
        writer: CsvReportWriter,
        settings: ReportSettings,
    ) -> Self {
        Self {
            homepage,
            ftse100,
            history,
            writer,
            settings,
        }
    }

    pub async fn homepage_check(&self) -> Result<HomepageSnapshot> {
        self.homepage.goto().await.context("Homepage check failed")
    }

    /// The `n` constituents with the highest (descending) or lowest
    /// (ascending) percentage change, exported as `top{n}_ftse100` or
    /// `bottom{n}_ftse100`.
    pub async fn top_by_percent_change(
        &mut self,
        n: usize,
        direction: SortDirection,
    ) -> Result<ExportedReport<Constituent>> {
        self.ftse100
            .check_page_is_loaded()
            .await
            .context("FTSE 100 page did not load")?;

        self.ftse100.filter_by(
            SortField::PercentualChange,
            direction == SortDirection::Ascending,
        );
        let all = self.ftse100.get_all_data_from_tables().await?;
        let rows = Ftse100Page::top_rows(&all, n);

        validation::validate_percent_changes(&rows)?;
        validation::validate_top_rows(
            &rows,
            n,
            all.len(),
            SortSpec::new(SortField::PercentualChange, direction),
        )?;

        let stem = match direction {
            SortDirection::Descending => format!("top{}_ftse100", n),
            SortDirection::Ascending => format!("bottom{}_ftse100", n),
        };
        let path = self.writer.write(&stem, &rows)?;
        info!("Exported {} constituents to {}", rows.len(), path.display());
        Ok(ExportedReport { rows, path })
    }

    /// Constituents with a market cap of at least `threshold` pounds, largest
    /// first, exported as `ftse100_market_cap`.
    pub async fn above_market_cap(
        &mut self,
        threshold: Decimal,
    ) -> Result<ExportedReport<Constituent>> {
        self.ftse100
            .check_page_is_loaded()
            .await
            .context("FTSE 100 page did not load")?;

        self.ftse100.filter_by(SortField::MarketCap, false);
        let all = self.ftse100.get_all_data_from_tables().await?;

        let unit = self.settings.market_cap_unit;
        let rows: Vec<Constituent> = all
            .into_iter()
            .filter(|c| match validation::market_cap_in_pounds(c, unit) {
                Ok(value) => value >= threshold,
                Err(e) => {
                    warn!("Skipping constituent: {}", e);
                    false
                }
            })
            .collect();

        validation::validate_market_caps(&rows, threshold, unit)?;

        let path = self.writer.write("ftse100_market_cap", &rows)?;
        info!(
            "Exported {} constituents with market cap >= {} to {}",
            rows.len(),
            threshold,
            path.display()
        );
        Ok(ExportedReport { rows, path })
    }

    /// Month with the lowest average daily low over the last `years` years.
    pub async fn lowest_average_month(&self, years: u32) -> Result<LowestMonthReport> {
        self.lowest_average_month_until(years, Utc::now().date_naive())
            .await
    }

    pub async fn lowest_average_month_until(
        &self,
        years: u32,
        today: NaiveDate,
    ) -> Result<LowestMonthReport> {
        let from = today
            .checked_sub_months(Months::new(years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);

        let points = self
            .history
            .fetch_history(&self.settings.historical_ric, from, today)
            .await
            .context("Failed to load index history")?;

        let months = monthly_low_averages(&points);
        let lowest = lowest_average(&months)
            .cloned()
            .ok_or(ReportError::NoHistoricalData)?;

        let path = self.writer.write("ftse100_monthly_lows", &months)?;
        info!(
            "Lowest average month since {}: {} ({:.2})",
            from, lowest.month, lowest.average_low
        );

        Ok(LowestMonthReport {
            month: lowest.month,
            average_low: lowest.average_low,
            months,
            path,
        })
    }
}
