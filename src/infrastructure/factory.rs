use crate::application::ftse100_page::Ftse100Page;
use crate::application::homepage::Homepage;
use crate::application::reports::{ReportService, ReportSettings};
use crate::config::{Config, SourceKind};
use crate::domain::ports::{ConstituentSource, DocumentFetcher, HistoricalDataSource};
use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::csv_report::CsvReportWriter;
use crate::infrastructure::lse::{
    HtmlTableSource, LseWebClient, RefreshApiSettings, RefreshApiSource,
};
use crate::infrastructure::refinitiv::RefinitivHistoricalClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    /// Build the live HTTP-backed ports. All of them share one session.
    pub fn create_sources(
        config: &Config,
    ) -> Result<(
        Arc<dyn DocumentFetcher>,
        Arc<dyn ConstituentSource>,
        Arc<dyn HistoricalDataSource>,
    )> {
        let client = HttpClientFactory::create_client(&config.http)?;
        let fetcher: Arc<dyn DocumentFetcher> = Arc::new(LseWebClient::new(client.clone()));

        let source: Arc<dyn ConstituentSource> = match config.site.source {
            SourceKind::Html => Arc::new(HtmlTableSource::new(
                fetcher.clone(),
                config.site.constituents_table_url.clone(),
            )),
            SourceKind::Api => Arc::new(RefreshApiSource::new(
                client.clone(),
                RefreshApiSettings {
                    url: config.site.refresh_api_url.clone(),
                    path: config.site.refresh_path.clone(),
                    parameters: config.site.refresh_parameters.clone(),
                    component_id: config.site.refresh_component_id.clone(),
                    page_size: config.report.page_size,
                },
            )),
        };
        info!("Using {} constituent source", source.name());

        let history: Arc<dyn HistoricalDataSource> = Arc::new(RefinitivHistoricalClient::new(
            client,
            config.site.historical_api_url.clone(),
            config.site.homepage_url.clone(),
        ));

        Ok((fetcher, source, history))
    }

    /// Assemble a report service over the given ports.
    pub fn create_report_service(
        config: &Config,
        fetcher: Arc<dyn DocumentFetcher>,
        source: Arc<dyn ConstituentSource>,
        history: Arc<dyn HistoricalDataSource>,
    ) -> ReportService {
        ReportService::new(
            Homepage::new(fetcher.clone(), config.site.homepage_url.clone()),
            Ftse100Page::new(
                fetcher,
                source,
                config.site.constituents_url.clone(),
                config.report.max_pages,
            ),
            history,
            CsvReportWriter::new(config.report.reports_dir.clone()),
            ReportSettings {
                market_cap_unit: config.report.market_cap_unit,
                historical_ric: config.site.historical_ric.clone(),
            },
        )
    }

    pub fn create_live_report_service(config: &Config) -> Result<ReportService> {
        let (fetcher, source, history) = Self::create_sources(config)?;
        Ok(Self::create_report_service(config, fetcher, source, history))
    }
}
