use super::html;
use crate::domain::errors::ScrapeError;
use crate::domain::ports::{ConstituentPage, ConstituentSource, DocumentFetcher};
use crate::domain::sorting::SortSpec;
use crate::infrastructure::core::build_url_with_query;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Reads the server-rendered constituents table, one `?page=N` URL per page.
pub struct HtmlTableSource {
    fetcher: Arc<dyn DocumentFetcher>,
    table_url: String,
}

impl HtmlTableSource {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, table_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            table_url: table_url.into(),
        }
    }

    /// URL of 0-based page `page`; the site numbers pages from 1.
    pub fn page_url(&self, page: u32) -> Result<String> {
        build_url_with_query(&self.table_url, &[("page", (page + 1).to_string())])
    }
}

#[async_trait]
impl ConstituentSource for HtmlTableSource {
    async fn fetch_page(&self, page: u32, _sort: Option<SortSpec>) -> Result<ConstituentPage> {
        let url = self.page_url(page)?;
        let fetched = self.fetcher.fetch(&url).await?;

        let rows = html::parse_constituent_rows(&fetched.body)
            .with_context(|| format!("Failed to parse constituents table at {}", url))?;
        if rows.is_empty() {
            return Err(ScrapeError::EmptyTable { url }.into());
        }
        let total_pages = html::parse_page_count(&fetched.body)?.max(page + 1);

        debug!(
            "HtmlTableSource: page {}/{} -> {} rows",
            page + 1,
            total_pages,
            rows.len()
        );
        Ok(ConstituentPage {
            rows,
            page,
            total_pages,
        })
    }

    fn supports_server_sort(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "html"
    }
}
