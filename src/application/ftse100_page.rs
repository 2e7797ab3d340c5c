use crate::domain::constituent::Constituent;
use crate::domain::errors::ScrapeError;
use crate::domain::ports::{ConstituentPage, ConstituentSource, DocumentFetcher};
use crate::domain::sorting::{SortDirection, SortField, SortSpec};
use crate::infrastructure::lse::html;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const EXPECTED_HEADING: &str = "FTSE 100";

/// Page object for the FTSE 100 constituents table.
///
/// Holds the current sort, like the table widget on the site does. Reads go
/// through a [`ConstituentSource`]; when the source cannot sort server-side the
/// rows are sorted here after collection.
pub struct Ftse100Page {
    fetcher: Arc<dyn DocumentFetcher>,
    source: Arc<dyn ConstituentSource>,
    constituents_url: String,
    max_pages: u32,
    sort: Option<SortSpec>,
}

impl Ftse100Page {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        source: Arc<dyn ConstituentSource>,
        constituents_url: impl Into<String>,
        max_pages: u32,
    ) -> Self {
        Self {
            fetcher,
            source,
            constituents_url: constituents_url.into(),
            max_pages: max_pages.max(1),
            sort: None,
        }
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Open the landing page and check the URL and heading.
    pub async fn check_page_is_loaded(&self) -> Result<()> {
        let page = self.fetcher.fetch(&self.constituents_url).await?;

        if normalize_url(&page.url) != normalize_url(&self.constituents_url) {
            return Err(ScrapeError::UnexpectedUrl {
                expected: self.constituents_url.clone(),
                actual: page.url,
            }
            .into());
        }

        let headings = html::headings(&page.body)?;
        if !headings.iter().any(|h| h.contains(EXPECTED_HEADING)) {
            return Err(ScrapeError::MissingHeading {
                expected: EXPECTED_HEADING.to_string(),
                url: page.url,
            }
            .into());
        }

        info!("Ftse100Page: loaded {}", page.url);
        Ok(())
    }

    /// Sort subsequent reads by `field`.
    pub fn filter_by(&mut self, field: SortField, ascending: bool) {
        let direction = SortDirection::from_ascending(ascending);
        info!("Ftse100Page: sorting by '{}' ({})", field.label(), direction.label());
        self.sort = Some(SortSpec::new(field, direction));
    }

    /// Re-read the first page under the current sort.
    pub async fn wait_for_table_refresh(&self) -> Result<ConstituentPage> {
        let mut page = self.source.fetch_page(0, self.sort).await?;
        if !self.source.supports_server_sort() {
            if let Some(spec) = self.sort {
                spec.sort(&mut page.rows);
            }
        }
        Ok(page)
    }

    /// Rows currently on the first page.
    pub async fn get_first_page(&self) -> Result<Vec<Constituent>> {
        Ok(self.wait_for_table_refresh().await?.rows)
    }

    /// Every row of every page, in the current sort order.
    pub async fn get_all_data_from_tables(&self) -> Result<Vec<Constituent>> {
        let mut rows = Vec::new();
        let mut page_index = 0;

        loop {
            let page = self.source.fetch_page(page_index, self.sort).await?;
            debug!(
                "Ftse100Page: page {} of {} from {} source",
                page.page + 1,
                page.total_pages,
                self.source.name()
            );
            let last = page.is_last();
            rows.extend(page.rows);

            page_index += 1;
            if last {
                break;
            }
            if page_index >= self.max_pages {
                warn!(
                    "Ftse100Page: stopping after {} pages (reported {})",
                    self.max_pages, page.total_pages
                );
                break;
            }
        }

        // Server-side order is only per page; re-sort the whole set.
        if let Some(spec) = self.sort {
            spec.sort(&mut rows);
        }

        info!("Ftse100Page: collected {} constituents", rows.len());
        Ok(rows)
    }

    /// The first `n` rows.
    pub fn top_rows(rows: &[Constituent], n: usize) -> Vec<Constituent> {
        rows.iter().take(n).cloned().collect()
    }
}

fn normalize_url(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].trim_end_matches('/')
}
