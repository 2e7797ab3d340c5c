use crate::domain::constituent::Constituent;
use crate::domain::historical::HistoricalDataPoint;
use crate::domain::sorting::SortSpec;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// A fetched document, with the URL the request finally landed on.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// One page of the constituents table.
#[derive(Debug, Clone, Default)]
pub struct ConstituentPage {
    pub rows: Vec<Constituent>,
    /// 0-based index of this page
    pub page: u32,
    pub total_pages: u32,
}

impl ConstituentPage {
    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.total_pages
    }
}

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

#[async_trait]
pub trait ConstituentSource: Send + Sync {
    /// Fetch page `page` (0-based). Sources that cannot sort server-side
    /// ignore `sort` and report `supports_server_sort() == false`.
    async fn fetch_page(&self, page: u32, sort: Option<SortSpec>) -> Result<ConstituentPage>;

    fn supports_server_sort(&self) -> bool;

    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait HistoricalDataSource: Send + Sync {
    async fn fetch_history(
        &self,
        ric: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalDataPoint>>;
}
