use crate::domain::constituent::Constituent;
use crate::domain::historical::HistoricalDataPoint;
use crate::domain::ports::{
    ConstituentPage, ConstituentSource, DocumentFetcher, FetchedPage, HistoricalDataSource,
};
use crate::domain::sorting::SortSpec;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory website: URL -> document.
#[derive(Clone, Default)]
pub struct MockDocumentFetcher {
    documents: Arc<RwLock<HashMap<String, FetchedPage>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockDocumentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, url: &str, body: &str) {
        self.insert_redirect(url, url, body).await;
    }

    /// Serve `body` for `url`, reporting `final_url` as where the request landed.
    pub async fn insert_redirect(&self, url: &str, final_url: &str, body: &str) {
        self.documents.write().await.insert(
            url.to_string(),
            FetchedPage {
                url: final_url.to_string(),
                status: 200,
                body: body.to_string(),
            },
        );
    }

    pub async fn requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl DocumentFetcher for MockDocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        self.requests.write().await.push(url.to_string());
        self.documents
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("MockDocumentFetcher: no document for {}", url))
    }
}

/// In-memory constituents table split into fixed-size pages.
#[derive(Clone)]
pub struct MockConstituentSource {
    rows: Vec<Constituent>,
    page_size: usize,
    server_sort: bool,
    requests: Arc<RwLock<Vec<(u32, Option<SortSpec>)>>>,
}

impl MockConstituentSource {
    pub fn new(rows: Vec<Constituent>, page_size: usize) -> Self {
        Self {
            rows,
            page_size: page_size.max(1),
            server_sort: false,
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Apply the requested sort before paging, like the refresh API does.
    pub fn with_server_sort(mut self) -> Self {
        self.server_sort = true;
        self
    }

    pub async fn requests(&self) -> Vec<(u32, Option<SortSpec>)> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl ConstituentSource for MockConstituentSource {
    async fn fetch_page(&self, page: u32, sort: Option<SortSpec>) -> Result<ConstituentPage> {
        self.requests.write().await.push((page, sort));

        let mut rows = self.rows.clone();
        if self.server_sort {
            if let Some(spec) = sort {
                spec.sort(&mut rows);
            }
        }

        let total_pages = rows.len().div_ceil(self.page_size).max(1) as u32;
        if page >= total_pages {
            return Err(anyhow!("MockConstituentSource: page {} out of range", page));
        }
        let rows = rows
            .into_iter()
            .skip(page as usize * self.page_size)
            .take(self.page_size)
            .collect();

        Ok(ConstituentPage {
            rows,
            page,
            total_pages,
        })
    }

    fn supports_server_sort(&self) -> bool {
        self.server_sort
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Fixed historical series; records the requested ranges.
#[derive(Clone, Default)]
pub struct MockHistoricalSource {
    points: Vec<HistoricalDataPoint>,
    requests: Arc<RwLock<Vec<(String, NaiveDate, NaiveDate)>>>,
}

impl MockHistoricalSource {
    pub fn new(points: Vec<HistoricalDataPoint>) -> Self {
        Self {
            points,
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn requests(&self) -> Vec<(String, NaiveDate, NaiveDate)> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl HistoricalDataSource for MockHistoricalSource {
    async fn fetch_history(
        &self,
        ric: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalDataPoint>> {
        self.requests
            .write()
            .await
            .push((ric.to_string(), from, to));
        Ok(self.points.clone())
    }
}
