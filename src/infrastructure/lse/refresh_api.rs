use crate::domain::constituent::Constituent;
use crate::domain::errors::ScrapeError;
use crate::domain::historical::raw_string;
use crate::domain::ports::{ConstituentPage, ConstituentSource};
use crate::domain::sorting::SortSpec;
use crate::infrastructure::core::check_status;
use crate::infrastructure::core::http_client_factory::form_encode;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SOURCE_NAME: &str = "components refresh API";

/// Request settings for the LSE components refresh endpoint
#[derive(Debug, Clone)]
pub struct RefreshApiSettings {
    pub url: String,
    pub path: String,
    pub parameters: String,
    pub component_id: String,
    pub page_size: u32,
}

/// The JSON endpoint the constituents table calls when it is paged or re-sorted.
pub struct RefreshApiSource {
    client: ClientWithMiddleware,
    settings: RefreshApiSettings,
}

#[derive(Debug, Serialize)]
struct RefreshRequest {
    path: String,
    parameters: String,
    components: Vec<RefreshRequestComponent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequestComponent {
    component_id: String,
    parameters: String,
}

#[derive(Debug, Deserialize)]
struct RefreshComponent {
    #[serde(default)]
    content: Vec<RefreshBlock>,
}

#[derive(Debug, Deserialize)]
struct RefreshBlock {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedConstituents {
    content: Vec<ApiConstituent>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    number: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiConstituent {
    #[serde(default, deserialize_with = "raw_string")]
    tidm: String,
    #[serde(default, deserialize_with = "raw_string")]
    issuername: String,
    #[serde(default, deserialize_with = "raw_string")]
    currency: String,
    #[serde(default, deserialize_with = "raw_string")]
    marketcapitalization: String,
    #[serde(default, deserialize_with = "raw_string")]
    netchange: String,
    #[serde(default, deserialize_with = "raw_string")]
    percentualchange: String,
}

impl From<ApiConstituent> for Constituent {
    fn from(c: ApiConstituent) -> Self {
        Constituent {
            code: c.tidm.trim().to_string(),
            name: c.issuername.trim().to_string(),
            currency: c.currency.trim().to_string(),
            market_cap: c.marketcapitalization.trim().to_string(),
            net_change: c.netchange.trim().to_string(),
            percentual_change: c.percentualchange.trim().to_string(),
        }
    }
}

impl RefreshApiSource {
    pub fn new(client: ClientWithMiddleware, settings: RefreshApiSettings) -> Self {
        Self { client, settings }
    }

    fn component_parameters(&self, page: u32, sort: Option<SortSpec>) -> String {
        let mut params = format!("page={}&size={}", page, self.settings.page_size);
        if let Some(spec) = sort {
            params.push_str(&format!(
                "&sort={},{}",
                spec.field.api_key(),
                spec.direction.api_key()
            ));
        }
        params
    }

    fn request_body(&self, page: u32, sort: Option<SortSpec>) -> Result<String> {
        let request = RefreshRequest {
            path: self.settings.path.clone(),
            parameters: form_encode(&self.settings.parameters),
            components: vec![RefreshRequestComponent {
                component_id: form_encode(&self.settings.component_id),
                parameters: self.component_parameters(page, sort),
            }],
        };
        serde_json::to_string(&request).context("Failed to encode refresh request")
    }
}

/// Extract the paged constituents block from a refresh response body.
///
/// Other components on the page can also carry a paged `content` array, so the
/// first block with at least one coded row wins. A paged block with no such
/// rows is only used when nothing better is present.
pub fn parse_refresh_response(body: &str, requested_page: u32) -> Result<ConstituentPage> {
    let components: Vec<RefreshComponent> =
        serde_json::from_str(body).map_err(|e| ScrapeError::InvalidPayload {
            source_name: SOURCE_NAME.to_string(),
            reason: e.to_string(),
        })?;

    let mut fallback = None;
    let mut chosen = None;
    for block in components.into_iter().flat_map(|c| c.content) {
        let Ok(paged) = serde_json::from_value::<PagedConstituents>(block.value) else {
            continue;
        };
        let page = into_page(paged, requested_page);
        if page.rows.is_empty() {
            debug!("RefreshApiSource: skipping block '{}' without constituents", block.name);
            fallback.get_or_insert(page);
        } else {
            debug!("RefreshApiSource: using block '{}'", block.name);
            chosen = Some(page);
            break;
        }
    }

    chosen
        .or(fallback)
        .ok_or_else(|| {
            ScrapeError::InvalidPayload {
                source_name: SOURCE_NAME.to_string(),
                reason: "no paged constituents block in response".to_string(),
            }
            .into()
        })
}

fn into_page(paged: PagedConstituents, requested_page: u32) -> ConstituentPage {
    let page = paged.number.unwrap_or(requested_page);
    let rows: Vec<Constituent> = paged
        .content
        .into_iter()
        .map(Constituent::from)
        .filter(|c| !c.code.is_empty())
        .collect();

    ConstituentPage {
        total_pages: paged.total_pages.unwrap_or(page + 1).max(page + 1),
        page,
        rows,
    }
}

/// A page without rows means the table is gone, not that paging ended.
fn require_rows(page: ConstituentPage, url: &str) -> Result<ConstituentPage, ScrapeError> {
    if page.rows.is_empty() {
        return Err(ScrapeError::EmptyTable {
            url: url.to_string(),
        });
    }
    Ok(page)
}

#[async_trait]
impl ConstituentSource for RefreshApiSource {
    async fn fetch_page(&self, page: u32, sort: Option<SortSpec>) -> Result<ConstituentPage> {
        let body = self.request_body(page, sort)?;
        let response = self
            .client
            .post(&self.settings.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .context("Failed to call components refresh API")?;

        check_status(&self.settings.url, response.status())?;

        let text = response
            .text()
            .await
            .context("Failed to read refresh API response")?;
        let parsed = require_rows(parse_refresh_response(&text, page)?, &self.settings.url)?;

        debug!(
            "RefreshApiSource: page {}/{} -> {} rows",
            parsed.page + 1,
            parsed.total_pages,
            parsed.rows.len()
        );
        Ok(parsed)
    }

    fn supports_server_sort(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "api"
    }
}
