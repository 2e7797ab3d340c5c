use crate::domain::errors::ScrapeError;
use crate::domain::ports::DocumentFetcher;
use crate::infrastructure::lse::html;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use url::Url;

pub const EXPECTED_TITLE: &str = "London Stock Exchange";
pub const FTSE100_LINK_TEXT: &str = "View FTSE 100";

/// What the homepage showed when it was opened
#[derive(Debug, Clone)]
pub struct HomepageSnapshot {
    pub url: String,
    pub title: String,
    /// Absolute target of the "View FTSE 100" link, when present
    pub ftse100_link: Option<String>,
}

/// Page object for the exchange homepage.
pub struct Homepage {
    fetcher: Arc<dyn DocumentFetcher>,
    url: String,
}

impl Homepage {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    /// Open the homepage and check its title.
    ///
    /// Cookies set by the response stay in the shared session for later pages.
    pub async fn goto(&self) -> Result<HomepageSnapshot> {
        let page = self.fetcher.fetch(&self.url).await?;

        let title = html::page_title(&page.body)?.unwrap_or_default();
        if !title.contains(EXPECTED_TITLE) {
            return Err(ScrapeError::UnexpectedTitle {
                expected: EXPECTED_TITLE.to_string(),
                actual: title,
            }
            .into());
        }

        let ftse100_link = match html::find_link_href(&page.body, FTSE100_LINK_TEXT)? {
            Some(href) => Some(resolve_link(&page.url, &href)?),
            None => None,
        };

        info!("Homepage: opened '{}'", title);
        Ok(HomepageSnapshot {
            url: page.url,
            title,
            ftse100_link,
        })
    }
}

/// Resolve `href` against the page it was found on.
pub fn resolve_link(base: &str, href: &str) -> Result<String> {
    let base = Url::parse(base).with_context(|| format!("Invalid page URL {}", base))?;
    let joined = base
        .join(href)
        .with_context(|| format!("Invalid link {}", href))?;
    Ok(joined.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link("https://www.londonstockexchange.com/", "/indices/ftse-100").unwrap(),
            "https://www.londonstockexchange.com/indices/ftse-100"
        );
        assert_eq!(
            resolve_link("https://a.example/x", "https://b.example/y").unwrap(),
            "https://b.example/y"
        );
    }
}
