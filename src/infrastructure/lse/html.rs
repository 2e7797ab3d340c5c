//! Extraction of titles, headings, links and constituent rows from LSE pages.

use crate::domain::constituent::Constituent;
use crate::domain::errors::ScrapeError;
use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Selector};

pub const ROW_SELECTOR: &str = "table tbody tr";
pub const CODE_SELECTOR: &str = ".instrument-tidm";
pub const NAME_SELECTOR: &str = ".ellipsed";
pub const CURRENCY_SELECTOR: &str = ".instrument-currency";
pub const MARKET_CAP_SELECTOR: &str = ".instrument-marketcapitalization";
pub const NET_CHANGE_SELECTOR: &str = ".instrument-netchange";
pub const PERCENT_CHANGE_SELECTOR: &str = ".instrument-percentualchange";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("selector {}: {:?}", css, e))
}

/// Rendered text of an element with whitespace collapsed.
fn inner_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn page_title(html: &str) -> Result<Option<String>> {
    let doc = Html::parse_document(html);
    let title = selector("title")?;
    Ok(doc.select(&title).next().map(inner_text))
}

pub fn headings(html: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let sel = selector("h1, h2, h3, h4, [role=\"heading\"]")?;
    Ok(doc
        .select(&sel)
        .map(inner_text)
        .filter(|t| !t.is_empty())
        .collect())
}

/// `href` of the first link whose text contains `text` (case-insensitive).
pub fn find_link_href(html: &str, text: &str) -> Result<Option<String>> {
    let doc = Html::parse_document(html);
    let sel = selector("a[href]")?;
    let needle = text.to_lowercase();
    Ok(doc
        .select(&sel)
        .find(|a| inner_text(*a).to_lowercase().contains(&needle))
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string))
}

/// Parse every constituent row of the table.
///
/// Rows without a code cell (spacers, other tables) are skipped. A row that has
/// a code but lacks any other cell is an error.
pub fn parse_constituent_rows(html: &str) -> Result<Vec<Constituent>> {
    let doc = Html::parse_document(html);
    let row_sel = selector(ROW_SELECTOR)?;
    let code_sel = selector(CODE_SELECTOR)?;
    let cells = [
        NAME_SELECTOR,
        CURRENCY_SELECTOR,
        MARKET_CAP_SELECTOR,
        NET_CHANGE_SELECTOR,
        PERCENT_CHANGE_SELECTOR,
    ]
    .iter()
    .map(|css| selector(css).map(|s| (*css, s)))
    .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for (index, tr) in doc.select(&row_sel).enumerate() {
        let Some(code) = tr.select(&code_sel).next().map(inner_text) else {
            continue;
        };

        let mut values = Vec::with_capacity(cells.len());
        for (css, sel) in &cells {
            let value = tr
                .select(sel)
                .next()
                .map(inner_text)
                .ok_or_else(|| ScrapeError::MissingCell {
                    row: index,
                    selector: css.to_string(),
                })?;
            values.push(value);
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        rows.push(Constituent {
            code,
            name: next(),
            currency: next(),
            market_cap: next(),
            net_change: next(),
            percentual_change: next(),
        });
    }

    Ok(rows)
}

/// Highest `page=N` found in paginator links; 1 when the table has no paginator.
pub fn parse_page_count(html: &str) -> Result<u32> {
    let doc = Html::parse_document(html);
    let sel = selector("a[href*=\"page=\"]")?;
    let max = doc
        .select(&sel)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(page_param)
        .max()
        .unwrap_or(1);
    Ok(max.max(1))
}

fn page_param(href: &str) -> Option<u32> {
    let query = href.split_once('?')?.1;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "page")
        .and_then(|(_, v)| v.parse::<u32>().ok())
}
