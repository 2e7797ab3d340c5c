use ftse_reports::application::ftse100_page::Ftse100Page;
use ftse_reports::domain::ports::ConstituentSource;
use ftse_reports::domain::sorting::SortField;
use ftse_reports::infrastructure::lse::HtmlTableSource;
use ftse_reports::infrastructure::mock::MockDocumentFetcher;
use std::sync::Arc;

const TABLE_URL: &str = "https://lse.example/indices/ftse-100/constituents/table";
const LANDING_URL: &str = "https://lse.example/indices/ftse-100/constituents";

fn row(code: &str, name: &str, cap: &str, pct: &str) -> String {
    format!(
        r#"<tr>
          <td class="instrument-tidm"><a href="/stock/{code}">{code}</a></td>
          <td class="instrument-name"><a><span class="ellipsed">{name}</span></a></td>
          <td class="instrument-currency">GBX</td>
          <td class="instrument-marketcapitalization">{cap}</td>
          <td class="instrument-lastprice">100.00</td>
          <td class="instrument-netchange">1.00</td>
          <td class="instrument-percentualchange"><span>{pct}</span></td>
        </tr>"#
    )
}

fn page(rows: &[String], last_page: u32) -> String {
    let links: String = (1..=last_page)
        .map(|p| format!(r#"<a class="page-number" href="/indices/ftse-100/constituents/table?page={p}">{p}</a>"#))
        .collect();
    format!(
        r#"<html><body><h1>FTSE 100</h1>
        <table><thead><tr><th>Code</th></tr></thead><tbody>{}</tbody></table>
        <div class="paginator">{}</div></body></html>"#,
        rows.join("\n"),
        links
    )
}

async fn fetcher_with_two_pages() -> MockDocumentFetcher {
    let fetcher = MockDocumentFetcher::new();
    fetcher
        .insert(
            &format!("{}?page=1", TABLE_URL),
            &page(
                &[
                    row("SHEL", "SHELL PLC", "160,512.11", "+0.61%"),
                    row("AZN", "ASTRAZENECA PLC", "197,095.60", "-0.33%"),
                ],
                2,
            ),
        )
        .await;
    fetcher
        .insert(
            &format!("{}?page=2", TABLE_URL),
            &page(&[row("HSBA", "HSBC HOLDINGS PLC", "125,003.00", "+1.10%")], 2),
        )
        .await;
    fetcher
        .insert(LANDING_URL, "<html><body><h2>FTSE 100 constituents</h2></body></html>")
        .await;
    fetcher
}

#[tokio::test]
async fn test_html_source_walks_all_pages() {
    let fetcher = fetcher_with_two_pages().await;
    let source = Arc::new(HtmlTableSource::new(Arc::new(fetcher.clone()), TABLE_URL));
    let mut table = Ftse100Page::new(Arc::new(fetcher.clone()), source, LANDING_URL, 20);

    table.check_page_is_loaded().await.unwrap();
    table.filter_by(SortField::PercentualChange, false);
    let rows = table.get_all_data_from_tables().await.unwrap();

    let codes: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["HSBA", "SHEL", "AZN"]);
    assert_eq!(rows[2].name, "ASTRAZENECA PLC");

    let requests = fetcher.requests().await;
    assert_eq!(
        requests,
        vec![
            LANDING_URL.to_string(),
            format!("{}?page=1", TABLE_URL),
            format!("{}?page=2", TABLE_URL),
        ]
    );
}

#[tokio::test]
async fn test_first_page_is_sorted_locally() {
    let fetcher = fetcher_with_two_pages().await;
    let source = Arc::new(HtmlTableSource::new(Arc::new(fetcher.clone()), TABLE_URL));
    assert!(!source.supports_server_sort());

    let mut table = Ftse100Page::new(Arc::new(fetcher), source, LANDING_URL, 20);
    table.filter_by(SortField::MarketCap, false);

    let first = table.get_first_page().await.unwrap();
    let top = Ftse100Page::top_rows(&first, 1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].code, "AZN");
}

#[tokio::test]
async fn test_max_pages_bounds_the_walk() {
    let fetcher = fetcher_with_two_pages().await;
    let source = Arc::new(HtmlTableSource::new(Arc::new(fetcher.clone()), TABLE_URL));
    let table = Ftse100Page::new(Arc::new(fetcher), source, LANDING_URL, 1);

    let rows = table.get_all_data_from_tables().await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_empty_table_is_an_error() {
    let fetcher = MockDocumentFetcher::new();
    fetcher
        .insert(&format!("{}?page=1", TABLE_URL), &page(&[], 1))
        .await;
    let source = HtmlTableSource::new(Arc::new(fetcher), TABLE_URL);

    let err = source.fetch_page(0, None).await.unwrap_err();
    assert!(err.to_string().contains("has no rows"));
}

#[tokio::test]
async fn test_missing_heading_fails_page_check() {
    let fetcher = MockDocumentFetcher::new();
    fetcher
        .insert(LANDING_URL, "<html><body><h1>FTSE 250</h1></body></html>")
        .await;
    let source = Arc::new(HtmlTableSource::new(Arc::new(fetcher.clone()), TABLE_URL));
    let table = Ftse100Page::new(Arc::new(fetcher), source, LANDING_URL, 20);

    let err = table.check_page_is_loaded().await.unwrap_err();
    assert!(err.to_string().contains("No heading containing 'FTSE 100'"));
}
