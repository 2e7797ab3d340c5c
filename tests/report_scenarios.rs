use chrono::NaiveDate;
use ftse_reports::config::Config;
use ftse_reports::domain::constituent::Constituent;
use ftse_reports::domain::historical::HistoricalDataPoint;
use ftse_reports::domain::sorting::SortDirection;
use ftse_reports::infrastructure::ServiceFactory;
use ftse_reports::infrastructure::mock::{
    MockConstituentSource, MockDocumentFetcher, MockHistoricalSource,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tempfile::TempDir;

const HOMEPAGE: &str = r#"<html><head><title>London Stock Exchange | LSEG</title></head>
<body><a href="/indices/ftse-100">View FTSE 100</a></body></html>"#;

const LANDING: &str = r#"<html><head><title>FTSE 100</title></head>
<body><h1>FTSE 100 <span>constituents</span></h1></body></html>"#;

fn constituent(code: &str, cap: &str, pct: &str) -> Constituent {
    Constituent {
        code: code.to_string(),
        name: format!("{} PLC", code),
        currency: "GBX".to_string(),
        market_cap: cap.to_string(),
        net_change: "1.00".to_string(),
        percentual_change: pct.to_string(),
    }
}

/// 25 rows: percent change from -12 to +12, market cap 1..=25 (£m).
fn table() -> Vec<Constituent> {
    (0..25)
        .map(|i| {
            let pct = format!("{:+}.50", i as i32 - 12);
            constituent(&format!("C{:02}", i), &format!("{}.00", i + 1), &pct)
        })
        .collect()
}

fn point(date: &str, low: &str) -> HistoricalDataPoint {
    HistoricalDataPoint {
        date_end: date.to_string(),
        low: low.to_string(),
        close: low.to_string(),
        high: low.to_string(),
        open: low.to_string(),
    }
}

struct Harness {
    config: Config,
    fetcher: MockDocumentFetcher,
    source: MockConstituentSource,
    history: MockHistoricalSource,
    _reports: TempDir,
}

async fn harness(source: MockConstituentSource) -> Harness {
    let reports = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.report.reports_dir = reports.path().join("reports");

    let fetcher = MockDocumentFetcher::new();
    fetcher.insert(&config.site.homepage_url, HOMEPAGE).await;
    fetcher.insert(&config.site.constituents_url, LANDING).await;

    let history = MockHistoricalSource::new(vec![
        point("2020-02-03T00:00:00", "7300"),
        point("2020-03-16T00:00:00", "5200"),
        point("2020-03-23T00:00:00", "4898.79"),
        point("2020-04-01T00:00:00", "5400"),
    ]);

    Harness {
        config,
        fetcher,
        source,
        history,
        _reports: reports,
    }
}

impl Harness {
    fn service(&self) -> ftse_reports::application::reports::ReportService {
        ServiceFactory::create_report_service(
            &self.config,
            Arc::new(self.fetcher.clone()),
            Arc::new(self.source.clone()),
            Arc::new(self.history.clone()),
        )
    }
}

#[tokio::test]
async fn test_homepage_check_reads_title_and_link() {
    let h = harness(MockConstituentSource::new(table(), 20)).await;
    let snapshot = h.service().homepage_check().await.unwrap();

    assert!(snapshot.title.contains("London Stock Exchange"));
    assert_eq!(
        snapshot.ftse100_link.as_deref(),
        Some("https://www.londonstockexchange.com/indices/ftse-100")
    );
}

#[tokio::test]
async fn test_homepage_check_fails_on_wrong_title() {
    let h = harness(MockConstituentSource::new(table(), 20)).await;
    h.fetcher
        .insert(&h.config.site.homepage_url, "<title>Access denied</title>")
        .await;

    let err = h.service().homepage_check().await.unwrap_err();
    assert!(format!("{:#}", err).contains("Access denied"));
}

#[tokio::test]
async fn test_top10_highest_percent_change_across_pages() {
    let h = harness(MockConstituentSource::new(table(), 20)).await;
    let mut service = h.service();

    let report = service
        .top_by_percent_change(10, SortDirection::Descending)
        .await
        .unwrap();

    // Highest change lives on page 2 of the unsorted table.
    assert_eq!(report.rows.len(), 10);
    assert_eq!(report.rows[0].code, "C24");
    assert_eq!(report.rows[9].code, "C15");
    for row in &report.rows {
        let pct = row.percent_change_value().unwrap();
        assert!(pct >= dec!(-100) && pct <= dec!(100));
    }

    let name = report.path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("top10_ftse100_"));
    assert!(name.ends_with(".csv"));

    let csv = std::fs::read_to_string(&report.path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "code,name,currency,marketCap,netChange,percentualchange");
    assert_eq!(lines[1], r#""C24","C24 PLC","GBX","25.00","1.00","+12.50""#);

    // Both pages were walked, each with the percent-change sort requested.
    let requests = h.source.requests().await;
    assert_eq!(requests.iter().map(|(p, _)| *p).collect::<Vec<_>>(), vec![0, 1]);
    assert!(requests.iter().all(|(_, s)| s.is_some()));
}

#[tokio::test]
async fn test_bottom5_lowest_percent_change_with_server_sort() {
    let h = harness(MockConstituentSource::new(table(), 10).with_server_sort()).await;
    let mut service = h.service();

    let report = service
        .top_by_percent_change(5, SortDirection::Ascending)
        .await
        .unwrap();

    let codes: Vec<&str> = report.rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["C00", "C01", "C02", "C03", "C04"]);
    assert!(
        report
            .path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("bottom5_ftse100_")
    );
}

#[tokio::test]
async fn test_out_of_range_percent_change_fails_the_report() {
    let mut rows = table();
    rows[3].percentual_change = "250.00".to_string();
    let h = harness(MockConstituentSource::new(rows, 20)).await;

    let err = h
        .service()
        .top_by_percent_change(10, SortDirection::Descending)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("out of range"));
}

#[tokio::test]
async fn test_market_cap_filter() {
    let mut rows = table();
    rows[7].market_cap = "-".to_string();
    let h = harness(MockConstituentSource::new(rows, 20)).await;

    let report = h
        .service()
        .above_market_cap(dec!(20000000))
        .await
        .unwrap();

    // Caps 20..=25 (£m) pass; sorted largest first.
    let codes: Vec<&str> = report.rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["C24", "C23", "C22", "C21", "C20", "C19"]);
    assert!(
        report
            .rows
            .iter()
            .all(|r| r.market_cap_value().unwrap() * dec!(1000000) >= dec!(20000000))
    );
}

#[tokio::test]
async fn test_market_cap_report_skips_overflowing_cell() {
    let mut rows = table();
    rows[24].market_cap = "79,228,162,514,264,337,593,543,950,335".to_string();
    let h = harness(MockConstituentSource::new(rows, 20)).await;

    let report = h
        .service()
        .above_market_cap(dec!(20000000))
        .await
        .unwrap();

    let codes: Vec<&str> = report.rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["C23", "C22", "C21", "C20", "C19"]);
}

#[tokio::test]
async fn test_page_not_loaded_when_redirected() {
    let h = harness(MockConstituentSource::new(table(), 20)).await;
    h.fetcher
        .insert_redirect(
            &h.config.site.constituents_url,
            "https://www.londonstockexchange.com/consent",
            LANDING,
        )
        .await;

    let err = h
        .service()
        .top_by_percent_change(10, SortDirection::Descending)
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Unexpected page URL"));
}

#[tokio::test]
async fn test_lowest_average_month() {
    let h = harness(MockConstituentSource::new(table(), 20)).await;
    let today = NaiveDate::from_ymd_opt(2024, 10, 19).unwrap();

    let report = h
        .service()
        .lowest_average_month_until(20, today)
        .await
        .unwrap();

    assert_eq!(report.month.to_string(), "03-2020");
    assert!((report.average_low - (5200.0 + 4898.79) / 2.0).abs() < 1e-9);
    assert_eq!(report.months.len(), 3);

    let requests = h.history.requests().await;
    assert_eq!(
        requests,
        vec![(
            ".FTSE".to_string(),
            NaiveDate::from_ymd_opt(2004, 10, 19).unwrap(),
            today
        )]
    );

    let csv = std::fs::read_to_string(&report.path).unwrap();
    assert!(csv.starts_with("month,averageLow,samples\n\"02-2020\""));
}

#[tokio::test]
async fn test_lowest_average_month_without_data() {
    let mut h = harness(MockConstituentSource::new(table(), 20)).await;
    h.history = MockHistoricalSource::new(vec![point("garbage", "x")]);

    let result = h
        .service()
        .lowest_average_month_until(20, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .await;
    assert!(result.is_err());
}
