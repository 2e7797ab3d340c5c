use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while reading pages or payloads from the exchange website
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Unexpected page title: expected to contain '{expected}', got '{actual}'")]
    UnexpectedTitle { expected: String, actual: String },

    #[error("Unexpected page URL: expected {expected}, got {actual}")]
    UnexpectedUrl { expected: String, actual: String },

    #[error("No heading containing '{expected}' found on {url}")]
    MissingHeading { expected: String, url: String },

    #[error("Constituents table on {url} has no rows")]
    EmptyTable { url: String },

    #[error("Row {row} is missing cell '{selector}'")]
    MissingCell { row: usize, selector: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid payload from {source_name}: {reason}")]
    InvalidPayload { source_name: String, reason: String },
}

/// Errors raised when a scraped dataset fails a report check
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Percent change for {code} out of range: {value}% not in [-100, 100]")]
    PercentChangeOutOfRange { code: String, value: Decimal },

    #[error("Market cap for {code} below threshold: {value} < {threshold}")]
    MarketCapBelowThreshold {
        code: String,
        value: Decimal,
        threshold: Decimal,
    },

    #[error("Cannot parse {field} for {code}: '{raw}'")]
    UnparsableField {
        code: String,
        field: &'static str,
        raw: String,
    },

    #[error("Market cap for {code} overflows: '{raw}' x {unit}")]
    MarketCapOverflow {
        code: String,
        raw: String,
        unit: Decimal,
    },

    #[error("Report expected {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },

    #[error("Rows are not ordered by {field} at {code}")]
    NotOrdered { field: String, code: String },

    #[error("No usable historical data points")]
    NoHistoricalData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_change_formatting() {
        let err = ReportError::PercentChangeOutOfRange {
            code: "AZN".to_string(),
            value: dec!(120.5),
        };

        let msg = err.to_string();
        assert!(msg.contains("AZN"));
        assert!(msg.contains("120.5%"));
    }

    #[test]
    fn test_scrape_error_formatting() {
        let err = ScrapeError::HttpStatus {
            url: "https://example.com/page".to_string(),
            status: 503,
        };

        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("example.com"));
    }
}
