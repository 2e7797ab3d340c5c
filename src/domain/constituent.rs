use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One row of the FTSE 100 constituents table.
///
/// Every field is kept exactly as displayed on the page. Numeric views are
/// computed on demand through the `*_value` accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constituent {
    pub code: String,
    pub name: String,
    pub currency: String,
    #[serde(rename = "marketCap")]
    pub market_cap: String,
    #[serde(rename = "netChange")]
    pub net_change: String,
    #[serde(rename = "percentualchange")]
    pub percentual_change: String,
}

impl Constituent {
    /// CSV header, in serialization order.
    pub const FIELDS: [&'static str; 6] = [
        "code",
        "name",
        "currency",
        "marketCap",
        "netChange",
        "percentualchange",
    ];

    pub fn market_cap_value(&self) -> Option<Decimal> {
        parse_numeric_cell(&self.market_cap)
    }

    pub fn net_change_value(&self) -> Option<Decimal> {
        parse_numeric_cell(&self.net_change)
    }

    pub fn percent_change_value(&self) -> Option<Decimal> {
        parse_numeric_cell(&self.percentual_change)
    }
}

/// Parse a displayed number such as `"1,234.56"`, `"+0.84%"` or `"−12.0"`.
pub fn parse_numeric_cell(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '%' | ' ' | '\u{a0}'))
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}
