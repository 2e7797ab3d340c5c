use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One sample of the index time series, fields kept as delivered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    #[serde(rename = "_DATE_END", deserialize_with = "raw_string")]
    pub date_end: String,
    #[serde(rename = "LOW_1", default, deserialize_with = "raw_string")]
    pub low: String,
    #[serde(rename = "CLOSE_PRC", default, deserialize_with = "raw_string")]
    pub close: String,
    #[serde(rename = "HIGH_1", default, deserialize_with = "raw_string")]
    pub high: String,
    #[serde(rename = "OPEN_PRC", default, deserialize_with = "raw_string")]
    pub open: String,
}

impl HistoricalDataPoint {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date_end(&self.date_end)
    }

    pub fn low_value(&self) -> Option<f64> {
        self.low.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Calendar month bucket, displayed as `MM-YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.month, self.year)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339 timestamps.
/// Offsets are not normalised: the calendar date as written is used.
pub fn parse_date_end(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub(crate) fn raw_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Missing(Option<()>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Missing(_) => String::new(),
    })
}
