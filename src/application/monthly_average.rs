use crate::domain::historical::{HistoricalDataPoint, MonthKey};
use crate::infrastructure::csv_report::ReportRecord;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Mean of the daily lows within one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub month: MonthKey,
    #[serde(rename = "averageLow")]
    pub average_low: f64,
    pub samples: usize,
}

impl ReportRecord for MonthlyAverage {
    fn headers() -> &'static [&'static str] {
        &["month", "averageLow", "samples"]
    }
}

/// Average `LOW_1` per (month, year), in the order months are first seen.
///
/// Points whose date or low does not parse are skipped.
pub fn monthly_low_averages(points: &[HistoricalDataPoint]) -> Vec<MonthlyAverage> {
    let mut index: HashMap<MonthKey, usize> = HashMap::new();
    let mut sums: Vec<(MonthKey, f64, usize)> = Vec::new();
    let mut skipped = 0usize;

    for point in points {
        let (Some(date), Some(low)) = (point.date(), point.low_value()) else {
            skipped += 1;
            continue;
        };
        let key = MonthKey::from_date(date);
        let slot = *index.entry(key).or_insert_with(|| {
            sums.push((key, 0.0, 0));
            sums.len() - 1
        });
        sums[slot].1 += low;
        sums[slot].2 += 1;
    }

    if skipped > 0 {
        warn!(
            "Skipped {} of {} historical points with an unparsable date or low",
            skipped,
            points.len()
        );
    }

    sums.into_iter()
        .map(|(month, sum, samples)| MonthlyAverage {
            month,
            average_low: sum / samples as f64,
            samples,
        })
        .collect()
}

/// Month with the lowest average low. Ties go to the month seen first.
pub fn lowest_average(averages: &[MonthlyAverage]) -> Option<&MonthlyAverage> {
    averages.iter().fold(None, |best: Option<&MonthlyAverage>, m| match best {
        Some(b) if b.average_low <= m.average_low => Some(b),
        _ => Some(m),
    })
}

/// `MM-YYYY` month whose average `LOW_1` is lowest; `None` without usable data.
pub fn lowest_index_month(points: &[HistoricalDataPoint]) -> Option<MonthKey> {
    lowest_average(&monthly_low_averages(points)).map(|m| m.month)
}
