//! Range and ordering checks applied to scraped datasets before export.

use crate::domain::constituent::Constituent;
use crate::domain::errors::ReportError;
use crate::domain::sorting::SortSpec;
use rust_decimal::Decimal;

/// Every percent change must parse and lie within [-100, 100].
pub fn validate_percent_changes(rows: &[Constituent]) -> Result<(), ReportError> {
    let bound = Decimal::ONE_HUNDRED;
    for row in rows {
        let value = row
            .percent_change_value()
            .ok_or_else(|| ReportError::UnparsableField {
                code: row.code.clone(),
                field: "percentualchange",
                raw: row.percentual_change.clone(),
            })?;
        if value < -bound || value > bound {
            return Err(ReportError::PercentChangeOutOfRange {
                code: row.code.clone(),
                value,
            });
        }
    }
    Ok(())
}

/// Market cap of `row` in pounds, given the multiplier of the displayed cell.
pub fn market_cap_in_pounds(row: &Constituent, unit: Decimal) -> Result<Decimal, ReportError> {
    let value = row
        .market_cap_value()
        .ok_or_else(|| ReportError::UnparsableField {
            code: row.code.clone(),
            field: "marketCap",
            raw: row.market_cap.clone(),
        })?;
    value
        .checked_mul(unit)
        .ok_or_else(|| ReportError::MarketCapOverflow {
            code: row.code.clone(),
            raw: row.market_cap.clone(),
            unit,
        })
}

/// Every row's market cap must be at least `threshold` pounds.
pub fn validate_market_caps(
    rows: &[Constituent],
    threshold: Decimal,
    unit: Decimal,
) -> Result<(), ReportError> {
    for row in rows {
        let value = market_cap_in_pounds(row, unit)?;
        if value < threshold {
            return Err(ReportError::MarketCapBelowThreshold {
                code: row.code.clone(),
                value,
                threshold,
            });
        }
    }
    Ok(())
}

/// A top-N report holds `min(n, available)` rows in `spec` order.
pub fn validate_top_rows(
    rows: &[Constituent],
    n: usize,
    available: usize,
    spec: SortSpec,
) -> Result<(), ReportError> {
    let expected = n.min(available);
    if rows.len() != expected {
        return Err(ReportError::RowCount {
            expected,
            actual: rows.len(),
        });
    }
    if let Some(w) = rows
        .windows(2)
        .find(|w| spec.compare(&w[0], &w[1]) == std::cmp::Ordering::Greater)
    {
        return Err(ReportError::NotOrdered {
            field: spec.field.to_string(),
            code: w[1].code.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sorting::{SortDirection, SortField};
    use rust_decimal_macros::dec;

    fn row(code: &str, cap: &str, pct: &str) -> Constituent {
        Constituent {
            code: code.to_string(),
            name: code.to_string(),
            currency: "GBX".to_string(),
            market_cap: cap.to_string(),
            net_change: "0".to_string(),
            percentual_change: pct.to_string(),
        }
    }

    #[test]
    fn test_percent_change_bounds() {
        assert!(validate_percent_changes(&[row("A", "1", "-100"), row("B", "1", "100.00")]).is_ok());
        assert!(matches!(
            validate_percent_changes(&[row("C", "1", "100.01")]),
            Err(ReportError::PercentChangeOutOfRange { .. })
        ));
        assert!(matches!(
            validate_percent_changes(&[row("D", "1", "-")]),
            Err(ReportError::UnparsableField { field: "percentualchange", .. })
        ));
    }

    #[test]
    fn test_market_cap_threshold() {
        let unit = dec!(1000000);
        let rows = [row("A", "7.00", "0"), row("B", "1,500.25", "0")];
        assert!(validate_market_caps(&rows, dec!(7000000), unit).is_ok());

        let err = validate_market_caps(&[row("C", "6.99", "0")], dec!(7000000), unit).unwrap_err();
        assert!(matches!(err, ReportError::MarketCapBelowThreshold { .. }));
    }

    #[test]
    fn test_market_cap_overflow_is_an_error() {
        let huge = row("X", "79,228,162,514,264,337,593,543,950,335", "0");
        assert!(matches!(
            market_cap_in_pounds(&huge, dec!(1000000)),
            Err(ReportError::MarketCapOverflow { .. })
        ));
        assert!(matches!(
            validate_market_caps(&[huge], dec!(7000000), dec!(1000000)),
            Err(ReportError::MarketCapOverflow { .. })
        ));
    }

    #[test]
    fn test_top_rows_count_and_order() {
        let spec = SortSpec::new(SortField::PercentualChange, SortDirection::Descending);
        let rows = [row("A", "1", "3"), row("B", "1", "2")];

        assert!(validate_top_rows(&rows, 10, 2, spec).is_ok());
        assert!(matches!(
            validate_top_rows(&rows, 1, 2, spec),
            Err(ReportError::RowCount { expected: 1, actual: 2 })
        ));

        let unordered = [row("A", "1", "2"), row("B", "1", "3")];
        assert!(matches!(
            validate_top_rows(&unordered, 2, 2, spec),
            Err(ReportError::NotOrdered { .. })
        ));
    }
}
