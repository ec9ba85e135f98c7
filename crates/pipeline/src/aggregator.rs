//! Turns raw fact rows into the daily series a forecast is grounded on.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use storepilot_core::error::InsufficientHistory;
use storepilot_core::series::{DailyPoint, FactRow, numeric_value};
use tracing::{debug, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Aggregate `rows` for `identifier` over the inclusive range `start..=end`.
///
/// Rows are summed per date and returned in ascending date order. A missing or
/// non-numeric quantity counts as zero; a row whose date is not a calendar
/// date is skipped. Fails when fewer than `min_points` distinct dates remain.
pub fn aggregate(
    rows: &[FactRow],
    identifier: &str,
    start: &str,
    end: &str,
    min_points: usize,
) -> Result<Vec<DailyPoint>, InsufficientHistory> {
    let mut by_date: BTreeMap<&str, f64> = BTreeMap::new();

    for row in rows {
        if row.identifier != identifier {
            continue;
        }
        let date = row.date.as_str();
        if date < start || date > end {
            continue;
        }
        if date.len() != 10 || NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
            warn!(identifier, date, "Skipping fact row with invalid date");
            continue;
        }

        let quantity = numeric_value(&row.quantity).unwrap_or_else(|| {
            if !row.quantity.is_null() {
                debug!(identifier, date, quantity = %row.quantity, "Non-numeric quantity counted as 0");
            }
            0.0
        });
        *by_date.entry(date).or_insert(0.0) += quantity;
    }

    let points: Vec<DailyPoint> = by_date
        .into_iter()
        .map(|(date, value)| DailyPoint::new(date, value))
        .collect();

    if points.len() < min_points {
        return Err(InsufficientHistory {
            found: points.len(),
            required: min_points,
        });
    }

    debug!(identifier, points = points.len(), "Series aggregated");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(identifier: &str, date: &str, quantity: serde_json::Value) -> FactRow {
        FactRow {
            identifier: identifier.into(),
            date: date.into(),
            quantity,
        }
    }

    #[test]
    fn sums_rows_per_date() {
        let rows = vec![
            FactRow::new("A", "2024-01-01", 3.0),
            FactRow::new("A", "2024-01-01", 2.0),
            FactRow::new("A", "2024-01-02", 5.0),
            FactRow::new("B", "2024-01-01", 9.0),
        ];
        let series = aggregate(&rows, "A", "2024-01-01", "2024-01-31", 2).unwrap();
        assert_eq!(
            series,
            vec![
                DailyPoint::new("2024-01-01", 5.0),
                DailyPoint::new("2024-01-02", 5.0),
            ]
        );
    }

    #[test]
    fn too_few_points_reports_actual_count() {
        let rows = vec![
            FactRow::new("A", "2024-01-01", 3.0),
            FactRow::new("A", "2024-01-01", 2.0),
            FactRow::new("A", "2024-01-02", 5.0),
        ];
        let err = aggregate(&rows, "A", "2024-01-01", "2024-01-31", 3).unwrap_err();
        assert_eq!(err, InsufficientHistory { found: 2, required: 3 });
    }

    #[test]
    fn output_is_ascending_and_unique() {
        let rows = vec![
            FactRow::new("A", "2024-01-05", 1.0),
            FactRow::new("A", "2024-01-02", 1.0),
            FactRow::new("A", "2024-01-05", 1.0),
            FactRow::new("A", "2024-01-03", 1.0),
        ];
        let series = aggregate(&rows, "A", "2024-01-01", "2024-01-31", 0).unwrap();
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let rows = vec![
            FactRow::new("A", "2023-12-31", 1.0),
            FactRow::new("A", "2024-01-01", 1.0),
            FactRow::new("A", "2024-01-31", 1.0),
            FactRow::new("A", "2024-02-01", 1.0),
        ];
        let series = aggregate(&rows, "A", "2024-01-01", "2024-01-31", 0).unwrap();
        let dates: Vec<_> = series.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-31"]);
    }

    #[test]
    fn malformed_quantities_count_as_zero() {
        let rows = vec![
            row("A", "2024-01-01", json!("12")),
            row("A", "2024-01-01", json!("twelve")),
            row("A", "2024-01-02", json!(null)),
            row("A", "2024-01-03", json!({"n": 1})),
        ];
        let series = aggregate(&rows, "A", "2024-01-01", "2024-01-31", 3).unwrap();
        assert_eq!(series[0].value, 12.0);
        assert_eq!(series[1].value, 0.0);
        assert_eq!(series[2].value, 0.0);
    }

    #[test]
    fn invalid_dates_are_skipped() {
        let rows = vec![
            FactRow::new("A", "2024-01-01", 1.0),
            FactRow::new("A", "2024-02-30", 5.0),
            FactRow::new("A", "2024-1-15", 5.0),
        ];
        let series = aggregate(&rows, "A", "2024-01-01", "2024-12-31", 1).unwrap();
        assert_eq!(series, vec![DailyPoint::new("2024-01-01", 1.0)]);
    }

    #[test]
    fn no_rows_for_identifier_is_insufficient() {
        let rows = vec![FactRow::new("B", "2024-01-01", 1.0)];
        let err = aggregate(&rows, "A", "2024-01-01", "2024-01-31", 1).unwrap_err();
        assert_eq!(err.found, 0);
    }
}
