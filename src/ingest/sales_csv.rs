//! CSV sales record reader.
//!
//! Expects a header row naming a timestamp column and a value column (by
//! default `timestamp` and `sales`). Timestamps are parsed with a chrono
//! format string, falling back to RFC 3339 normalized to UTC. Records are
//! sorted by time and records sharing a timestamp are summed, so the
//! returned series is strictly increasing.

use super::IngestError;
use crate::logging::{self, Stage};
use crate::model::{Point, TimeSeries};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Timestamp layout of the sales exports this service was built around,
/// e.g. "15-10-2024 13:45".
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Column names and timestamp format of a sales CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvLayout {
    pub timestamp_column: String,
    pub value_column: String,
    pub timestamp_format: String,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            timestamp_column: "timestamp".to_string(),
            value_column: "sales".to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Reads a sales CSV from disk.
pub fn load_sales_csv(path: &Path, layout: &CsvLayout) -> Result<TimeSeries, IngestError> {
    let file = File::open(path)?;
    let series = parse_sales_csv(file, layout)?;
    logging::info(
        Stage::Ingest,
        None,
        &format!("Loaded {} records from {}", series.len(), path.display()),
    );
    Ok(series)
}

/// Parses sales records from any reader.
pub fn parse_sales_csv<R: Read>(reader: R, layout: &CsvLayout) -> Result<TimeSeries, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
    };
    let ts_idx = column(&layout.timestamp_column)?;
    let value_idx = column(&layout.value_column)?;

    let mut points = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Row numbers as a spreadsheet shows them: header is row 1.
        let row = i + 2;
        let raw_ts = record.get(ts_idx).unwrap_or_default();
        let raw_value = record.get(value_idx).unwrap_or_default();

        let timestamp = parse_timestamp(raw_ts, &layout.timestamp_format).ok_or_else(|| {
            IngestError::BadTimestamp {
                row,
                value: raw_ts.to_string(),
            }
        })?;
        let value = raw_value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| IngestError::BadValue {
                row,
                value: raw_value.to_string(),
            })?;

        points.push(Point::new(timestamp, value));
    }

    if points.is_empty() {
        return Err(IngestError::Empty);
    }

    Ok(coalesce(points))
}

/// Parses one timestamp cell. Date-only formats map to midnight.
fn parse_timestamp(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_utc()))
}

/// Sorts points by time and sums points that share a timestamp.
fn coalesce(mut points: Vec<Point>) -> TimeSeries {
    points.sort_by_key(|p| p.timestamp);

    let mut merged: Vec<Point> = Vec::with_capacity(points.len());
    let mut duplicates = 0usize;
    for point in points {
        match merged.last_mut() {
            Some(last) if last.timestamp == point.timestamp => {
                last.value += point.value;
                duplicates += 1;
            }
            _ => merged.push(point),
        }
    }

    if duplicates > 0 {
        logging::warn(
            Stage::Ingest,
            None,
            &format!("Summed {} records sharing a timestamp with an earlier record", duplicates),
        );
    }
    TimeSeries::new(merged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(d: u32, m: u32, y: i32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parses_default_layout() {
        let csv = "timestamp,sales\n15-10-2024 13:45,12.5\n15-10-2024 14:10,7\n";
        let series = parse_sales_csv(csv.as_bytes(), &CsvLayout::default()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0], Point::new(ts(15, 10, 2024, 13, 45), 12.5));
        assert_eq!(series.points[1].value, 7.0);
    }

    #[test]
    fn test_extra_columns_and_order_are_ignored() {
        let csv = "store,sales,timestamp\nA,3,01-01-2024 10:00\nB,4,01-01-2024 09:00\n";
        let series = parse_sales_csv(csv.as_bytes(), &CsvLayout::default()).unwrap();
        assert_eq!(series.values(), vec![4.0, 3.0], "records should be sorted by time");
        assert!(series.check_index().is_ok());
    }

    #[test]
    fn test_duplicate_timestamps_are_summed() {
        let csv = "timestamp,sales\n01-01-2024 10:00,3\n01-01-2024 10:00,4\n01-01-2024 11:00,1\n";
        let series = parse_sales_csv(csv.as_bytes(), &CsvLayout::default()).unwrap();
        assert_eq!(series.values(), vec![7.0, 1.0]);
        assert!(series.check_index().is_ok());
    }

    #[test]
    fn test_rfc3339_fallback() {
        let csv = "timestamp,sales\n2024-01-01T10:00:00Z,3\n";
        let series = parse_sales_csv(csv.as_bytes(), &CsvLayout::default()).unwrap();
        assert_eq!(series.points[0].timestamp, ts(1, 1, 2024, 10, 0));
    }

    #[test]
    fn test_rfc3339_offsets_sort_by_instant() {
        let csv = "timestamp,sales
2024-01-01T09:00:00Z,2
2024-01-01T10:00:00+02:00,1
";
        let series = parse_sales_csv(csv.as_bytes(), &CsvLayout::default()).unwrap();
        assert_eq!(series.points[0], Point::new(ts(1, 1, 2024, 8, 0), 1.0));
        assert_eq!(series.points[1], Point::new(ts(1, 1, 2024, 9, 0), 2.0));
    }

    #[test]
    fn test_custom_layout_with_date_only_format() {
        let layout = CsvLayout {
            timestamp_column: "day".to_string(),
            value_column: "revenue".to_string(),
            timestamp_format: "%Y-%m-%d".to_string(),
        };
        let csv = "day,revenue\n2024-02-29,100\n";
        let series = parse_sales_csv(csv.as_bytes(), &layout).unwrap();
        assert_eq!(series.points[0].timestamp, ts(29, 2, 2024, 0, 0));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "timestamp,revenue\n01-01-2024 10:00,3\n";
        match parse_sales_csv(csv.as_bytes(), &CsvLayout::default()) {
            Err(IngestError::MissingColumn(name)) => assert_eq!(name, "sales"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_cells_report_row_numbers() {
        let csv = "timestamp,sales\n01-01-2024 10:00,3\nyesterday,4\n";
        match parse_sales_csv(csv.as_bytes(), &CsvLayout::default()) {
            Err(IngestError::BadTimestamp { row, value }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected BadTimestamp, got {:?}", other),
        }

        let csv = "timestamp,sales\n01-01-2024 10:00,lots\n";
        assert!(matches!(
            parse_sales_csv(csv.as_bytes(), &CsvLayout::default()),
            Err(IngestError::BadValue { row: 2, .. })
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "timestamp,sales\n";
        assert!(matches!(
            parse_sales_csv(csv.as_bytes(), &CsvLayout::default()),
            Err(IngestError::Empty)
        ));
    }
}
