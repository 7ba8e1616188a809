/// Integration tests for CSV ingestion feeding the pipeline
///
/// Tests verify:
/// 1. A sales export in the default layout loads into an ordered series
/// 2. The loaded series runs through the pipeline and coverage check
/// 3. Missing files surface as I/O errors
///
/// Temporary files are written under the system temp directory.
///
/// Run with: cargo test --test csv_ingest
use sales_insight_service::ingest::{load_sales_csv, CsvLayout, IngestError};
use sales_insight_service::pipeline::{analyze, AnalysisOptions};
use sales_insight_service::resolutions::Resolution;
use sales_insight_service::verify::{verify_coverage, CoverageStatus};

use chrono::{Duration, NaiveDate};
use std::fs;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn temp_csv(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "sales_insight_{}_{}.csv",
        name,
        std::process::id()
    ));
    fs::write(&path, contents).expect("failed to write temp CSV");
    path
}

/// Several sales per hour for `days` days, written newest first to make
/// sure the loader sorts.
fn hourly_export(days: i64) -> String {
    let start = NaiveDate::from_ymd_opt(2024, 10, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut rows = Vec::new();
    for hour in 0..days * 24 {
        for (minute, amount) in [(5, 12.5), (35, 7.25)] {
            let t = start + Duration::hours(hour) + Duration::minutes(minute);
            rows.push(format!("{},{}", t.format("%d-%m-%Y %H:%M"), amount + (hour % 24) as f64));
        }
    }
    rows.reverse();
    format!("timestamp,sales\n{}\n", rows.join("\n"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_export_loads_sorted_and_analyses_hourly_and_daily() {
    let path = temp_csv("three_weeks", &hourly_export(21));
    let series = load_sales_csv(&path, &CsvLayout::default()).expect("export should load");
    let _ = fs::remove_file(&path);

    assert_eq!(series.len(), 21 * 24 * 2);
    assert!(series.check_index().is_ok());

    let reports = analyze(&series, &AnalysisOptions::default()).unwrap();
    let ready: Vec<_> = reports
        .iter()
        .filter(|r| r.is_sufficient())
        .map(|r| r.resolution)
        .collect();
    assert_eq!(ready, vec![Resolution::Hourly, Resolution::Daily]);

    // The hourly report names clock times.
    let hourly = reports[0].to_string();
    assert!(hourly.contains("Peak Hours"));
    assert!(hourly.contains(":00."));
}

#[test]
fn test_coverage_matches_pipeline_gates() {
    let path = temp_csv("coverage", &hourly_export(15));
    let series = load_sales_csv(&path, &CsvLayout::default()).unwrap();
    let _ = fs::remove_file(&path);

    let coverage = verify_coverage(&series).unwrap();
    let reports = analyze(&series, &AnalysisOptions::default()).unwrap();
    for (entry, report) in coverage.results.iter().zip(&reports) {
        assert_eq!(entry.resolution, report.resolution);
        assert_eq!(
            entry.status == CoverageStatus::Sufficient,
            report.is_sufficient(),
            "{:?}",
            entry.resolution
        );
    }
    assert_eq!(coverage.results[1].buckets, 15);
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("sales_insight_definitely_missing.csv");
    let result = load_sales_csv(&path, &CsvLayout::default());
    assert!(matches!(result, Err(IngestError::Io(_))), "got {:?}", result);
}
