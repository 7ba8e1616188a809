//! Data Coverage Verification Module
//!
//! Checks a loaded sales series against every resolution's data gate before
//! running the full pipeline, so it is clear up front which analyses will
//! come back as "Not enough data" and how much more history each needs.

use crate::analysis::aggregate;
use crate::model::{AnalysisError, TimeSeries};
use crate::resolutions::{BucketWidth, Resolution, RESOLUTION_REGISTRY};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub timestamp: String,
    pub first_record: Option<String>,
    pub last_record: Option<String>,
    pub records: usize,
    pub results: Vec<ResolutionCoverage>,
    pub summary: CoverageSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageSummary {
    pub total: usize,
    pub sufficient: usize,
    pub insufficient: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolutionCoverage {
    pub resolution: Resolution,
    pub title: String,
    pub bucket: BucketWidth,
    pub buckets: usize,
    pub required: usize,
    /// Buckets still missing before the gate opens; zero when sufficient.
    pub shortfall: usize,
    pub status: CoverageStatus,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub enum CoverageStatus {
    Sufficient,
    Insufficient,
}

// ============================================================================
// Coverage check
// ============================================================================

/// Aggregates `raw` once per bucket width and compares each resolution's
/// bucket count with its gate.
pub fn verify_coverage(raw: &TimeSeries) -> Result<CoverageReport, AnalysisError> {
    let mut counts: HashMap<BucketWidth, usize> = HashMap::new();
    let mut results = Vec::with_capacity(RESOLUTION_REGISTRY.len());

    for spec in RESOLUTION_REGISTRY {
        let buckets = match counts.get(&spec.bucket) {
            Some(&n) => n,
            None => {
                let n = aggregate(raw, spec.bucket)?.len();
                counts.insert(spec.bucket, n);
                n
            }
        };
        let status = if buckets >= spec.min_buckets {
            CoverageStatus::Sufficient
        } else {
            CoverageStatus::Insufficient
        };
        results.push(ResolutionCoverage {
            resolution: spec.resolution,
            title: spec.title.to_string(),
            bucket: spec.bucket,
            buckets,
            required: spec.min_buckets,
            shortfall: spec.min_buckets.saturating_sub(buckets),
            status,
        });
    }

    let sufficient = results
        .iter()
        .filter(|r| r.status == CoverageStatus::Sufficient)
        .count();

    Ok(CoverageReport {
        timestamp: Utc::now().to_rfc3339(),
        first_record: raw.points.first().map(|p| p.timestamp.to_string()),
        last_record: raw.points.last().map(|p| p.timestamp.to_string()),
        records: raw.len(),
        summary: CoverageSummary {
            total: results.len(),
            sufficient,
            insufficient: results.len() - sufficient,
        },
        results,
    })
}

pub fn print_summary(report: &CoverageReport) {
    println!("═══════════════════════════════════════════════════════════");
    println!("📊 DATA COVERAGE SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    match (&report.first_record, &report.last_record) {
        (Some(first), Some(last)) => {
            println!("Records: {}  ({} .. {})", report.records, first, last)
        }
        _ => println!("Records: 0"),
    }
    println!();

    for r in &report.results {
        match r.status {
            CoverageStatus::Sufficient => {
                println!("  ✓ {:<18} {:>5} {} buckets (need {})", r.title, r.buckets, r.bucket, r.required)
            }
            CoverageStatus::Insufficient => println!(
                "  ✗ {:<18} {:>5} {} buckets (need {}, {} short)",
                r.title, r.buckets, r.bucket, r.required, r.shortfall
            ),
        }
    }

    println!();
    println!(
        "Resolutions ready: {}/{}  ({} need more data)",
        report.summary.sufficient, report.summary.total, report.summary.insufficient
    );
    println!("═══════════════════════════════════════════════════════════");
}
