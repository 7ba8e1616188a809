//! Business insight reports.
//!
//! Turns each resolution pass into a `Report`: the low and high sales
//! periods of the observed series plus the resolution's narrative template.
//! Passes that missed their data gate become a short "Not enough data"
//! report instead, and passes that failed on their own data report the error.

pub mod templates;

use crate::analysis::{find_extremes, ExtremesSet};
use crate::logging::{self, Stage};
use crate::model::{AnalysisError, Point};
use crate::pipeline::{ResolutionAnalysis, ResolutionOutcome};
use crate::resolutions::Resolution;
use serde::Serialize;
use std::fmt;
use templates::ExtremumSource;

/// Timestamp layout used when listing extreme periods.
const POINT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Report for one resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub resolution: Resolution,
    pub title: &'static str,
    pub body: ReportBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportBody {
    InsufficientData {
        buckets: usize,
        required: usize,
    },
    /// The pass ended on an error in its own data.
    Failed {
        error: String,
    },
    Analysis {
        extremes: ExtremesSet,
        /// Highest and lowest point of the component the narrative reads.
        peak: Point,
        low: Point,
        insights: Vec<String>,
    },
}

impl Report {
    pub fn is_sufficient(&self) -> bool {
        matches!(self.body, ReportBody::Analysis { .. })
    }

    /// Narrative lines; empty for an insufficient-data report.
    pub fn insights(&self) -> &[String] {
        match &self.body {
            ReportBody::Analysis { insights, .. } => insights,
            ReportBody::InsufficientData { .. } | ReportBody::Failed { .. } => &[],
        }
    }
}

/// Builds the report for one pass.
///
/// Extremes are taken over the observed series at `threshold`. The narrative
/// reads trend extrema for every resolution except Seasonal, which reads the
/// seasonal index.
pub fn build_report(analysis: &ResolutionAnalysis, threshold: f64) -> Result<Report, AnalysisError> {
    let resolution = analysis.resolution;
    let title = resolution.spec().title;

    let result = match &analysis.outcome {
        ResolutionOutcome::InsufficientData { buckets, required } => {
            return Ok(Report {
                resolution,
                title,
                body: ReportBody::InsufficientData {
                    buckets: *buckets,
                    required: *required,
                },
            });
        }
        ResolutionOutcome::Failed(error) => {
            return Ok(Report {
                resolution,
                title,
                body: ReportBody::Failed {
                    error: error.to_string(),
                },
            });
        }
        ResolutionOutcome::Decomposed(result) => result,
    };

    let extremes = find_extremes(&result.observed_series(), threshold)?;

    let component = match templates::extremum_source(resolution) {
        ExtremumSource::Trend => result.defined_trend(),
        ExtremumSource::Seasonal => result.seasonal_points(),
    };
    let (peak, low) = match (argmax(&component), argmin(&component)) {
        (Some(peak), Some(low)) => (peak, low),
        // The decomposer's length precondition leaves at least one defined
        // trend point, so this only fires on a hand-built result.
        _ => {
            return Err(AnalysisError::InsufficientData {
                period: result.period,
                required: 2 * result.period,
                available: result.len(),
            });
        }
    };

    let fmt = templates::time_format(resolution);
    logging::debug(
        Stage::Insight,
        Some(resolution.name()),
        &format!(
            "Peak {} ({:.2}), low {} ({:.2})",
            peak.timestamp.format(fmt),
            peak.value,
            low.timestamp.format(fmt),
            low.value
        ),
    );

    Ok(Report {
        resolution,
        title,
        body: ReportBody::Analysis {
            extremes,
            peak,
            low,
            insights: templates::narrative(resolution, peak.timestamp, low.timestamp),
        },
    })
}

/// First point holding the maximum value.
fn argmax(points: &[Point]) -> Option<Point> {
    points
        .iter()
        .copied()
        .reduce(|best, p| if p.value > best.value { p } else { best })
}

/// First point holding the minimum value.
fn argmin(points: &[Point]) -> Option<Point> {
    points
        .iter()
        .copied()
        .reduce(|best, p| if p.value < best.value { p } else { best })
}

fn write_points(f: &mut fmt::Formatter<'_>, points: &[Point]) -> fmt::Result {
    for p in points {
        writeln!(f, "{}    {:.2}", p.timestamp.format(POINT_FORMAT), p.value)?;
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            ReportBody::InsufficientData { buckets, required } => write!(
                f,
                "Not enough data for {} analysis ({} of {} buckets)",
                self.resolution.name(),
                buckets,
                required
            ),
            ReportBody::Failed { error } => write!(
                f,
                "Error in {} analysis: {}",
                self.resolution.name(),
                error
            ),
            ReportBody::Analysis {
                extremes, insights, ..
            } => {
                writeln!(f)?;
                writeln!(f, "{}:", self.title)?;
                writeln!(f, "Periods of Low Sales:")?;
                write_points(f, &extremes.low)?;
                writeln!(f)?;
                writeln!(f, "Periods of High Sales:")?;
                write_points(f, &extremes.high)?;
                writeln!(f)?;
                writeln!(f, "Insights for Improving Business:")?;
                for line in insights {
                    writeln!(f, "- {}", line)?;
                }
                Ok(())
            }
        }
    }
}

/// Plain-text rendering of a run, one block per report.
pub fn render_reports(reports: &[Report]) -> String {
    reports
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecompositionModel, DecompositionResult};
    use chrono::{NaiveDate, NaiveDateTime};

    fn month(y: i32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn hand_built(trend: Vec<Option<f64>>, seasonal: Vec<f64>) -> DecompositionResult {
        let n = trend.len();
        DecompositionResult {
            model: DecompositionModel::Additive,
            period: 2,
            timestamps: (0..n).map(|i| month(2023, 1 + i as u32)).collect(),
            observed: (0..n).map(|i| i as f64).collect(),
            residual: trend.iter().map(|t| t.map(|_| 0.0)).collect(),
            trend,
            seasonal,
        }
    }

    #[test]
    fn test_insufficient_report_text() {
        let analysis = ResolutionAnalysis {
            resolution: Resolution::Daily,
            outcome: ResolutionOutcome::InsufficientData {
                buckets: 13,
                required: 14,
            },
        };
        let report = build_report(&analysis, 0.25).unwrap();
        assert!(!report.is_sufficient());
        assert!(report.insights().is_empty());
        assert_eq!(report.to_string(), "Not enough data for daily analysis (13 of 14 buckets)");
    }

    #[test]
    fn test_failed_pass_report_text() {
        let analysis = ResolutionAnalysis {
            resolution: Resolution::Hourly,
            outcome: ResolutionOutcome::Failed(AnalysisError::DivisionByZero {
                component: "seasonal",
                position: 12,
            }),
        };
        let report = build_report(&analysis, 0.25).unwrap();
        assert!(!report.is_sufficient());
        assert!(report.insights().is_empty());
        assert_eq!(
            report.to_string(),
            "Error in hourly analysis: Division by zero: seasonal is zero at position 12"
        );
    }

    #[test]
    fn test_monthly_reads_trend_and_seasonal_reads_seasonal() {
        // Trend peaks in March (index 2); seasonal peaks in May (index 4).
        let result = hand_built(
            vec![None, Some(1.0), Some(9.0), Some(3.0), Some(2.0), None],
            vec![0.0, -1.0, 0.5, -2.0, 4.0, 0.0],
        );

        let monthly = build_report(
            &ResolutionAnalysis {
                resolution: Resolution::Monthly,
                outcome: ResolutionOutcome::Decomposed(result.clone()),
            },
            0.25,
        )
        .unwrap();
        let ReportBody::Analysis { peak, low, .. } = &monthly.body else {
            panic!("expected analysis body");
        };
        assert_eq!(peak.timestamp, month(2023, 3));
        assert_eq!(low.timestamp, month(2023, 2));

        let seasonal = build_report(
            &ResolutionAnalysis {
                resolution: Resolution::Seasonal,
                outcome: ResolutionOutcome::Decomposed(result),
            },
            0.25,
        )
        .unwrap();
        let ReportBody::Analysis { peak, low, .. } = &seasonal.body else {
            panic!("expected analysis body");
        };
        assert_eq!(peak.timestamp, month(2023, 5));
        assert_eq!(low.timestamp, month(2023, 4));
    }

    #[test]
    fn test_argmax_takes_first_of_ties() {
        let points = vec![
            Point::new(month(2023, 1), 5.0),
            Point::new(month(2023, 2), 5.0),
            Point::new(month(2023, 3), 1.0),
            Point::new(month(2023, 4), 1.0),
        ];
        assert_eq!(argmax(&points).unwrap().timestamp, month(2023, 1));
        assert_eq!(argmin(&points).unwrap().timestamp, month(2023, 3));
        assert!(argmax(&[]).is_none());
    }

    #[test]
    fn test_report_text_layout() {
        let result = hand_built(
            vec![None, Some(1.0), Some(9.0), Some(3.0), Some(2.0), None],
            vec![0.0; 6],
        );
        let report = build_report(
            &ResolutionAnalysis {
                resolution: Resolution::Monthly,
                outcome: ResolutionOutcome::Decomposed(result),
            },
            0.25,
        )
        .unwrap();
        let text = report.to_string();
        assert!(text.starts_with("\nMonthly Analysis:\nPeriods of Low Sales:\n"));
        assert!(text.contains("2023-01-01 00:00:00    0.00\n"));
        assert!(text.contains("Periods of High Sales:\n2023-06-01 00:00:00    5.00\n"));
        assert!(text.contains("Insights for Improving Business:\n- **Peak Sales Months:**"));
    }

    #[test]
    fn test_all_absent_trend_is_an_error() {
        let result = hand_built(vec![None; 4], vec![0.0; 4]);
        let analysis = ResolutionAnalysis {
            resolution: Resolution::Weekly,
            outcome: ResolutionOutcome::Decomposed(result),
        };
        assert!(matches!(
            build_report(&analysis, 0.25),
            Err(AnalysisError::InsufficientData { .. })
        ));
    }
}
