//! Resolution registry for the sales insight service.
//!
//! Defines the canonical set of temporal resolutions analysed on every run,
//! along with the bucket width used to aggregate raw records, the seasonal
//! period handed to the decomposer, and the minimum bucket count required
//! before a decomposition is attempted. This is the single source of truth
//! for those numbers; other modules look resolutions up here rather than
//! hardcoding periods or gates.

use chrono::{Datelike, Duration, Months, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Bucket widths
// ---------------------------------------------------------------------------

/// Calendar-aligned bucket used by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BucketWidth {
    /// Calendar hour, aligned to :00.
    Hour,
    /// Calendar day, aligned to midnight.
    Day,
    /// ISO week, starting Monday at midnight.
    Week,
    /// Calendar month, starting on the 1st at midnight.
    Month,
}

impl BucketWidth {
    /// Start of the bucket containing `ts`.
    pub fn floor(self, ts: NaiveDateTime) -> NaiveDateTime {
        let midnight = ts.date().and_time(NaiveTime::MIN);
        match self {
            BucketWidth::Hour => midnight + Duration::hours(i64::from(ts.hour())),
            BucketWidth::Day => midnight,
            BucketWidth::Week => {
                midnight - Duration::days(i64::from(ts.weekday().num_days_from_monday()))
            }
            BucketWidth::Month => midnight - Duration::days(i64::from(ts.day0())),
        }
    }

    /// Start of the bucket following the one starting at `start`.
    ///
    /// `start` must already be bucket-aligned. Returns `None` only when the
    /// result would leave chrono's representable range.
    pub fn next(self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            BucketWidth::Hour => start.checked_add_signed(Duration::hours(1)),
            BucketWidth::Day => start.checked_add_signed(Duration::days(1)),
            BucketWidth::Week => start.checked_add_signed(Duration::days(7)),
            BucketWidth::Month => start.checked_add_months(Months::new(1)),
        }
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketWidth::Hour => write!(f, "hour"),
            BucketWidth::Day => write!(f, "day"),
            BucketWidth::Week => write!(f, "week"),
            BucketWidth::Month => write!(f, "month"),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolutions
// ---------------------------------------------------------------------------

/// The fixed set of analysis resolutions, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resolution {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    /// Second pass over the monthly aggregation; reports seasonal rather
    /// than trend extrema.
    Seasonal,
}

impl Resolution {
    /// All resolutions in the order their reports are emitted.
    pub const ALL: [Resolution; 5] = [
        Resolution::Hourly,
        Resolution::Daily,
        Resolution::Weekly,
        Resolution::Monthly,
        Resolution::Seasonal,
    ];

    /// Registry entry for this resolution.
    pub fn spec(self) -> &'static ResolutionSpec {
        match self {
            Resolution::Hourly => &RESOLUTION_REGISTRY[0],
            Resolution::Daily => &RESOLUTION_REGISTRY[1],
            Resolution::Weekly => &RESOLUTION_REGISTRY[2],
            Resolution::Monthly => &RESOLUTION_REGISTRY[3],
            Resolution::Seasonal => &RESOLUTION_REGISTRY[4],
        }
    }

    /// Lower-case name used in sentinel text and log lines, e.g. "hourly".
    pub fn name(self) -> &'static str {
        match self {
            Resolution::Hourly => "hourly",
            Resolution::Daily => "daily",
            Resolution::Weekly => "weekly",
            Resolution::Monthly => "monthly",
            Resolution::Seasonal => "seasonal",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec().title)
    }
}

/// Static parameters of one resolution pass.
#[derive(Debug)]
pub struct ResolutionSpec {
    pub resolution: Resolution,
    /// Report heading, also the renderer title.
    pub title: &'static str,
    /// Width of the aggregation bucket.
    pub bucket: BucketWidth,
    /// Buckets per seasonal cycle.
    pub period: usize,
    /// Minimum bucket count before decomposition is attempted.
    pub min_buckets: usize,
}

/// Every resolution analysed per run, in report order.
///
/// Each gate is at least twice its period, so a pass that clears the gate
/// always satisfies the decomposer's length precondition.
pub static RESOLUTION_REGISTRY: &[ResolutionSpec] = &[
    ResolutionSpec {
        resolution: Resolution::Hourly,
        title: "Hourly Analysis",
        bucket: BucketWidth::Hour,
        period: 24,
        min_buckets: 48,
    },
    ResolutionSpec {
        resolution: Resolution::Daily,
        title: "Daily Analysis",
        bucket: BucketWidth::Day,
        period: 7,
        min_buckets: 14,
    },
    ResolutionSpec {
        resolution: Resolution::Weekly,
        title: "Weekly Analysis",
        bucket: BucketWidth::Week,
        period: 4,
        min_buckets: 8,
    },
    ResolutionSpec {
        resolution: Resolution::Monthly,
        title: "Monthly Analysis",
        bucket: BucketWidth::Month,
        period: 12,
        min_buckets: 24,
    },
    ResolutionSpec {
        resolution: Resolution::Seasonal,
        title: "Seasonal Analysis",
        bucket: BucketWidth::Month,
        period: 12,
        min_buckets: 24,
    },
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_registry_order_matches_report_order() {
        let order: Vec<_> = RESOLUTION_REGISTRY.iter().map(|s| s.resolution).collect();
        assert_eq!(order, Resolution::ALL.to_vec());
        for r in Resolution::ALL {
            assert_eq!(r.spec().resolution, r, "spec() returned wrong entry for {:?}", r);
        }
    }

    #[test]
    fn test_gates_cover_two_full_periods() {
        // The decomposer needs len >= 2 * period; a gate below that would let
        // InsufficientData escape the pipeline.
        for spec in RESOLUTION_REGISTRY {
            assert!(spec.period >= 2, "period for '{}' must be >= 2", spec.title);
            assert!(
                spec.min_buckets >= 2 * spec.period,
                "gate for '{}' ({}) is below 2 * period ({})",
                spec.title,
                spec.min_buckets,
                spec.period
            );
        }
    }

    #[test]
    fn test_fixed_policy_values() {
        let expect = [
            (Resolution::Hourly, BucketWidth::Hour, 24, 48),
            (Resolution::Daily, BucketWidth::Day, 7, 14),
            (Resolution::Weekly, BucketWidth::Week, 4, 8),
            (Resolution::Monthly, BucketWidth::Month, 12, 24),
            (Resolution::Seasonal, BucketWidth::Month, 12, 24),
        ];
        for (r, bucket, period, min) in expect {
            let spec = r.spec();
            assert_eq!(spec.bucket, bucket);
            assert_eq!(spec.period, period);
            assert_eq!(spec.min_buckets, min);
        }
    }

    #[test]
    fn test_floor_hour_and_day() {
        let t = ts(2024, 5, 1, 13, 47);
        assert_eq!(BucketWidth::Hour.floor(t), ts(2024, 5, 1, 13, 0));
        assert_eq!(BucketWidth::Day.floor(t), ts(2024, 5, 1, 0, 0));
    }

    #[test]
    fn test_floor_week_starts_monday() {
        // 2024-05-01 was a Wednesday; its ISO week starts Monday 2024-04-29.
        assert_eq!(BucketWidth::Week.floor(ts(2024, 5, 1, 9, 30)), ts(2024, 4, 29, 0, 0));
        // A Monday floors to itself.
        assert_eq!(BucketWidth::Week.floor(ts(2024, 4, 29, 0, 0)), ts(2024, 4, 29, 0, 0));
        // Sunday belongs to the week that started six days earlier.
        assert_eq!(BucketWidth::Week.floor(ts(2024, 5, 5, 23, 59)), ts(2024, 4, 29, 0, 0));
    }

    #[test]
    fn test_floor_and_next_month() {
        assert_eq!(BucketWidth::Month.floor(ts(2024, 2, 29, 18, 0)), ts(2024, 2, 1, 0, 0));
        assert_eq!(BucketWidth::Month.next(ts(2024, 1, 1, 0, 0)), Some(ts(2024, 2, 1, 0, 0)));
        assert_eq!(BucketWidth::Month.next(ts(2024, 12, 1, 0, 0)), Some(ts(2025, 1, 1, 0, 0)));
    }
}
