//! Narrative insight templates, one per resolution.
//!
//! Templates only look backwards: they name where the trend (or, for the
//! seasonal pass, the seasonal index) peaked and bottomed out and attach a
//! fixed recommended action. Nothing here predicts future values.

use crate::resolutions::Resolution;
use chrono::NaiveDateTime;

/// Which component a resolution's narrative reads its extrema from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumSource {
    /// Long-run drift.
    Trend,
    /// Recurring calendar position.
    Seasonal,
}

pub const HOURLY_ACTION: &str = "Adjust operational hours and marketing strategies based on the hourly trend. \
     If sales consistently dip at certain hours, consider revising store hours or running promotions \
     to attract customers during off-peak times.";

pub const DAILY_ACTION: &str = "Analyze daily sales trends to optimize inventory and staffing levels. \
     Ensure that high-traffic days are well-stocked and adequately staffed, and tailor marketing efforts \
     to attract customers on slower days.";

pub const WEEKLY_ACTION: &str = "Adjust marketing strategies based on weekly trends. Implement weekly \
     promotions to address sales fluctuations and prepare for high-sales weeks.";

pub const MONTHLY_ACTION: &str = "Prepare for this peak by increasing inventory and launching marketing campaigns.";

pub const SEASONAL_ACTION: &str = "Use seasonal patterns to optimize year-round business performance. \
     Build long-term plans around the high and low seasons to maximize sales and manage inventory effectively.";

/// Component whose extrema drive the narrative for `resolution`.
pub fn extremum_source(resolution: Resolution) -> ExtremumSource {
    match resolution {
        Resolution::Hourly | Resolution::Daily | Resolution::Weekly | Resolution::Monthly => {
            ExtremumSource::Trend
        }
        Resolution::Seasonal => ExtremumSource::Seasonal,
    }
}

/// How a peak or low timestamp is named at `resolution`'s granularity.
pub fn time_format(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Hourly => "%H:%M",
        Resolution::Daily => "%A",
        Resolution::Weekly => "%Y-%m-%d",
        Resolution::Monthly | Resolution::Seasonal => "%B",
    }
}

/// Fills `resolution`'s template with the peak and low timestamps.
pub fn narrative(resolution: Resolution, peak: NaiveDateTime, low: NaiveDateTime) -> Vec<String> {
    let fmt = time_format(resolution);
    let (peak, low) = (peak.format(fmt).to_string(), low.format(fmt).to_string());
    match resolution {
        Resolution::Hourly => hourly(&peak, &low),
        Resolution::Daily => daily(&peak, &low),
        Resolution::Weekly => weekly(&peak, &low),
        Resolution::Monthly => monthly(&peak, &low),
        Resolution::Seasonal => seasonal(&peak, &low),
    }
}

fn hourly(peak: &str, low: &str) -> Vec<String> {
    vec![
        format!(
            "**Peak Hours:** Based on the hourly trend, sales peak around {}. \
             Ensure optimal staffing and stock levels during these hours to maximize revenue.",
            peak
        ),
        format!(
            "**Low Sales Hours:** The hourly trend bottoms out around {}. \
             Run targeted promotions or discounts during these periods to boost sales.",
            low
        ),
        format!("**Trend Analysis:** {}", HOURLY_ACTION),
    ]
}

fn daily(peak: &str, low: &str) -> Vec<String> {
    vec![
        format!(
            "**Peak Sales Days:** The daily trend is highest on a {}. \
             Plan special offers or events on this day to further boost sales.",
            peak
        ),
        format!(
            "**Low Sales Days:** The daily trend is lowest on a {}. \
             Consider targeted promotions or discounts to improve sales on this day.",
            low
        ),
        format!("**Trend Analysis:** {}", DAILY_ACTION),
    ]
}

fn weekly(peak: &str, low: &str) -> Vec<String> {
    vec![
        format!(
            "**Peak Weeks:** The weekly trend peaked in the week starting {}. \
             Plan inventory and staffing levels accordingly to handle increased demand.",
            peak
        ),
        format!(
            "**Low Sales Weeks:** The weekly trend was lowest in the week starting {}. \
             Use promotions or discounts to lift sales in comparable weeks.",
            low
        ),
        format!("**Trend Analysis:** {}", WEEKLY_ACTION),
    ]
}

fn monthly(peak: &str, low: &str) -> Vec<String> {
    vec![
        format!(
            "**Peak Sales Months:** The monthly trend peaked in {}. {}",
            peak, MONTHLY_ACTION
        ),
        format!(
            "**Low Sales Months:** The monthly trend was lowest in {}. \
             Plan targeted promotions and adjust inventory to address low sales.",
            low
        ),
        "**Trend Analysis:** Use monthly trends to set realistic sales targets and adjust marketing \
         strategies, and plan inventory around the observed highs and lows."
            .to_string(),
    ]
}

fn seasonal(peak: &str, low: &str) -> Vec<String> {
    vec![
        format!(
            "**Peak Season:** The seasonal pattern is strongest in {}. \
             Plan major events and holiday campaigns for this period and increase inventory ahead of it.",
            peak
        ),
        format!(
            "**Low Season:** The seasonal pattern is weakest in {}. \
             Boost sales during this period with discounts or special promotions.",
            low
        ),
        format!("**Trend Analysis:** {}", SEASONAL_ACTION),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_only_seasonal_reads_seasonal_component() {
        for r in Resolution::ALL {
            let expected = if r == Resolution::Seasonal {
                ExtremumSource::Seasonal
            } else {
                ExtremumSource::Trend
            };
            assert_eq!(extremum_source(r), expected, "{:?}", r);
        }
    }

    #[test]
    fn test_every_template_has_three_bullets() {
        for r in Resolution::ALL {
            let lines = narrative(r, ts(2024, 3, 4, 17), ts(2024, 8, 11, 6));
            assert_eq!(lines.len(), 3, "{:?}", r);
        }
    }

    #[test]
    fn test_hourly_uses_clock_time() {
        let lines = narrative(Resolution::Hourly, ts(2024, 3, 4, 17), ts(2024, 3, 5, 6));
        assert!(lines[0].contains("17:00"));
        assert!(lines[1].contains("06:00"));
    }

    #[test]
    fn test_daily_uses_weekday_name() {
        // 2024-03-04 was a Monday, 2024-08-11 a Sunday.
        let lines = narrative(Resolution::Daily, ts(2024, 3, 4, 0), ts(2024, 8, 11, 0));
        assert!(lines[0].contains("Monday"));
        assert!(lines[1].contains("Sunday"));
    }

    #[test]
    fn test_weekly_uses_week_start_date() {
        let lines = narrative(Resolution::Weekly, ts(2024, 3, 4, 0), ts(2024, 8, 5, 0));
        assert!(lines[0].contains("2024-03-04"));
        assert!(lines[1].contains("2024-08-05"));
    }

    #[test]
    fn test_monthly_names_month_and_action() {
        let lines = narrative(Resolution::Monthly, ts(2023, 3, 1, 0), ts(2023, 11, 1, 0));
        assert!(lines[0].contains("March"));
        assert!(lines[0].contains(MONTHLY_ACTION));
        assert!(lines[1].contains("November"));
    }
}
