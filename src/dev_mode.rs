//! Development mode utilities for working without a sales export
//!
//! When no real CSV is at hand, use this module to generate a synthetic
//! sales series with a known trend and seasonal cycle for testing and
//! development. Because the components are known, the decomposition output
//! can be checked against them.

use crate::model::{Point, TimeSeries};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::f64::consts::PI;

/// Configuration for a synthetic series:
/// `base + slope * i + amplitude * sin(2πi / period)` at `start + i * step`.
#[derive(Debug, Clone, PartialEq)]
pub struct DevMode {
    pub start: NaiveDateTime,
    pub step: Duration,
    pub points: usize,
    pub base: f64,
    /// Increase per step.
    pub slope: f64,
    pub amplitude: f64,
    /// Steps per seasonal cycle.
    pub period: usize,
}

impl DevMode {
    /// Daily series of `days` points with a weekly cycle, starting on a
    /// Monday so the cycle lines up with weekdays.
    ///
    /// # Arguments
    /// * `days` - Number of daily points to generate
    pub fn daily(days: usize) -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2022, 1, 3)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            step: Duration::days(1),
            points: days,
            base: 100.0,
            slope: 1.0,
            amplitude: 10.0,
            period: 7,
        }
    }

    /// Injected seasonal value at `index`.
    pub fn seasonal_at(&self, index: usize) -> f64 {
        let period = self.period.max(1);
        self.amplitude * (2.0 * PI * (index % period) as f64 / period as f64).sin()
    }

    /// Injected trend value at `index`.
    pub fn trend_at(&self, index: usize) -> f64 {
        self.base + self.slope * index as f64
    }

    /// Generates the series.
    pub fn generate(&self) -> TimeSeries {
        let mut timestamp = self.start;
        let mut points = Vec::with_capacity(self.points);
        for i in 0..self.points {
            points.push(Point::new(timestamp, self.trend_at(i) + self.seasonal_at(i)));
            timestamp += self.step;
        }
        TimeSeries::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    #[test]
    fn test_daily_dev_mode_defaults() {
        let dev = DevMode::daily(730);
        assert_eq!(dev.points, 730);
        assert_eq!(dev.period, 7);
        assert_eq!(dev.start.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_generate_is_regular_and_ordered() {
        let series = DevMode::daily(30).generate();
        assert_eq!(series.len(), 30);
        assert!(series.check_index().is_ok());
        let gap = series.points[1].timestamp - series.points[0].timestamp;
        assert_eq!(gap, Duration::days(1));
        assert_eq!(series.points[0].value, 100.0);
    }

    #[test]
    fn test_seasonal_cycle_repeats() {
        let dev = DevMode::daily(21);
        for i in 0..7 {
            assert!((dev.seasonal_at(i) - dev.seasonal_at(i + 7)).abs() < 1e-12);
        }
    }
}
