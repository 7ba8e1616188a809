//! Core data types for the sales insight service.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no I/O: only the time series containers, the decomposition
//! output, and the error taxonomy of the analysis core.

use chrono::NaiveDateTime;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Series types
// ---------------------------------------------------------------------------

/// A single `(timestamp, value)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Point {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// An ordered sequence of points.
///
/// Construction does not validate ordering; stages that depend on a strictly
/// increasing index call `check_index` and fail with
/// `AnalysisError::InvalidIndex`. Stages never mutate their input, they
/// return a fresh series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    pub points: Vec<Point>,
}

impl TimeSeries {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Verifies that timestamps are strictly increasing.
    ///
    /// Returns the first offending position: a timestamp equal to its
    /// predecessor is reported as a duplicate, a smaller one as out of order.
    pub fn check_index(&self) -> Result<(), AnalysisError> {
        for (i, pair) in self.points.windows(2).enumerate() {
            let (prev, cur) = (pair[0].timestamp, pair[1].timestamp);
            if cur == prev {
                return Err(AnalysisError::InvalidIndex {
                    position: i + 1,
                    timestamp: cur,
                    reason: "duplicate timestamp",
                });
            }
            if cur < prev {
                return Err(AnalysisError::InvalidIndex {
                    position: i + 1,
                    timestamp: cur,
                    reason: "timestamp out of order",
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Point> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Decomposition types
// ---------------------------------------------------------------------------

/// How trend, seasonal and residual combine into the observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionModel {
    /// observed = trend + seasonal + residual
    #[default]
    Additive,
    /// observed = trend * seasonal * residual
    Multiplicative,
}

impl std::fmt::Display for DecompositionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecompositionModel::Additive => write!(f, "additive"),
            DecompositionModel::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

impl std::str::FromStr for DecompositionModel {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(DecompositionModel::Additive),
            "multiplicative" => Ok(DecompositionModel::Multiplicative),
            other => Err(AnalysisError::Config(format!(
                "unknown decomposition model '{}'",
                other
            ))),
        }
    }
}

/// Output of classical decomposition: four parallel series over one index.
///
/// `trend` and `residual` are `None` for the half-period at each edge where
/// the centered moving average is undefined. `seasonal` is defined
/// everywhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompositionResult {
    pub model: DecompositionModel,
    pub period: usize,
    pub timestamps: Vec<NaiveDateTime>,
    pub observed: Vec<f64>,
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

impl DecompositionResult {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// The observed component as a standalone series.
    pub fn observed_series(&self) -> TimeSeries {
        self.timestamps
            .iter()
            .zip(&self.observed)
            .map(|(&t, &v)| Point::new(t, v))
            .collect()
    }

    /// Trend points where the moving average is defined.
    pub fn defined_trend(&self) -> Vec<Point> {
        defined_points(&self.timestamps, &self.trend)
    }

    /// Residual points where the moving average is defined.
    pub fn defined_residual(&self) -> Vec<Point> {
        defined_points(&self.timestamps, &self.residual)
    }

    pub fn seasonal_points(&self) -> Vec<Point> {
        self.timestamps
            .iter()
            .zip(&self.seasonal)
            .map(|(&t, &v)| Point::new(t, v))
            .collect()
    }
}

fn defined_points(timestamps: &[NaiveDateTime], values: &[Option<f64>]) -> Vec<Point> {
    timestamps
        .iter()
        .zip(values)
        .filter_map(|(&t, v)| v.map(|v| Point::new(t, v)))
        .collect()
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised by the analysis core.
///
/// A resolution failing its data-sufficiency gate is not an error; it is
/// reported as `pipeline::ResolutionOutcome::InsufficientData`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Input to aggregation is not strictly time-ordered.
    InvalidIndex {
        position: usize,
        timestamp: NaiveDateTime,
        reason: &'static str,
    },
    /// Period or series length precondition of the decomposer violated.
    /// The pipeline gate should make this unreachable.
    InsufficientData {
        period: usize,
        required: usize,
        available: usize,
    },
    /// A multiplicative decomposition hit a zero divisor.
    DivisionByZero {
        component: &'static str,
        position: usize,
    },
    /// Invalid threshold or model selection.
    Config(String),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::InvalidIndex {
                position,
                timestamp,
                reason,
            } => write!(f, "Invalid index at position {} ({}): {}", position, timestamp, reason),
            AnalysisError::InsufficientData {
                period,
                required,
                available,
            } => write!(
                f,
                "Insufficient data for period {}: need {} points, got {}",
                period, required, available
            ),
            AnalysisError::DivisionByZero { component, position } => {
                write!(f, "Division by zero: {} is zero at position {}", component, position)
            }
            AnalysisError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl AnalysisError {
    /// Whether the error belongs to the data of one resolution pass.
    ///
    /// Such errors end that pass only. Contract violations
    /// (`InsufficientData`, `Config`) end the run.
    pub fn is_pass_local(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidIndex { .. } | AnalysisError::DivisionByZero { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_check_index_accepts_strictly_increasing() {
        let series = TimeSeries::new(vec![
            Point::new(at(1, 0), 1.0),
            Point::new(at(1, 1), 2.0),
            Point::new(at(2, 0), 3.0),
        ]);
        assert!(series.check_index().is_ok());
    }

    #[test]
    fn test_check_index_rejects_duplicate() {
        let series = TimeSeries::new(vec![
            Point::new(at(1, 0), 1.0),
            Point::new(at(1, 0), 2.0),
        ]);
        match series.check_index() {
            Err(AnalysisError::InvalidIndex { position, reason, .. }) => {
                assert_eq!(position, 1);
                assert_eq!(reason, "duplicate timestamp");
            }
            other => panic!("expected InvalidIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_check_index_rejects_out_of_order() {
        let series = TimeSeries::new(vec![
            Point::new(at(1, 0), 1.0),
            Point::new(at(3, 0), 2.0),
            Point::new(at(2, 0), 3.0),
        ]);
        match series.check_index() {
            Err(AnalysisError::InvalidIndex { position, reason, .. }) => {
                assert_eq!(position, 2);
                assert_eq!(reason, "timestamp out of order");
            }
            other => panic!("expected InvalidIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_model_parses_case_insensitively() {
        assert_eq!("Additive".parse::<DecompositionModel>(), Ok(DecompositionModel::Additive));
        assert_eq!(
            " multiplicative ".parse::<DecompositionModel>(),
            Ok(DecompositionModel::Multiplicative)
        );
        assert!(matches!(
            "logistic".parse::<DecompositionModel>(),
            Err(AnalysisError::Config(_))
        ));
    }

    #[test]
    fn test_defined_trend_skips_absent_edges() {
        let result = DecompositionResult {
            model: DecompositionModel::Additive,
            period: 2,
            timestamps: vec![at(1, 0), at(2, 0), at(3, 0)],
            observed: vec![1.0, 2.0, 3.0],
            trend: vec![None, Some(2.0), None],
            seasonal: vec![0.0, 0.0, 0.0],
            residual: vec![None, Some(0.0), None],
        };
        let trend = result.defined_trend();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].timestamp, at(2, 0));
        assert_eq!(result.observed_series().total(), 6.0);
    }
}
