//! Low and high sales periods.

use crate::model::{AnalysisError, Point, TimeSeries};
use serde::Serialize;

/// Default fraction of points reported on each side.
pub const DEFAULT_THRESHOLD: f64 = 0.25;

/// Lowest- and highest-valued points of a series, both in ascending value
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremesSet {
    pub low: Vec<Point>,
    pub high: Vec<Point>,
}

/// Checks that `threshold` lies in `(0, 0.5]`.
pub fn validate_threshold(threshold: f64) -> Result<(), AnalysisError> {
    if threshold > 0.0 && threshold <= 0.5 {
        Ok(())
    } else {
        Err(AnalysisError::Config(format!(
            "extremes threshold must be in (0, 0.5], got {}",
            threshold
        )))
    }
}

/// Returns the lowest and highest `floor(threshold * n)` points of `observed`.
///
/// Points are ordered by value with a stable sort, so equal values keep their
/// time order. A non-empty series always yields at least one point per
/// slice; for a single point both slices hold that point.
pub fn find_extremes(observed: &TimeSeries, threshold: f64) -> Result<ExtremesSet, AnalysisError> {
    validate_threshold(threshold)?;

    let n = observed.len();
    if n == 0 {
        return Ok(ExtremesSet {
            low: Vec::new(),
            high: Vec::new(),
        });
    }

    let count = ((threshold * n as f64).floor() as usize).max(1);
    let mut sorted = observed.points.clone();
    sorted.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(ExtremesSet {
        low: sorted[..count].to_vec(),
        high: sorted[n - count..].to_vec(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
