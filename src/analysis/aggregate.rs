//! Calendar bucketing of raw sales records.

use crate::model::{AnalysisError, Point, TimeSeries};
use crate::resolutions::BucketWidth;

/// Sums `series` into consecutive, calendar-aligned buckets of `width`.
///
/// Every bucket from the one holding the first point to the one holding the
/// last point is emitted, including empty ones (sum 0.0), so the output is a
/// regular grid suitable for decomposition. Output points are stamped with
/// the bucket start and sorted ascending.
///
/// Fails with `AnalysisError::InvalidIndex` if the input timestamps are not
/// strictly increasing.
pub fn aggregate(series: &TimeSeries, width: BucketWidth) -> Result<TimeSeries, AnalysisError> {
    series.check_index()?;

    let Some(first) = series.points.first() else {
        return Ok(TimeSeries::default());
    };

    let mut buckets = Vec::new();
    let mut start = width.floor(first.timestamp);
    let mut sum = 0.0;

    for (position, point) in series.points.iter().enumerate() {
        let bucket = width.floor(point.timestamp);
        // Close the current bucket and any empty ones between it and this point.
        while start < bucket {
            buckets.push(Point::new(start, sum));
            sum = 0.0;
            start = width.next(start).ok_or(AnalysisError::InvalidIndex {
                position,
                timestamp: point.timestamp,
                reason: "bucket boundary out of range",
            })?;
        }
        sum += point.value;
    }
    buckets.push(Point::new(start, sum));

    Ok(TimeSeries::new(buckets))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
