//! Classical seasonal decomposition.
//!
//! Splits a regularly spaced series into trend, seasonal and residual parts:
//!
//! 1. Trend: centered moving average over one period. An even period uses the
//!    2×period average (half weight on both end points) so the window stays
//!    centered on the current point.
//! 2. Detrend: subtract (additive) or divide by (multiplicative) the trend.
//! 3. Seasonal: average detrended values per position within the period,
//!    normalized to sum to zero (additive) or average one (multiplicative),
//!    then tiled across the series.
//! 4. Residual: what is left of the observed value.
//!
//! Trend and residual are undefined for the first and last `period / 2`
//! points.

use crate::model::{AnalysisError, DecompositionModel, DecompositionResult, TimeSeries};

/// Decomposes `series` with the given seasonal `period` and `model`.
///
/// Requires `period >= 2` and at least two full periods of data, otherwise
/// fails with `AnalysisError::InsufficientData`. A multiplicative model fails
/// with `AnalysisError::DivisionByZero` if a defined trend value, the seasonal
/// normalizer, or a seasonal index is zero.
pub fn decompose(
    series: &TimeSeries,
    period: usize,
    model: DecompositionModel,
) -> Result<DecompositionResult, AnalysisError> {
    let observed = series.values();
    let n = observed.len();
    let required = 2 * period.max(2);
    if period < 2 || n < required {
        return Err(AnalysisError::InsufficientData {
            period,
            required,
            available: n,
        });
    }

    let trend = centered_moving_average(&observed, period);

    if model == DecompositionModel::Multiplicative {
        if let Some(position) = trend.iter().position(|t| *t == Some(0.0)) {
            return Err(AnalysisError::DivisionByZero {
                component: "trend",
                position,
            });
        }
    }

    let detrended: Vec<Option<f64>> = observed
        .iter()
        .zip(&trend)
        .map(|(&y, t)| {
            t.map(|t| match model {
                DecompositionModel::Additive => y - t,
                DecompositionModel::Multiplicative => y / t,
            })
        })
        .collect();

    let indices = seasonal_indices(&detrended, period, model)?;
    let seasonal: Vec<f64> = (0..n).map(|i| indices[i % period]).collect();

    let residual = observed
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((&y, t), &s)| {
            t.map(|t| match model {
                DecompositionModel::Additive => y - t - s,
                DecompositionModel::Multiplicative => y / (t * s),
            })
        })
        .collect();

    Ok(DecompositionResult {
        model,
        period,
        timestamps: series.timestamps(),
        observed,
        trend,
        seasonal,
        residual,
    })
}

/// Centered moving average of window `period`; `None` where the window would
/// run off either end.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let half = period / 2;
    let width = period as f64;

    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let window = &values[i - half..=i + half];
            let sum: f64 = if period % 2 == 0 {
                // 2xMA: window has period + 1 points, ends weighted by one half.
                let inner: f64 = window[1..period].iter().sum();
                inner + 0.5 * (window[0] + window[period])
            } else {
                window.iter().sum()
            };
            Some(sum / width)
        })
        .collect()
}

/// Per-position seasonal index, normalized for the model.
fn seasonal_indices(
    detrended: &[Option<f64>],
    period: usize,
    model: DecompositionModel,
) -> Result<Vec<f64>, AnalysisError> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, value) in detrended.iter().enumerate() {
        if let Some(v) = value {
            sums[i % period] += v;
            counts[i % period] += 1;
        }
    }

    // Two full periods guarantee at least `period` consecutive defined
    // points, so every position has a count.
    let averages: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| s / c.max(1) as f64)
        .collect();
    let mean = averages.iter().sum::<f64>() / period as f64;

    match model {
        DecompositionModel::Additive => Ok(averages.iter().map(|a| a - mean).collect()),
        DecompositionModel::Multiplicative => {
            if mean == 0.0 {
                return Err(AnalysisError::DivisionByZero {
                    component: "seasonal mean",
                    position: 0,
                });
            }
            let indices: Vec<f64> = averages.iter().map(|a| a / mean).collect();
            if let Some(position) = indices.iter().position(|s| *s == 0.0) {
                return Err(AnalysisError::DivisionByZero {
                    component: "seasonal",
                    position,
                });
            }
            Ok(indices)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
