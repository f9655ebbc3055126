//! Point predictions and prediction intervals for fitted OLS models
//!
//! For a new row x₀ the prediction interval is
//! ŷ ± t(1-α/2, n-p-1) · s · √(1 + h₀),
//! where s is the residual standard error and h₀ the row's leverage.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::diagnostics::compute_leverage;
use crate::errors::{StatsError, StatsResult};
use crate::types::{FitResult, PredictOptions, PredictionResult, TrainingSummary};

/// Make predictions using fitted model coefficients
///
/// # Arguments
/// * `x` - Feature matrix (p features, each with n observations)
/// * `coefficients` - Fitted coefficients (p values)
/// * `intercept` - Intercept term
///
/// # Returns
/// * Vector of predicted values (n observations)
pub fn predict(x: &[Vec<f64>], coefficients: &[f64], intercept: f64) -> StatsResult<Vec<f64>> {
    if x.is_empty() {
        return Err(StatsError::EmptyInput { field: "x" });
    }
    if coefficients.is_empty() {
        return Err(StatsError::EmptyInput {
            field: "coefficients",
        });
    }
    if x.len() != coefficients.len() {
        return Err(StatsError::DimensionMismatch {
            expected: coefficients.len(),
            actual: x.len(),
        });
    }

    let n_obs = x[0].len();
    for col in x.iter() {
        if col.len() != n_obs {
            return Err(StatsError::DimensionMismatch {
                expected: n_obs,
                actual: col.len(),
            });
        }
    }

    Ok((0..n_obs)
        .map(|i| {
            intercept
                + coefficients
                    .iter()
                    .zip(x)
                    .map(|(coef, col)| coef * col[i])
                    .sum::<f64>()
        })
        .collect())
}

/// Critical value of the t-distribution for a two-sided interval
///
/// # Arguments
/// * `confidence_level` - Confidence level (e.g., 0.95 for 95% CI)
/// * `df` - Degrees of freedom (n - p - 1 for regression)
pub fn t_critical(confidence_level: f64, df: usize) -> StatsResult<f64> {
    if df == 0 {
        return Err(StatsError::InsufficientData { rows: 0, cols: 0 });
    }
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(StatsError::InvalidInput(format!(
            "confidence level {} is outside (0, 1)",
            confidence_level
        )));
    }

    let t_dist = StudentsT::new(0.0, 1.0, df as f64)
        .map_err(|e| StatsError::InvalidInput(e.to_string()))?;

    // Two-tailed critical value: quantile at (1 + confidence_level) / 2
    Ok(t_dist.inverse_cdf((1.0 + confidence_level) / 2.0))
}

/// Per-row predictions plus the average interval offsets
#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub results: Vec<PredictionResult>,
    /// mean(lower - fit) across rows
    pub mean_lower_offset: f64,
    /// mean(upper - fit) across rows
    pub mean_upper_offset: f64,
    pub confidence_level: f64,
}

/// Reject rows whose values fall outside `[min - g·span, max + g·span]`;
/// `column_name` labels the offending feature by its index
fn check_ranges(
    x: &[Vec<f64>],
    training: &TrainingSummary,
    guard: f64,
    column_name: &dyn Fn(usize) -> String,
) -> StatsResult<()> {
    if !(guard.is_finite() && guard >= 0.0) {
        return Err(StatsError::InvalidInput(format!(
            "range guard {} must be a non-negative fraction",
            guard
        )));
    }
    for (j, (col, (min, max))) in x.iter().zip(&training.ranges).enumerate() {
        let margin = guard * (max - min);
        let (lo, hi) = (min - margin, max + margin);
        if let Some((row, value)) = col.iter().enumerate().find(|(_, v)| **v < lo || **v > hi) {
            return Err(StatsError::OutOfRange {
                row,
                column: column_name(j),
                value: *value,
                min: lo,
                max: hi,
            });
        }
    }
    Ok(())
}

/// Predict new rows with prediction intervals
///
/// # Arguments
/// * `fit` - Fitted OLS model
/// * `x` - New rows, column-major in the model's feature order
/// * `options` - Confidence level and optional range guard
///
/// Range-guard errors name features `x0`, `x1`, ...
pub fn predict_with_interval(
    fit: &FitResult,
    x: &[Vec<f64>],
    options: &PredictOptions,
) -> StatsResult<PredictionReport> {
    predict_with_named_interval(fit, x, options, &|j| format!("x{}", j))
}

/// [`predict_with_interval`] with range-guard errors labelled by `column_name`
pub(crate) fn predict_with_named_interval(
    fit: &FitResult,
    x: &[Vec<f64>],
    options: &PredictOptions,
    column_name: &dyn Fn(usize) -> String,
) -> StatsResult<PredictionReport> {
    let core = &fit.core;
    let fits = predict(x, &core.coefficients, core.intercept)?;
    if fits.is_empty() {
        return Err(StatsError::EmptyInput { field: "x" });
    }
    if let Some(guard) = options.range_guard {
        check_ranges(x, &fit.training, guard, column_name)?;
    }

    let df = core.n_observations - core.n_features - 1;
    let t_crit = t_critical(options.confidence_level, df)?;

    let leverages = compute_leverage(x, &fit.training, core.n_observations)?;

    let mut results = Vec::with_capacity(fits.len());
    for (i, h) in leverages.iter().enumerate() {
        let inputs: Vec<f64> = x.iter().map(|col| col[i]).collect();
        let half_width = t_crit * core.residual_std_error * (1.0 + h).sqrt();

        results.push(PredictionResult {
            inputs,
            fit: fits[i],
            lower: fits[i] - half_width,
            upper: fits[i] + half_width,
        });
    }

    let n = results.len() as f64;
    let mean_lower_offset = results.iter().map(|r| r.lower - r.fit).sum::<f64>() / n;
    let mean_upper_offset = results.iter().map(|r| r.upper - r.fit).sum::<f64>() / n;

    Ok(PredictionReport {
        results,
        mean_lower_offset,
        mean_upper_offset,
        confidence_level: options.confidence_level,
    })
}
