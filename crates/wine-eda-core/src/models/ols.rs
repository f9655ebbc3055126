//! Ordinary Least Squares (OLS) regression

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

use crate::diagnostics::leverage_kernel;
use crate::errors::{StatsError, StatsResult};
use crate::models::t_critical;
use crate::types::{
    CoefficientRow, FitResult, FitResultCore, FitResultInference, OlsOptions, TrainingSummary,
};

/// Fit an OLS regression model with intercept
///
/// Predictors are centered before forming the normal equations, so the
/// intercept is recovered as ȳ - Σ βⱼ·x̄ⱼ. The equations are solved through
/// the Cholesky inverse of the scatter matrix, which doubles as the leverage
/// kernel for prediction intervals.
///
/// # Arguments
/// * `y` - Response variable (n observations)
/// * `x` - Feature matrix (p features, each with n observations)
/// * `options` - Fitting options
///
/// # Returns
/// * `FitResult` containing coefficients, R-squared, and optionally inference statistics
pub fn fit_ols(y: &[f64], x: &[Vec<f64>], options: &OlsOptions) -> StatsResult<FitResult> {
    // Validate inputs
    if y.is_empty() {
        return Err(StatsError::EmptyInput { field: "y" });
    }
    if x.is_empty() {
        return Err(StatsError::EmptyInput { field: "x" });
    }

    let n_obs = y.len();
    let n_features = x.len();

    for col in x.iter() {
        if col.len() != n_obs {
            return Err(StatsError::DimensionMismatch {
                expected: n_obs,
                actual: col.len(),
            });
        }
    }

    // Rows with complete data only
    let valid: Vec<usize> = (0..n_obs)
        .filter(|&i| y[i].is_finite() && x.iter().all(|col| col[i].is_finite()))
        .collect();

    let n = valid.len();
    if n <= n_features + 1 {
        return Err(StatsError::InsufficientData {
            rows: n,
            cols: n_features,
        });
    }
    let n_f = n as f64;

    let means: Vec<f64> = x
        .iter()
        .map(|col| valid.iter().map(|&i| col[i]).mean())
        .collect();
    let y_mean = valid.iter().map(|&i| y[i]).mean();

    let ranges: Vec<(f64, f64)> = x
        .iter()
        .map(|col| {
            let values = || valid.iter().map(|&i| col[i]);
            (Statistics::min(values()), Statistics::max(values()))
        })
        .collect();
    let raw_squares: Vec<f64> = x
        .iter()
        .map(|col| valid.iter().map(|&i| col[i] * col[i]).sum())
        .collect();

    // Centered design and response
    let xc = Mat::<f64>::from_fn(n, n_features, |i, j| x[j][valid[i]] - means[j]);
    let yc = Col::<f64>::from_fn(n, |i| y[valid[i]] - y_mean);

    let xc_t = xc.as_ref().transpose();
    let scatter = xc_t * xc.as_ref();
    let xty = xc_t * yc.as_ref();

    let kernel = leverage_kernel(scatter.as_ref(), &raw_squares)?;
    let beta = kernel.as_ref() * xty.as_ref();

    let coefficients: Vec<f64> = (0..n_features).map(|j| beta[j]).collect();
    let intercept = y_mean
        - coefficients
            .iter()
            .zip(&means)
            .map(|(b, m)| b * m)
            .sum::<f64>();
    let scatter_inverse: Vec<Vec<f64>> = (0..n_features)
        .map(|i| (0..n_features).map(|j| kernel[(i, j)]).collect())
        .collect();

    let fitted = xc.as_ref() * beta.as_ref();

    let tss: f64 = (0..n).map(|i| yc[i] * yc[i]).sum();
    if tss <= 0.0 {
        return Err(StatsError::ConstantTarget);
    }
    let rss: f64 = (0..n).map(|i| (yc[i] - fitted[i]).powi(2)).sum();

    let df_resid = n - n_features - 1;
    let r_squared = 1.0 - rss / tss;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n_f - 1.0) / df_resid as f64;
    let residual_std_error = (rss / df_resid as f64).sqrt();

    let core = FitResultCore {
        coefficients,
        intercept,
        r_squared,
        adj_r_squared,
        residual_std_error,
        n_observations: n,
        n_features,
    };

    let training = TrainingSummary {
        means,
        scatter_inverse,
        ranges,
    };

    let inference = if options.compute_inference {
        Some(coefficient_table(
            &core,
            &training,
            df_resid,
            options.confidence_level,
        )?)
    } else {
        None
    };

    Ok(FitResult {
        core,
        inference,
        training,
    })
}

/// Standard errors, t values, p values and confidence bounds for the
/// intercept followed by each coefficient
#[allow(clippy::needless_range_loop)]
fn coefficient_table(
    core: &FitResultCore,
    training: &TrainingSummary,
    df_resid: usize,
    confidence_level: f64,
) -> StatsResult<FitResultInference> {
    let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
        .map_err(|e| StatsError::InvalidInput(e.to_string()))?;
    let t_crit = t_critical(confidence_level, df_resid)?;
    let s = core.residual_std_error;
    let k = core.n_features;
    let inv = &training.scatter_inverse;

    // Var(intercept) = s² (1/n + x̄' S⁻¹ x̄)
    let mut quad = 0.0;
    for j in 0..k {
        for l in 0..k {
            quad += training.means[j] * inv[j][l] * training.means[l];
        }
    }
    let intercept_se = s * (1.0 / core.n_observations as f64 + quad).sqrt();

    let estimates = std::iter::once((core.intercept, intercept_se)).chain(
        core.coefficients
            .iter()
            .enumerate()
            .map(|(j, b)| (*b, s * inv[j][j].sqrt())),
    );

    let rows = estimates
        .map(|(estimate, std_error)| {
            let t_value = estimate / std_error;
            let p_value = 2.0 * (1.0 - t_dist.cdf(t_value.abs()));
            CoefficientRow {
                estimate,
                std_error,
                t_value,
                p_value,
                ci_lower: estimate - t_crit * std_error,
                ci_upper: estimate + t_crit * std_error,
            }
        })
        .collect();

    Ok(FitResultInference {
        rows,
        confidence_level,
    })
}
