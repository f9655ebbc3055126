//! Leverage of predictor rows relative to a fitted model's training data

use faer::prelude::*;
use faer::Side;

use crate::errors::{StatsError, StatsResult};
use crate::types::TrainingSummary;

/// Leverage of a single predictor row
///
/// With centered predictors the hat value of a row x₀ is
/// h₀ = 1/n + (x₀ - x̄)' (X_c' X_c)⁻¹ (x₀ - x̄),
/// i.e. the Mahalanobis-style distance of x₀ from the training centroid.
#[allow(clippy::needless_range_loop)]
pub fn leverage(
    row: &[f64],
    training: &TrainingSummary,
    n_observations: usize,
) -> StatsResult<f64> {
    let k = training.means.len();
    if row.len() != k {
        return Err(StatsError::DimensionMismatch {
            expected: k,
            actual: row.len(),
        });
    }
    if n_observations == 0 {
        return Err(StatsError::EmptyInput {
            field: "training data",
        });
    }

    let d: Vec<f64> = row.iter().zip(&training.means).map(|(x, m)| x - m).collect();

    let mut quad = 0.0;
    for j in 0..k {
        for l in 0..k {
            quad += d[j] * training.scatter_inverse[j][l] * d[l];
        }
    }

    Ok(1.0 / n_observations as f64 + quad)
}

/// Leverage of every row of a column-major predictor matrix
pub fn compute_leverage(
    x: &[Vec<f64>],
    training: &TrainingSummary,
    n_observations: usize,
) -> StatsResult<Vec<f64>> {
    let n_rows = x.first().map(|c| c.len()).unwrap_or(0);
    (0..n_rows)
        .map(|i| {
            let row: Vec<f64> = x.iter().map(|col| col[i]).collect();
            leverage(&row, training, n_observations)
        })
        .collect()
}

/// Smallest centered sum of squares, relative to the raw sum of squares,
/// that still counts as a varying predictor
const VARIANCE_FLOOR: f64 = 1e-20;

/// Smallest eigenvalue of the predictor correlation matrix, relative to the
/// largest, that still counts as full rank
const CONDITION_FLOOR: f64 = 1e-10;

/// Inverse scatter matrix (X_c' X_c)⁻¹ of a centered design
///
/// The scatter matrix is rescaled to unit diagonal D⁻¹ S D⁻¹ before it is
/// factored, so the rank test depends on the correlation between predictors
/// and not on their units. `raw_squares` holds Σ x² of each uncentered
/// column and flags constant predictors.
pub(crate) fn leverage_kernel(
    scatter: MatRef<'_, f64>,
    raw_squares: &[f64],
) -> StatsResult<Mat<f64>> {
    let k = scatter.nrows();
    if k == 0 || scatter.ncols() != k || raw_squares.len() != k {
        return Err(StatsError::DimensionMismatch {
            expected: k,
            actual: raw_squares.len(),
        });
    }

    let scale = (0..k)
        .map(|j| {
            let ss = scatter[(j, j)];
            if ss.is_finite() && ss > VARIANCE_FLOOR * raw_squares[j] {
                Ok(ss.sqrt())
            } else {
                Err(StatsError::SingularMatrix)
            }
        })
        .collect::<StatsResult<Vec<f64>>>()?;

    let unit = Mat::<f64>::from_fn(k, k, |i, j| scatter[(i, j)] / (scale[i] * scale[j]));

    let eigenvalues = unit.selfadjoint_eigenvalues(Side::Lower);
    let largest = eigenvalues.iter().copied().fold(0.0, f64::max);
    let smallest = eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
    if smallest.is_nan() || smallest <= CONDITION_FLOOR * largest {
        return Err(StatsError::SingularMatrix);
    }

    let unit_inverse = unit
        .cholesky(Side::Lower)
        .map_err(|_| StatsError::SingularMatrix)?
        .inverse();

    Ok(Mat::from_fn(k, k, |i, j| unit_inverse[(i, j)] / (scale[i] * scale[j])))
}
