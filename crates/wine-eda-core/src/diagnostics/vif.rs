//! Collinearity diagnostics for multi-predictor models

use crate::errors::{StatsError, StatsResult};
use crate::models::fit_ols;
use crate::types::OlsOptions;

/// Variance inflation factor of each predictor column
///
/// Predictor j is regressed on the remaining predictors and
/// VIF_j = 1 / (1 - R²_j). A predictor the others explain almost exactly
/// (R² >= 0.9999, or a singular fit) gets `f64::INFINITY`; a lone predictor
/// gets 1. Values above 10 usually mean the coefficients of the model are
/// unstable.
pub fn compute_vif(x: &[Vec<f64>]) -> StatsResult<Vec<f64>> {
    let n_features = x.len();

    if n_features == 0 {
        return Err(StatsError::EmptyInput { field: "x" });
    }

    if n_features == 1 {
        return Ok(vec![1.0]);
    }

    let n_obs = x[0].len();
    if n_obs == 0 {
        return Err(StatsError::EmptyInput { field: "x" });
    }
    for col in x.iter() {
        if col.len() != n_obs {
            return Err(StatsError::DimensionMismatch {
                expected: n_obs,
                actual: col.len(),
            });
        }
    }

    let options = OlsOptions {
        compute_inference: false,
        ..Default::default()
    };

    let mut vif_values = Vec::with_capacity(n_features);
    for j in 0..n_features {
        let others: Vec<Vec<f64>> = x
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != j)
            .map(|(_, col)| col.clone())
            .collect();

        let vif = match fit_ols(&x[j], &others, &options) {
            Ok(result) if result.core.r_squared < 0.9999 => {
                1.0 / (1.0 - result.core.r_squared.max(0.0))
            }
            Ok(_) | Err(StatsError::SingularMatrix) => f64::INFINITY,
            Err(e) => return Err(e),
        };
        vif_values.push(vif);
    }

    Ok(vif_values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vif_single_feature() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]];
        let result = compute_vif(&x).unwrap();
        assert_eq!(result, vec![1.0]);
    }

    #[test]
    fn test_vif_uncorrelated_features() {
        // Orthogonal after centering
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let x2 = vec![1.0, -1.0, -1.0, -1.0, -1.0, 1.0];
        let result = compute_vif(&[x1, x2]).unwrap();

        assert_eq!(result.len(), 2);
        for v in result {
            assert!((v - 1.0).abs() < 1e-8);
        }
    }

    #[test]
    fn test_vif_correlated_features() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let x2 = vec![1.1, 2.0, 2.9, 4.2, 4.9, 6.1];
        let result = compute_vif(&[x1, x2]).unwrap();

        assert!(result[0] > 10.0);
        assert!(result[1] > 10.0);
    }

    #[test]
    fn test_vif_constant_feature_errors() {
        // A constant regressand has zero variance, so its R² is undefined
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let x2 = vec![3.0; 5];
        let result = compute_vif(&[x1, x2]);
        assert!(matches!(result, Err(StatsError::ConstantTarget)));
    }
}
