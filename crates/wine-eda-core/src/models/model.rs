//! Column-named regression models over the wine table

use tracing::debug;

use crate::dataset::WineTable;
use crate::errors::{StatsError, StatsResult};
use crate::models::predict::predict_with_named_interval;
use crate::models::{fit_ols, PredictionReport};
use crate::types::{Column, FitResult, OlsOptions, PredictOptions};

/// OLS model of `target` on an ordered list of predictor columns
///
/// Fitted once, then read-only.
#[derive(Debug, Clone)]
pub struct RegressionModel {
    target: Column,
    predictors: Vec<Column>,
    fit: FitResult,
}

impl RegressionModel {
    /// Fit `target ~ predictors` on every row of `table`
    pub fn fit(
        table: &WineTable,
        target: Column,
        predictors: &[Column],
        options: &OlsOptions,
    ) -> StatsResult<Self> {
        if predictors.is_empty() {
            return Err(StatsError::EmptyInput {
                field: "predictors",
            });
        }
        if let Some(dup) = predictors
            .iter()
            .enumerate()
            .find(|(i, c)| predictors[..*i].contains(*c) || **c == target)
            .map(|(_, c)| c)
        {
            return Err(StatsError::InvalidInput(format!(
                "predictor '{}' is repeated or equals the target",
                dup
            )));
        }

        let y = table.column(target);
        let x = table.columns(predictors);
        let fit = fit_ols(&y, &x, options)?;

        debug!(
            target = %target,
            predictors = ?predictors.iter().map(|c| c.name()).collect::<Vec<_>>(),
            r_squared = fit.core.r_squared,
            "fitted regression model"
        );

        Ok(Self {
            target,
            predictors: predictors.to_vec(),
            fit,
        })
    }

    /// Refit from scratch with one more predictor appended
    pub fn with_predictor(
        &self,
        table: &WineTable,
        predictor: Column,
        options: &OlsOptions,
    ) -> StatsResult<Self> {
        let mut predictors = self.predictors.clone();
        predictors.push(predictor);
        Self::fit(table, self.target, &predictors, options)
    }

    pub fn target(&self) -> Column {
        self.target
    }

    pub fn predictors(&self) -> &[Column] {
        &self.predictors
    }

    pub fn result(&self) -> &FitResult {
        &self.fit
    }

    pub fn r_squared(&self) -> f64 {
        self.fit.core.r_squared
    }

    pub fn intercept(&self) -> f64 {
        self.fit.core.intercept
    }

    /// Fitted coefficient of `column`, if it is a predictor
    pub fn coefficient(&self, column: Column) -> Option<f64> {
        self.predictors
            .iter()
            .position(|c| *c == column)
            .map(|idx| self.fit.core.coefficients[idx])
    }

    /// Prediction intervals for new rows given column-major in
    /// [`predictors`](Self::predictors) order
    pub fn predict(
        &self,
        x: &[Vec<f64>],
        options: &PredictOptions,
    ) -> StatsResult<PredictionReport> {
        predict_with_named_interval(&self.fit, x, options, &|j| {
            self.predictors[j].name().to_string()
        })
    }
}

/// Fit the nested models `predictors[..1]`, `predictors[..2]`, ... in order
pub fn fit_incremental(
    table: &WineTable,
    target: Column,
    predictors: &[Column],
    options: &OlsOptions,
) -> StatsResult<Vec<RegressionModel>> {
    let (first, rest) = predictors.split_first().ok_or(StatsError::EmptyInput {
        field: "predictors",
    })?;

    let mut models = vec![RegressionModel::fit(table, target, &[*first], options)?];
    for predictor in rest {
        let next = models[models.len() - 1].with_predictor(table, *predictor, options)?;
        models.push(next);
    }
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// quality ≈ 0.4·alcohol - 30·(density - 0.995) + noise
    fn sample_table() -> WineTable {
        let rows = [
            (9.4, 0.9978, 7.4, 5),
            (9.8, 0.9968, 7.8, 5),
            (9.8, 0.9970, 11.2, 6),
            (10.5, 0.9951, 7.3, 6),
            (12.8, 0.9912, 6.2, 7),
            (11.0, 0.9940, 6.8, 6),
            (9.0, 0.9990, 8.1, 5),
            (13.1, 0.9905, 6.5, 8),
            (10.1, 0.9962, 7.0, 5),
            (11.9, 0.9930, 6.9, 7),
            (12.2, 0.9921, 8.4, 6),
            (8.9, 0.9985, 9.9, 4),
        ];
        let rows = rows
            .iter()
            .map(|(alcohol, density, fixed, quality)| {
                let mut m = [1.0; 11];
                m[0] = *fixed;
                m[7] = *density;
                m[10] = *alcohol;
                (m, *quality)
            })
            .collect();
        WineTable::combine(rows, Vec::new())
    }

    #[test]
    fn test_fit_named_model() {
        let table = sample_table();
        let options = OlsOptions::default();
        let model = RegressionModel::fit(&table, Column::Quality, &[Column::Alcohol], &options)
            .unwrap();

        assert_eq!(model.predictors(), &[Column::Alcohol]);
        assert!(model.coefficient(Column::Alcohol).unwrap() > 0.0);
        assert!(model.coefficient(Column::Density).is_none());
        assert!(model.r_squared() > 0.5);
    }

    #[test]
    fn test_incremental_r_squared_non_decreasing() {
        let table = sample_table();
        let models = fit_incremental(
            &table,
            Column::Quality,
            &[Column::Alcohol, Column::Density, Column::FixedAcidity],
            &OlsOptions::default(),
        )
        .unwrap();

        assert_eq!(models.len(), 3);
        assert_eq!(models[2].predictors().len(), 3);
        for pair in models.windows(2) {
            assert!(pair[1].r_squared() >= pair[0].r_squared() - 1e-12);
        }
    }

    #[test]
    fn test_rejects_target_as_predictor() {
        let table = sample_table();
        let result = RegressionModel::fit(
            &table,
            Column::Quality,
            &[Column::Alcohol, Column::Quality],
            &OlsOptions::default(),
        );
        assert!(matches!(result, Err(StatsError::InvalidInput(_))));

        let result = RegressionModel::fit(
            &table,
            Column::Quality,
            &[Column::Alcohol, Column::Alcohol],
            &OlsOptions::default(),
        );
        assert!(matches!(result, Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_constant_predictor_is_singular() {
        // Chlorides is 1.0 on every row
        let table = sample_table();
        let result = RegressionModel::fit(
            &table,
            Column::Quality,
            &[Column::Alcohol, Column::Chlorides],
            &OlsOptions::default(),
        );
        assert!(matches!(result, Err(StatsError::SingularMatrix)));
    }

    #[test]
    fn test_out_of_range_names_predictor() {
        let table = sample_table();
        let model = RegressionModel::fit(
            &table,
            Column::Quality,
            &[Column::Alcohol, Column::Density],
            &OlsOptions::default(),
        )
        .unwrap();

        let options = PredictOptions {
            range_guard: Some(0.1),
            ..Default::default()
        };
        let result = model.predict(&[vec![10.0], vec![1.2]], &options);
        match result {
            Err(StatsError::OutOfRange { row, column, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "density");
            }
            other => panic!("expected out-of-range error, got {:?}", other),
        }
    }

    #[test]
    fn test_fit_incremental_empty() {
        let result = fit_incremental(&sample_table(), Column::Quality, &[], &OlsOptions::default());
        assert!(matches!(result, Err(StatsError::EmptyInput { .. })));
    }
}
