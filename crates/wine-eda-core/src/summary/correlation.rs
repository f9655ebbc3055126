//! Pearson correlation between numeric columns
//!
//! - Pearson product-moment coefficient
//! - Strength classes: High (|r| >= 0.5), Medium (0.3 <= |r| < 0.5), Low
//! - Pairwise matrix over any set of columns
//!
//! A column with zero variance has no defined correlation; the matrix
//! reports such pairs as [`Correlation::Undefined`] instead of 0.

use std::collections::BTreeMap;

use statrs::statistics::Statistics;
use tracing::warn;

use crate::dataset::WineTable;
use crate::errors::{StatsError, StatsResult};
use crate::types::{Column, WineColor};

/// Magnitude class of a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CorrelationStrength {
    Low,
    Medium,
    High,
}

impl CorrelationStrength {
    pub fn from_r(r: f64) -> Self {
        let a = r.abs();
        if a >= 0.5 {
            CorrelationStrength::High
        } else if a >= 0.3 {
            CorrelationStrength::Medium
        } else {
            CorrelationStrength::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CorrelationStrength::Low => "low",
            CorrelationStrength::Medium => "medium",
            CorrelationStrength::High => "high",
        }
    }
}

/// Correlation of one column pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Defined { r: f64, strength: CorrelationStrength },
    Undefined,
}

impl Correlation {
    fn from_result(result: StatsResult<f64>) -> StatsResult<Self> {
        match result {
            Ok(r) => Ok(Correlation::Defined {
                r,
                strength: CorrelationStrength::from_r(r),
            }),
            Err(StatsError::UndefinedCorrelation { x, y }) => {
                warn!(x = %x, y = %y, "correlation undefined: zero variance");
                Ok(Correlation::Undefined)
            }
            Err(e) => Err(e),
        }
    }

    pub fn r(&self) -> Option<f64> {
        match self {
            Correlation::Defined { r, .. } => Some(*r),
            Correlation::Undefined => None,
        }
    }
}

/// Pearson product-moment correlation
///
/// # Errors
/// * `DimensionMismatch` if the slices differ in length
/// * `InsufficientData` with fewer than 2 pairs
/// * `UndefinedCorrelation` if either input is constant
pub fn pearson(x: &[f64], y: &[f64]) -> StatsResult<f64> {
    if x.len() != y.len() {
        return Err(StatsError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(StatsError::InsufficientData { rows: n, cols: 1 });
    }

    if is_constant(x) || is_constant(y) {
        return Err(StatsError::UndefinedCorrelation {
            x: "x".into(),
            y: "y".into(),
        });
    }

    let zx = standardize(x);
    let zy = standardize(y);
    Ok(zx.iter().covariance(zy.iter()).clamp(-1.0, 1.0))
}

fn is_constant(data: &[f64]) -> bool {
    data.windows(2).all(|w| w[0] == w[1])
}

/// z-scores of `data`, after dividing by the largest magnitude so the
/// moments stay representable for values near the limits of f64
fn standardize(data: &[f64]) -> Vec<f64> {
    let peak = data.abs_max();
    let scaled: Vec<f64> = data.iter().map(|v| v / peak).collect();
    let mean = scaled.iter().mean();
    let sd = scaled.iter().std_dev();
    scaled.iter().map(|v| (v - mean) / sd).collect()
}

/// Pearson correlation between two table columns; errors name the columns
pub fn column_correlation(table: &WineTable, a: Column, b: Column) -> StatsResult<f64> {
    pearson(&table.column(a), &table.column(b)).map_err(|e| name_columns(e, a, b))
}

fn name_columns(err: StatsError, a: Column, b: Column) -> StatsError {
    match err {
        StatsError::UndefinedCorrelation { .. } => StatsError::UndefinedCorrelation {
            x: a.name().into(),
            y: b.name().into(),
        },
        other => other,
    }
}

/// Symmetric pairwise correlation matrix
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    columns: Vec<Column>,
    /// Keyed by (smaller, larger) column; the diagonal is included
    values: BTreeMap<(Column, Column), Correlation>,
}

impl CorrelationMatrix {
    fn key(a: Column, b: Column) -> (Column, Column) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Correlation of `a` and `b`, in either order
    pub fn get(&self, a: Column, b: Column) -> Option<Correlation> {
        self.values.get(&Self::key(a, b)).copied()
    }

    /// Off-diagonal pairs in column order
    pub fn pairs(&self) -> Vec<(Column, Column, Correlation)> {
        let mut pairs = Vec::new();
        for (i, a) in self.columns.iter().enumerate() {
            for b in &self.columns[i + 1..] {
                if let Some(c) = self.get(*a, *b) {
                    pairs.push((*a, *b, c));
                }
            }
        }
        pairs
    }
}

/// Correlate every pair of `columns` (including each column with itself)
pub fn correlation_matrix(table: &WineTable, columns: &[Column]) -> StatsResult<CorrelationMatrix> {
    if columns.is_empty() {
        return Err(StatsError::EmptyInput { field: "columns" });
    }

    let data: Vec<Vec<f64>> = table.columns(columns);
    let mut values = BTreeMap::new();
    for (i, a) in columns.iter().enumerate() {
        for (j, b) in columns.iter().enumerate().skip(i) {
            let result = pearson(&data[i], &data[j]).map_err(|e| name_columns(e, *a, *b));
            let result = if i == j { result.map(|_| 1.0) } else { result };
            values.insert(CorrelationMatrix::key(*a, *b), Correlation::from_result(result)?);
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

/// [`correlation_matrix`] for each color partition; colors with no rows are
/// skipped
pub fn correlations_by_color(
    table: &WineTable,
    columns: &[Column],
) -> StatsResult<BTreeMap<WineColor, CorrelationMatrix>> {
    let mut by_color = BTreeMap::new();
    for color in WineColor::ALL {
        let subset = table.filter_color(color);
        if subset.is_empty() {
            continue;
        }
        by_color.insert(color, correlation_matrix(&subset, columns)?);
    }
    Ok(by_color)
}

/// Correlation of each column with `target`, strongest first; undefined
/// correlations sort last.
pub fn correlations_with(
    table: &WineTable,
    target: Column,
    columns: &[Column],
) -> StatsResult<Vec<(Column, Correlation)>> {
    let mut result = columns
        .iter()
        .filter(|c| **c != target)
        .map(|c| Ok((*c, Correlation::from_result(column_correlation(table, *c, target))?)))
        .collect::<StatsResult<Vec<_>>>()?;

    result.sort_by(|(_, a), (_, b)| {
        let key = |c: &Correlation| c.r().map(f64::abs).unwrap_or(-1.0);
        key(b).total_cmp(&key(a))
    });
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(f64, f64, i32)]) -> WineTable {
        // (alcohol, density, quality); other measurements constant
        let rows = rows
            .iter()
            .map(|(alcohol, density, quality)| {
                let mut m = [1.0; 11];
                m[7] = *density;
                m[10] = *alcohol;
                (m, *quality)
            })
            .collect();
        WineTable::combine(rows, Vec::new())
    }

    #[test]
    fn test_pearson_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);

        let z = [5.0, 4.0, 3.0, 2.0, 1.0];
        assert!((pearson(&x, &z).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_tiny_magnitudes() {
        let x = [1e-200, 2e-200, 3e-200];
        let y = [1.0, 2.0, 3.5];
        let r = pearson(&x, &y).unwrap();

        // sxy = 2.5, sxx = 2, syy = 19/6
        let expected = 2.5 / (2.0f64 * 19.0 / 6.0).sqrt();
        assert!((r - expected).abs() < 1e-12);
        assert!(r < 0.995);
        assert!((r - pearson(&[1.0, 2.0, 3.0], &y).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_zero_variance() {
        let x = [1.0, 2.0, 3.0];
        let y = [4.0, 4.0, 4.0];
        assert!(matches!(
            pearson(&x, &y),
            Err(StatsError::UndefinedCorrelation { .. })
        ));
    }

    #[test]
    fn test_pearson_dimension_mismatch() {
        assert!(matches!(
            pearson(&[1.0, 2.0], &[1.0]),
            Err(StatsError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_strength_classes() {
        assert_eq!(CorrelationStrength::from_r(0.5), CorrelationStrength::High);
        assert_eq!(CorrelationStrength::from_r(-0.72), CorrelationStrength::High);
        assert_eq!(CorrelationStrength::from_r(0.3), CorrelationStrength::Medium);
        assert_eq!(CorrelationStrength::from_r(-0.49), CorrelationStrength::Medium);
        assert_eq!(CorrelationStrength::from_r(0.29), CorrelationStrength::Low);
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let t = table(&[
            (9.4, 0.998, 5),
            (9.8, 0.997, 5),
            (11.0, 0.994, 6),
            (12.5, 0.991, 7),
            (10.2, 0.996, 6),
        ]);
        let cols = [Column::Alcohol, Column::Density, Column::Quality];
        let m = correlation_matrix(&t, &cols).unwrap();

        for a in cols {
            assert_eq!(m.get(a, a).and_then(|c| c.r()), Some(1.0));
            for b in cols {
                assert_eq!(m.get(a, b), m.get(b, a));
            }
        }
        assert_eq!(m.pairs().len(), 3);

        let r = m.get(Column::Alcohol, Column::Density).unwrap().r().unwrap();
        assert!(r < -0.9);
    }

    #[test]
    fn test_matrix_reports_undefined() {
        let t = table(&[(9.4, 0.998, 5), (9.8, 0.997, 5), (11.0, 0.994, 6)]);
        let m = correlation_matrix(&t, &[Column::Alcohol, Column::Chlorides]).unwrap();

        assert_eq!(
            m.get(Column::Alcohol, Column::Chlorides),
            Some(Correlation::Undefined)
        );
        assert_eq!(
            m.get(Column::Chlorides, Column::Chlorides),
            Some(Correlation::Undefined)
        );
    }

    #[test]
    fn test_correlations_by_color_partitions_rows() {
        let measurements = |alcohol: f64, density: f64| {
            let mut m = [1.0; 11];
            m[7] = density;
            m[10] = alcohol;
            m
        };
        // Alcohol and density move together in red, against each other in white
        let red = vec![
            (measurements(9.0, 0.990), 5),
            (measurements(10.0, 0.992), 6),
            (measurements(11.0, 0.995), 6),
        ];
        let white = vec![
            (measurements(9.0, 0.998), 5),
            (measurements(10.0, 0.996), 6),
            (measurements(11.0, 0.993), 7),
            (measurements(12.0, 0.991), 7),
        ];
        let t = WineTable::combine(red, white);
        let cols = [Column::Alcohol, Column::Density];

        let by_color = correlations_by_color(&t, &cols).unwrap();
        assert_eq!(by_color.len(), 2);

        for color in WineColor::ALL {
            let subset = correlation_matrix(&t.filter_color(color), &cols).unwrap();
            assert_eq!(
                by_color[&color].get(Column::Alcohol, Column::Density),
                subset.get(Column::Alcohol, Column::Density)
            );
        }

        let red_r = by_color[&WineColor::Red].get(Column::Alcohol, Column::Density);
        let white_r = by_color[&WineColor::White].get(Column::Alcohol, Column::Density);
        assert!(red_r.and_then(|c| c.r()).unwrap() > 0.9);
        assert!(white_r.and_then(|c| c.r()).unwrap() < -0.9);
    }

    #[test]
    fn test_correlations_by_color_skips_empty_partition() {
        let t = table(&[(9.4, 0.998, 5), (9.8, 0.997, 5), (11.0, 0.994, 6)]);
        let by_color = correlations_by_color(&t, &[Column::Alcohol, Column::Density]).unwrap();
        assert_eq!(by_color.keys().copied().collect::<Vec<_>>(), vec![WineColor::Red]);
    }

    #[test]
    fn test_column_correlation_names_columns() {
        let t = table(&[(9.4, 0.998, 5), (9.8, 0.997, 5), (11.0, 0.994, 6)]);
        match column_correlation(&t, Column::Sulphates, Column::Quality) {
            Err(StatsError::UndefinedCorrelation { x, y }) => {
                assert_eq!(x, "sulphates");
                assert_eq!(y, "quality");
            }
            other => panic!("expected undefined correlation, got {:?}", other),
        }
    }

    #[test]
    fn test_correlations_with_sorted() {
        let t = table(&[
            (9.4, 0.995, 5),
            (9.8, 0.998, 5),
            (11.0, 0.994, 6),
            (12.5, 0.996, 7),
        ]);
        let columns = [
            Column::Chlorides,
            Column::Density,
            Column::Alcohol,
            Column::Quality,
        ];
        let result = correlations_with(&t, Column::Quality, &columns).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].0, Column::Alcohol);
        assert_eq!(result[2], (Column::Chlorides, Correlation::Undefined));
    }
}
