//! Serializable report types for the output boundary

use serde::Serialize;
use wine_eda_core::features::{QualityCategory, QUALITY_RULES};
use wine_eda_core::models::{PredictionReport, RegressionModel};
use wine_eda_core::summary::{ColumnStats, Correlation};
use wine_eda_core::{Column, PredictionResult, WineColor};

/// Complete report, rendered as text or JSON
#[derive(Debug, Serialize)]
pub struct Report {
    pub rows: RowCounts,
    pub category_counts: Vec<CategoryCount>,
    pub summaries: Vec<ColumnSummary>,
    pub summaries_by_color: Vec<ColorSummary>,
    pub trimmed_ranges: Vec<TrimmedRange>,
    pub correlations: Vec<CorrelationEntry>,
    pub correlations_by_color: Vec<ColorCorrelations>,
    pub quality_correlations: Vec<CorrelationEntry>,
    pub models: Vec<ModelSummary>,
    pub predictions: Option<PredictionSummary>,
}

#[derive(Debug, Serialize)]
pub struct RowCounts {
    pub total: usize,
    pub red: usize,
    pub white: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub color: &'static str,
    pub category: &'static str,
    pub bucket: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new(color: WineColor, category: QualityCategory, count: usize) -> Self {
        let bucket = QUALITY_RULES
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.bucket.to_string())
            .unwrap_or_default();
        Self {
            color: color.as_str(),
            category: category.as_str(),
            bucket,
            count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuantileEntry {
    pub p: f64,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct ColumnSummary {
    pub column: &'static str,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub quantiles: Vec<QuantileEntry>,
}

impl From<&ColumnStats> for ColumnSummary {
    fn from(stats: &ColumnStats) -> Self {
        Self {
            column: stats.column.name(),
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
            quantiles: stats
                .quantiles
                .iter()
                .map(|(p, value)| QuantileEntry {
                    p: *p,
                    value: *value,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ColorSummary {
    pub color: &'static str,
    pub columns: Vec<ColumnSummary>,
}

/// Outlier-trimmed range of one column
#[derive(Debug, Serialize)]
pub struct TrimmedRange {
    pub column: &'static str,
    pub lower_p: f64,
    pub upper_p: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Serialize)]
pub struct CorrelationEntry {
    pub x: &'static str,
    pub y: &'static str,
    /// `None` when undefined (zero variance)
    pub r: Option<f64>,
    pub strength: &'static str,
}

/// Correlation pairs within one color partition
#[derive(Debug, Serialize)]
pub struct ColorCorrelations {
    pub color: &'static str,
    pub pairs: Vec<CorrelationEntry>,
}

impl CorrelationEntry {
    pub fn new(x: Column, y: Column, correlation: Correlation) -> Self {
        let (r, strength) = match correlation {
            Correlation::Defined { r, strength } => (Some(r), strength.as_str()),
            Correlation::Undefined => (None, "undefined"),
        };
        Self {
            x: x.name(),
            y: y.name(),
            r,
            strength,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CoefficientEntry {
    pub term: &'static str,
    pub estimate: f64,
    pub std_error: Option<f64>,
    pub t_value: Option<f64>,
    pub p_value: Option<f64>,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub target: &'static str,
    pub predictors: Vec<&'static str>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub residual_std_error: f64,
    pub n_observations: usize,
    pub coefficients: Vec<CoefficientEntry>,
    pub vif: Vec<f64>,
}

impl ModelSummary {
    pub fn new(model: &RegressionModel, vif: Vec<f64>) -> Self {
        let fit = model.result();
        let terms = std::iter::once("(intercept)")
            .chain(model.predictors().iter().map(|c| c.name()));
        let estimates = std::iter::once(fit.core.intercept)
            .chain(fit.core.coefficients.iter().copied());

        let coefficients = terms
            .zip(estimates)
            .enumerate()
            .map(|(i, (term, estimate))| {
                let row = fit.inference.as_ref().and_then(|inf| inf.rows.get(i));
                CoefficientEntry {
                    term,
                    estimate,
                    std_error: row.map(|r| r.std_error),
                    t_value: row.map(|r| r.t_value),
                    p_value: row.map(|r| r.p_value),
                    ci_lower: row.map(|r| r.ci_lower),
                    ci_upper: row.map(|r| r.ci_upper),
                }
            })
            .collect();

        Self {
            target: model.target().name(),
            predictors: model.predictors().iter().map(|c| c.name()).collect(),
            r_squared: fit.core.r_squared,
            adj_r_squared: fit.core.adj_r_squared,
            residual_std_error: fit.core.residual_std_error,
            n_observations: fit.core.n_observations,
            coefficients,
            vif,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionEntry {
    pub inputs: Vec<f64>,
    pub fit: f64,
    pub lower: f64,
    pub upper: f64,
}

impl From<&PredictionResult> for PredictionEntry {
    fn from(result: &PredictionResult) -> Self {
        Self {
            inputs: result.inputs.clone(),
            fit: result.fit,
            lower: result.lower,
            upper: result.upper,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionSummary {
    pub predictors: Vec<&'static str>,
    pub confidence_level: f64,
    pub rows: Vec<PredictionEntry>,
    pub mean_lower_offset: f64,
    pub mean_upper_offset: f64,
}

impl PredictionSummary {
    pub fn new(model: &RegressionModel, report: &PredictionReport) -> Self {
        Self {
            predictors: model.predictors().iter().map(|c| c.name()).collect(),
            confidence_level: report.confidence_level,
            rows: report.results.iter().map(PredictionEntry::from).collect(),
            mean_lower_offset: report.mean_lower_offset,
            mean_upper_offset: report.mean_upper_offset,
        }
    }
}
