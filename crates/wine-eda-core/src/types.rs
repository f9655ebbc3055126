use std::fmt;
use std::str::FromStr;

use crate::errors::StatsError;

/// Confidence level used for coefficient and prediction intervals
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

// ============================================================================
// Columns and samples
// ============================================================================

/// Numeric columns of the combined wine table
///
/// The row identifier is not a column: it never takes part in statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    FixedAcidity,
    VolatileAcidity,
    CitricAcid,
    ResidualSugar,
    Chlorides,
    FreeSulfurDioxide,
    TotalSulfurDioxide,
    Density,
    Ph,
    Sulphates,
    Alcohol,
    Quality,
}

impl Column {
    /// The eleven physicochemical measurements, in file order
    pub const MEASUREMENTS: [Column; 11] = [
        Column::FixedAcidity,
        Column::VolatileAcidity,
        Column::CitricAcid,
        Column::ResidualSugar,
        Column::Chlorides,
        Column::FreeSulfurDioxide,
        Column::TotalSulfurDioxide,
        Column::Density,
        Column::Ph,
        Column::Sulphates,
        Column::Alcohol,
    ];

    /// Every numeric column, measurements followed by quality
    pub const ALL: [Column; 12] = [
        Column::FixedAcidity,
        Column::VolatileAcidity,
        Column::CitricAcid,
        Column::ResidualSugar,
        Column::Chlorides,
        Column::FreeSulfurDioxide,
        Column::TotalSulfurDioxide,
        Column::Density,
        Column::Ph,
        Column::Sulphates,
        Column::Alcohol,
        Column::Quality,
    ];

    /// Normalized column name as it appears in headers after normalization
    pub fn name(self) -> &'static str {
        match self {
            Column::FixedAcidity => "fixed_acidity",
            Column::VolatileAcidity => "volatile_acidity",
            Column::CitricAcid => "citric_acid",
            Column::ResidualSugar => "residual_sugar",
            Column::Chlorides => "chlorides",
            Column::FreeSulfurDioxide => "free_sulfur_dioxide",
            Column::TotalSulfurDioxide => "total_sulfur_dioxide",
            Column::Density => "density",
            Column::Ph => "ph",
            Column::Sulphates => "sulphates",
            Column::Alcohol => "alcohol",
            Column::Quality => "quality",
        }
    }

    /// Position of a measurement inside [`WineSample::measurements`]
    pub(crate) fn measurement_index(self) -> Option<usize> {
        Column::MEASUREMENTS.iter().position(|c| *c == self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_header(s);
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| StatsError::UnknownColumn(s.to_string()))
    }
}

/// Normalize a header cell: strip quotes and whitespace, lowercase, and map
/// `.`, `-` and spaces to `_`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .trim()
        .chars()
        .map(|c| match c {
            '.' | '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Source category of a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WineColor {
    Red,
    White,
}

impl WineColor {
    pub const ALL: [WineColor; 2] = [WineColor::Red, WineColor::White];

    pub fn as_str(self) -> &'static str {
        match self {
            WineColor::Red => "red",
            WineColor::White => "white",
        }
    }
}

impl fmt::Display for WineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the combined table
#[derive(Debug, Clone, PartialEq)]
pub struct WineSample {
    /// Contiguous zero-based identifier across the combined table
    pub id: usize,
    pub color: WineColor,
    /// Measurements in [`Column::MEASUREMENTS`] order
    pub measurements: [f64; 11],
    pub quality: i32,
}

impl WineSample {
    /// Value of a numeric column for this sample
    pub fn value(&self, column: Column) -> f64 {
        match column.measurement_index() {
            Some(idx) => self.measurements[idx],
            None => f64::from(self.quality),
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Options for descriptive summaries
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Probabilities in [0, 1] at which quantiles are reported
    pub quantiles: Vec<f64>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            quantiles: vec![0.0, 0.25, 0.5, 0.75, 0.99, 0.999],
        }
    }
}

/// Options for OLS fitting
#[derive(Debug, Clone)]
pub struct OlsOptions {
    /// Whether to compute inference statistics (std errors, p-values, etc.)
    pub compute_inference: bool,
    /// Confidence level for coefficient intervals (default: 0.95)
    pub confidence_level: f64,
}

impl Default for OlsOptions {
    fn default() -> Self {
        Self {
            compute_inference: true,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

/// Options for prediction intervals
#[derive(Debug, Clone)]
pub struct PredictOptions {
    /// Confidence level of the prediction interval (default: 0.95)
    pub confidence_level: f64,
    /// Allowed extrapolation as a fraction of each predictor's training span.
    /// `None` disables the range check.
    pub range_guard: Option<f64>,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            range_guard: None,
        }
    }
}

// ============================================================================
// Regression results
// ============================================================================

/// Core result from model fitting - always computed
#[derive(Debug, Clone)]
pub struct FitResultCore {
    /// Regression coefficients (excluding intercept)
    pub coefficients: Vec<f64>,
    /// Intercept term
    pub intercept: f64,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
    /// Adjusted R-squared
    pub adj_r_squared: f64,
    /// Residual standard error
    pub residual_std_error: f64,
    /// Number of observations used
    pub n_observations: usize,
    /// Number of features (excluding intercept)
    pub n_features: usize,
}

/// One row of a coefficient table
#[derive(Debug, Clone)]
pub struct CoefficientRow {
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Inference results - only computed if requested
///
/// The intercept row comes first, followed by one row per feature.
#[derive(Debug, Clone)]
pub struct FitResultInference {
    pub rows: Vec<CoefficientRow>,
    /// Confidence level used (e.g., 0.95)
    pub confidence_level: f64,
}

/// State kept from training for leverage and range checks
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    /// Mean of each feature
    pub means: Vec<f64>,
    /// Inverse of the centered scatter matrix (X_c' X_c)^-1
    pub scatter_inverse: Vec<Vec<f64>>,
    /// (min, max) of each feature
    pub ranges: Vec<(f64, f64)>,
}

/// Combined fit result
#[derive(Debug, Clone)]
pub struct FitResult {
    pub core: FitResultCore,
    pub inference: Option<FitResultInference>,
    pub training: TrainingSummary,
}

/// Point estimate with prediction interval for one new row
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Predictor values of the new row, in model order
    pub inputs: Vec<f64>,
    /// Predicted value
    pub fit: f64,
    /// Lower bound of prediction interval
    pub lower: f64,
    /// Upper bound of prediction interval
    pub upper: f64,
}
