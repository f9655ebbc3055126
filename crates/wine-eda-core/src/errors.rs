use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading data or computing statistics
#[derive(Error, Debug)]
pub enum StatsError {
    // Loading errors
    #[error("Failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("{path} contains no data rows")]
    EmptyFile { path: PathBuf },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{path}:{line}: cannot parse '{value}' in column '{column}'")]
    Parse {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    // Input validation errors
    #[error("Quality {quality} of row {row} is outside the (0, 10] scale")]
    Domain { row: usize, quality: i32 },

    #[error("Insufficient data: {rows} rows, {cols} features (need rows > features + 1)")]
    InsufficientData { rows: usize, cols: usize },

    #[error("Dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty input: {field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Numerical errors
    #[error("Matrix is singular or near-singular (collinear predictors)")]
    SingularMatrix,

    #[error("Target has zero variance; R-squared is undefined")]
    ConstantTarget,

    #[error("Correlation between '{x}' and '{y}' is undefined (zero variance)")]
    UndefinedCorrelation { x: String, y: String },

    #[error(
        "Row {row}: {column} = {value} lies outside the guarded training range [{min}, {max}]"
    )]
    OutOfRange {
        row: usize,
        column: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Result type for loading and statistical operations
pub type StatsResult<T> = Result<T, StatsError>;
