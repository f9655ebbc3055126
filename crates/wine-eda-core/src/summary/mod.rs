//! Descriptive statistics and correlation

mod correlation;
mod descriptive;

pub use correlation::{
    column_correlation, correlation_matrix, correlations_by_color, correlations_with, pearson,
    Correlation, CorrelationMatrix, CorrelationStrength,
};
pub use descriptive::{
    describe, describe_by_color, describe_column, quantile, quantile_sorted, trimmed_range,
    ColumnStats,
};
