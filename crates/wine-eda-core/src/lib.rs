//! wine-eda-core: exploratory statistics for the red and white wine quality datasets
//!
//! The pipeline runs strictly forward over immutable tables:
//! load both files into a [`WineTable`], append quality-derived labels,
//! summarize columns and correlations, fit nested OLS models of quality
//! and report prediction intervals for new rows.

pub mod dataset;
pub mod diagnostics;
pub mod errors;
pub mod features;
pub mod models;
pub mod summary;
pub mod types;

pub use dataset::WineTable;
pub use errors::{StatsError, StatsResult};
pub use types::*;
