//! Regression model implementations

mod model;
mod ols;
mod predict;

pub use model::{fit_incremental, RegressionModel};
pub use ols::fit_ols;
pub use predict::{predict, predict_with_interval, t_critical, PredictionReport};
