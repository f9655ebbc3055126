//! Diagnostic functions for regression models

mod leverage;
mod vif;

pub(crate) use leverage::leverage_kernel;
pub use leverage::{compute_leverage, leverage};
pub use vif::compute_vif;
