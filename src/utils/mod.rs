//! Numerical utilities shared by the decomposition and the models.

pub mod linalg;
pub mod optimization;
pub mod stats;

pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::quantile_normal;
