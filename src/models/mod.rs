//! Forecasting models.

pub mod sarima;
mod traits;

pub use traits::Forecaster;
