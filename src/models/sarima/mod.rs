//! Seasonal ARIMA (SARIMA) models.
//!
//! This module provides:
//! - SARIMA(p, d, q)(P, D, Q)\[s\] estimation by exact maximum likelihood
//! - Differencing and lag polynomial helpers
//! - The statsmodels-style fit summary with residual diagnostics

mod diff;
mod kalman;
mod model;
mod params;
mod polynomial;
mod spec;
mod summary;

pub use diff::{
    apply_differencing, difference, differencing_polynomial, integrate, seasonal_difference,
};
pub use kalman::{FilterOutput, StateSpace};
pub use model::SARIMA;
pub use params::{constrain_stationary, unconstrain_stationary, SARIMAParams};
pub use polynomial::psi_weights;
pub use spec::SARIMASpec;
pub use summary::{Coefficient, ModelFitSummary};
