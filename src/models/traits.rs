//! Forecaster trait defining the common interface for models.

use crate::core::{Forecast, TimeSeries};
use crate::error::Result;

/// Common interface for forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series data.
    ///
    /// A failed fit leaves the model unfitted.
    fn fit(&mut self, series: &TimeSeries) -> Result<()>;

    /// Generate predictions for the `horizon` months after the sample.
    fn predict(&self, horizon: usize) -> Result<Forecast>;

    /// Generate predictions with prediction intervals at coverage `level`.
    fn predict_with_intervals(&self, horizon: usize, _level: f64) -> Result<Forecast> {
        // Point predictions only unless the model knows its error variance
        self.predict(horizon)
    }

    /// Get the fitted values (in-sample one-step predictions).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Get the residuals (actual - fitted).
    fn residuals(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}
