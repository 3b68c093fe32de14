//! Classical (moving-average) seasonal decomposition.
//!
//! The series is split into:
//! - Trend: centred moving average over one full seasonal period
//! - Seasonal: the average deviation from trend at each period position
//! - Residual: what is left after removing trend and seasonal
//!
//! The first and last `period / 2` points have no trend and no residual;
//! they are reported as `NaN`.

use crate::error::{FitError, ParameterError, Result};
use crate::utils::stats::{nan_mean, variance};
use serde::Serialize;

/// How the components combine into the observed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DecompositionModel {
    /// observed = trend + seasonal + residual
    #[default]
    Additive,
    /// observed = trend * seasonal * residual
    Multiplicative,
}

/// Result of a classical decomposition. All components share the input's length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompositionResult {
    pub observed: Vec<f64>,
    /// Trend component (`NaN` at the edges).
    pub trend: Vec<f64>,
    /// Seasonal component.
    pub seasonal: Vec<f64>,
    /// Residual component (`NaN` at the edges).
    pub residual: Vec<f64>,
    pub period: usize,
    pub model: DecompositionModel,
}

impl DecompositionResult {
    /// One seasonal factor per period position, starting at the first observation.
    pub fn seasonal_factors(&self) -> &[f64] {
        &self.seasonal[..self.period.min(self.seasonal.len())]
    }

    /// Whether trend and residual are defined at `index`.
    pub fn is_defined(&self, index: usize) -> bool {
        self.trend.get(index).is_some_and(|t| !t.is_nan())
            && self.residual.get(index).is_some_and(|r| !r.is_nan())
    }

    /// Indices where every component is defined.
    pub fn defined_range(&self) -> std::ops::Range<usize> {
        let start = (0..self.observed.len())
            .find(|&i| self.is_defined(i))
            .unwrap_or(0);
        let end = (0..self.observed.len())
            .rev()
            .find(|&i| self.is_defined(i))
            .map(|i| i + 1)
            .unwrap_or(0);
        start..end.max(start)
    }

    /// Get the seasonal strength (0 to 1).
    /// Values close to 1 indicate strong seasonality.
    pub fn seasonal_strength(&self) -> f64 {
        let range = self.defined_range();
        let remainder = &self.residual[range.clone()];
        let seasonal_plus_remainder: Vec<f64> = self.seasonal[range]
            .iter()
            .zip(remainder.iter())
            .map(|(s, r)| self.combine(*s, *r))
            .collect();
        strength(remainder, &seasonal_plus_remainder)
    }

    /// Get the trend strength (0 to 1).
    /// Values close to 1 indicate strong trend.
    pub fn trend_strength(&self) -> f64 {
        let range = self.defined_range();
        let remainder = &self.residual[range.clone()];
        let trend_plus_remainder: Vec<f64> = self.trend[range]
            .iter()
            .zip(remainder.iter())
            .map(|(t, r)| self.combine(*t, *r))
            .collect();
        strength(remainder, &trend_plus_remainder)
    }

    fn combine(&self, a: f64, b: f64) -> f64 {
        match self.model {
            DecompositionModel::Additive => a + b,
            DecompositionModel::Multiplicative => a * b,
        }
    }
}

fn strength(remainder: &[f64], component_plus_remainder: &[f64]) -> f64 {
    let var_remainder = variance(remainder);
    let var_total = variance(component_plus_remainder);

    if var_total.is_nan() || var_total < 1e-10 {
        return 0.0;
    }

    (1.0 - var_remainder / var_total).max(0.0)
}

/// Classical decomposition configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalDecomposition {
    period: usize,
    model: DecompositionModel,
}

impl SeasonalDecomposition {
    /// Additive decomposition with the given seasonal period.
    pub fn new(period: usize) -> Self {
        Self {
            period,
            model: DecompositionModel::Additive,
        }
    }

    pub fn with_model(mut self, model: DecompositionModel) -> Self {
        self.model = model;
        self
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn model(&self) -> DecompositionModel {
        self.model
    }

    /// Moving-average weights: `[0.5, 1, .., 1, 0.5] / s` for even `s`, `1/s` for odd.
    pub fn trend_filter(&self) -> Vec<f64> {
        let s = self.period;
        let w = 1.0 / s as f64;
        if s % 2 == 0 {
            let mut filter = vec![w; s + 1];
            filter[0] = 0.5 * w;
            filter[s] = 0.5 * w;
            filter
        } else {
            vec![w; s]
        }
    }

    /// Decompose the series.
    pub fn decompose(&self, series: &[f64]) -> Result<DecompositionResult> {
        let s = self.period;
        if s < 2 {
            return Err(ParameterError::Invalid(format!(
                "seasonal period must be at least 2, got {}",
                s
            ))
            .into());
        }

        let n = series.len();
        if n < 2 * s {
            return Err(FitError::InsufficientData {
                needed: 2 * s,
                got: n,
            }
            .into());
        }

        if self.model == DecompositionModel::Multiplicative && series.iter().any(|&v| v <= 0.0) {
            return Err(ParameterError::Invalid(
                "multiplicative decomposition requires strictly positive values".to_string(),
            )
            .into());
        }

        let trend = centred_moving_average(series, &self.trend_filter());

        let detrended: Vec<f64> = series
            .iter()
            .zip(trend.iter())
            .map(|(&x, &t)| match self.model {
                DecompositionModel::Additive => x - t,
                DecompositionModel::Multiplicative => x / t,
            })
            .collect();

        let mut factors: Vec<f64> = (0..s)
            .map(|pos| {
                let at_pos: Vec<f64> = detrended.iter().skip(pos).step_by(s).copied().collect();
                nan_mean(&at_pos)
            })
            .collect();

        let centre = factors.iter().sum::<f64>() / s as f64;
        for f in &mut factors {
            match self.model {
                DecompositionModel::Additive => *f -= centre,
                DecompositionModel::Multiplicative => *f /= centre,
            }
        }

        let seasonal: Vec<f64> = (0..n).map(|i| factors[i % s]).collect();

        let residual: Vec<f64> = detrended
            .iter()
            .zip(seasonal.iter())
            .map(|(&d, &sv)| match self.model {
                DecompositionModel::Additive => d - sv,
                DecompositionModel::Multiplicative => d / sv,
            })
            .collect();

        Ok(DecompositionResult {
            observed: series.to_vec(),
            trend,
            seasonal,
            residual,
            period: s,
            model: self.model,
        })
    }
}

/// Two-sided convolution; the `filter.len() / 2` points at each edge are `NaN`.
fn centred_moving_average(series: &[f64], filter: &[f64]) -> Vec<f64> {
    let n = series.len();
    let half = filter.len() / 2;
    let mut out = vec![f64::NAN; n];

    if n < filter.len() {
        return out;
    }

    for i in half..n - half {
        out[i] = filter
            .iter()
            .enumerate()
            .map(|(j, w)| w * series[i - half + j])
            .sum();
    }

    out
}
