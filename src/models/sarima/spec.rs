//! Seasonal ARIMA order specification.

use crate::error::{ParameterError, Result};
use std::fmt;

/// SARIMA(p, d, q)(P, D, Q)\[s\] order.
///
/// The model has no intercept or trend term and no exogenous regressors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SARIMASpec {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
    /// Seasonal AR order (P)
    pub seasonal_p: usize,
    /// Seasonal differencing order (D)
    pub seasonal_d: usize,
    /// Seasonal MA order (Q)
    pub seasonal_q: usize,
    /// Seasonal period (s)
    pub period: usize,
}

impl SARIMASpec {
    /// Non-seasonal ARIMA(p, d, q).
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            p,
            d,
            q,
            seasonal_p: 0,
            seasonal_d: 0,
            seasonal_q: 0,
            period: 0,
        }
    }

    /// Add the seasonal part (P, D, Q)\[s\].
    pub fn with_seasonal(mut self, p: usize, d: usize, q: usize, period: usize) -> Self {
        self.seasonal_p = p;
        self.seasonal_d = d;
        self.seasonal_q = q;
        self.period = period;
        self
    }

    /// Build from `(p, d, q)` and `(P, D, Q, s)` tuples.
    pub fn from_orders(
        order: (usize, usize, usize),
        seasonal_order: (usize, usize, usize, usize),
    ) -> Self {
        let (p, d, q) = order;
        let (sp, sd, sq, s) = seasonal_order;
        Self::new(p, d, q).with_seasonal(sp, sd, sq, s)
    }

    /// Check that the orders describe an estimable model.
    pub fn validate(&self) -> Result<()> {
        let seasonal = self.seasonal_p + self.seasonal_d + self.seasonal_q > 0;
        if seasonal && self.period < 2 {
            return Err(ParameterError::Invalid(format!(
                "seasonal period must be at least 2, got {}",
                self.period
            ))
            .into());
        }
        Ok(())
    }

    fn seasonal_period(&self) -> usize {
        if self.seasonal_p + self.seasonal_d + self.seasonal_q > 0 {
            self.period
        } else {
            0
        }
    }

    /// Degree of the expanded AR polynomial, `p + P·s`.
    pub fn k_ar(&self) -> usize {
        self.p + self.seasonal_p * self.seasonal_period()
    }

    /// Degree of the expanded MA polynomial, `q + Q·s`.
    pub fn k_ma(&self) -> usize {
        self.q + self.seasonal_q * self.seasonal_period()
    }

    /// Dimension of the state vector.
    pub fn k_states(&self) -> usize {
        self.k_ar().max(self.k_ma() + 1)
    }

    /// Number of ARMA coefficients (the variance excluded).
    pub fn num_coefficients(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    /// Number of estimated parameters, sigma2 included.
    pub fn num_params(&self) -> usize {
        self.num_coefficients() + 1
    }

    /// Observations consumed by differencing, `d + s·D`.
    pub fn burn_in(&self) -> usize {
        self.d + self.seasonal_d * self.seasonal_period()
    }

    /// Shortest series the model can be fitted to.
    pub fn min_observations(&self) -> usize {
        self.burn_in() + self.k_ar().max(self.k_ma()) + self.num_params() + 1
    }

    /// Parameter names in estimation order.
    pub fn param_names(&self) -> Vec<String> {
        let s = self.seasonal_period();
        let mut names = Vec::with_capacity(self.num_params());
        names.extend((1..=self.p).map(|i| format!("ar.L{}", i)));
        names.extend((1..=self.q).map(|i| format!("ma.L{}", i)));
        names.extend((1..=self.seasonal_p).map(|i| format!("ar.S.L{}", i * s)));
        names.extend((1..=self.seasonal_q).map(|i| format!("ma.S.L{}", i * s)));
        names.push("sigma2".to_string());
        names
    }

    /// Whether the model has any seasonal component.
    pub fn is_seasonal(&self) -> bool {
        self.seasonal_period() > 0
    }
}

impl Default for SARIMASpec {
    /// SARIMA(2, 0, 0)(0, 1, 1)\[12\].
    fn default() -> Self {
        Self::new(2, 0, 0).with_seasonal(0, 1, 1, 12)
    }
}

impl fmt::Display for SARIMASpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SARIMAX({}, {}, {})", self.p, self.d, self.q)?;
        if self.is_seasonal() {
            write!(
                f,
                "x({}, {}, {}, {})",
                self.seasonal_p, self.seasonal_d, self.seasonal_q, self.period
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;

    #[test]
    fn default_is_milk_model() {
        let spec = SARIMASpec::default();
        assert_eq!(spec, SARIMASpec::from_orders((2, 0, 0), (0, 1, 1, 12)));
        assert_eq!(spec.k_ar(), 2);
        assert_eq!(spec.k_ma(), 12);
        assert_eq!(spec.k_states(), 13);
        assert_eq!(spec.num_params(), 4);
        assert_eq!(spec.burn_in(), 12);
    }

    #[test]
    fn param_names_follow_estimation_order() {
        let spec = SARIMASpec::new(1, 1, 1).with_seasonal(1, 0, 2, 4);
        assert_eq!(
            spec.param_names(),
            vec!["ar.L1", "ma.L1", "ar.S.L4", "ma.S.L4", "ma.S.L8", "sigma2"]
        );
    }

    #[test]
    fn display_matches_summary_header() {
        assert_eq!(
            SARIMASpec::default().to_string(),
            "SARIMAX(2, 0, 0)x(0, 1, 1, 12)"
        );
        assert_eq!(SARIMASpec::new(1, 1, 0).to_string(), "SARIMAX(1, 1, 0)");
    }

    #[test]
    fn non_seasonal_ignores_period() {
        let spec = SARIMASpec::new(1, 1, 1).with_seasonal(0, 0, 0, 12);
        assert!(!spec.is_seasonal());
        assert_eq!(spec.burn_in(), 1);
        assert_eq!(spec.k_states(), 2);
    }

    #[test]
    fn validate_rejects_short_period() {
        let spec = SARIMASpec::new(1, 0, 0).with_seasonal(0, 1, 0, 1);
        assert!(matches!(spec.validate(), Err(ForecastError::Parameter(_))));
        assert!(SARIMASpec::default().validate().is_ok());
    }

    #[test]
    fn min_observations_covers_burn_in() {
        let spec = SARIMASpec::default();
        assert_eq!(spec.min_observations(), 12 + 12 + 4 + 1);
    }
}
