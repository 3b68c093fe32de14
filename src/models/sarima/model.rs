//! Seasonal ARIMA model estimated by exact maximum likelihood.

use super::diff::{apply_differencing, differencing_polynomial, integrate};
use super::kalman::{FilterOutput, StateSpace};
use super::params::{reflections_to_unconstrained, SARIMAParams};
use super::polynomial::{multiply, psi_weights};
use super::spec::SARIMASpec;
use super::summary::{Coefficient, ModelFitSummary};
use crate::core::{Forecast, TimeSeries};
use crate::error::{FitError, ParameterError, Result};
use crate::models::Forecaster;
use crate::utils::linalg::invert_spd;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::{normal_sf, partial_autocorrelation, quantile_normal};
use crate::validation::{heteroskedasticity, jarque_bera, ljung_box};
use log::{debug, warn};

/// Coverage of the coefficient confidence intervals in the summary.
const COEFFICIENT_LEVEL: f64 = 0.95;

/// Default optimizer settings for the likelihood search.
fn default_optimizer() -> NelderMeadConfig {
    NelderMeadConfig {
        max_iter: 5000,
        tolerance: 1e-10,
        initial_step: 0.1,
        restarts: 1,
        ..Default::default()
    }
}

/// Everything produced by a successful fit.
#[derive(Debug, Clone)]
struct FitState {
    series: TimeSeries,
    params: SARIMAParams,
    sigma2: f64,
    log_likelihood: f64,
    /// State prediction for the first step after the sample.
    predicted_state: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    /// Standardized one-step errors after the burn-in.
    standardized: Vec<f64>,
    /// Standard errors in estimation order, sigma2 last.
    std_errors: Vec<f64>,
    iterations: usize,
    converged: bool,
}

/// SARIMA(p, d, q)(P, D, Q)\[s\] forecaster.
///
/// The differenced series `w = (1-B)^d (1-B^s)^D y` is modelled as a
/// stationary, invertible ARMA process whose likelihood is evaluated exactly
/// by the Kalman filter. Coefficients are found by Nelder-Mead on the
/// concentrated likelihood; the innovation variance is its closed-form
/// estimate at the optimum.
///
/// # Example
/// ```
/// use milk_forecast::core::TimeSeries;
/// use milk_forecast::models::sarima::SARIMA;
/// use milk_forecast::models::Forecaster;
/// use chrono::NaiveDate;
///
/// let anchor = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
/// let values: Vec<f64> = (0..72)
///     .map(|i| {
///         let season = 20.0 * (i as f64 * std::f64::consts::PI / 6.0).sin();
///         let noise = ((i as f64 * 12.9898).sin() * 43758.5453).fract();
///         500.0 + season + 5.0 * noise
///     })
///     .collect();
/// let series = TimeSeries::monthly(anchor, values).unwrap();
///
/// let mut model = SARIMA::default();
/// model.fit(&series).unwrap();
///
/// let forecast = model.predict(6).unwrap();
/// assert_eq!(forecast.horizon(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct SARIMA {
    spec: SARIMASpec,
    optimizer: NelderMeadConfig,
    fit: Option<FitState>,
}

impl SARIMA {
    /// Create an unfitted model with the given orders.
    pub fn new(spec: SARIMASpec) -> Self {
        Self {
            spec,
            optimizer: default_optimizer(),
            fit: None,
        }
    }

    /// Override the optimizer settings.
    pub fn with_optimizer(mut self, config: NelderMeadConfig) -> Self {
        self.optimizer = config;
        self
    }

    /// Get the model specification.
    pub fn spec(&self) -> SARIMASpec {
        self.spec
    }

    fn state(&self) -> Result<&FitState> {
        self.fit.as_ref().ok_or_else(|| FitError::FitRequired.into())
    }

    /// Estimated coefficients.
    pub fn params(&self) -> Option<&SARIMAParams> {
        self.fit.as_ref().map(|s| &s.params)
    }

    /// Non-seasonal AR coefficients.
    pub fn ar_coefficients(&self) -> &[f64] {
        self.fit.as_ref().map(|s| s.params.ar.as_slice()).unwrap_or(&[])
    }

    /// Seasonal MA coefficients.
    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        self.fit
            .as_ref()
            .map(|s| s.params.seasonal_ma.as_slice())
            .unwrap_or(&[])
    }

    /// Innovation variance estimate.
    pub fn sigma2(&self) -> Option<f64> {
        self.fit.as_ref().map(|s| s.sigma2)
    }

    /// Maximised log-likelihood.
    pub fn log_likelihood(&self) -> Option<f64> {
        self.fit.as_ref().map(|s| s.log_likelihood)
    }

    /// Observations entering the likelihood.
    fn nobs_effective(&self, state: &FitState) -> usize {
        state.series.len() - self.spec.burn_in()
    }

    /// `(AIC, BIC, HQIC)` of the fitted model.
    pub fn information_criteria(&self) -> Option<(f64, f64, f64)> {
        let state = self.fit.as_ref()?;
        let ll = state.log_likelihood;
        let k = self.spec.num_params() as f64;
        let n = self.nobs_effective(state) as f64;
        Some((
            -2.0 * ll + 2.0 * k,
            -2.0 * ll + k * n.ln(),
            -2.0 * ll + 2.0 * k * n.ln().ln(),
        ))
    }

    /// Akaike information criterion.
    pub fn aic(&self) -> Option<f64> {
        self.information_criteria().map(|(aic, _, _)| aic)
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> Option<f64> {
        self.information_criteria().map(|(_, bic, _)| bic)
    }

    /// Run the Kalman filter on the differenced series for `params`.
    fn filter(spec: &SARIMASpec, params: &SARIMAParams, w: &[f64]) -> Result<FilterOutput> {
        let (ar, ma) = params.reduced(spec.period);
        StateSpace::arma(&ar, &ma).filter(w)
    }

    /// Initial coefficients: partial autocorrelations of `w` for the AR
    /// terms, zero for the MA terms.
    fn start_values(&self, w: &[f64]) -> Vec<f64> {
        let spec = &self.spec;
        let mut x = Vec::with_capacity(spec.num_coefficients());

        let ar_lags = spec.p.max(spec.seasonal_p * spec.period);
        let pacf = if ar_lags > 0 && w.len() > ar_lags + 1 {
            partial_autocorrelation(w, ar_lags)
        } else {
            vec![0.0; ar_lags]
        };

        x.extend(reflections_to_unconstrained(&pacf[..spec.p]));
        x.extend(vec![0.0; spec.q]);
        let seasonal: Vec<f64> = (1..=spec.seasonal_p)
            .map(|i| if i == 1 { pacf[spec.period - 1] } else { 0.0 })
            .collect();
        x.extend(reflections_to_unconstrained(&seasonal));
        x.extend(vec![0.0; spec.seasonal_q]);
        x
    }

    /// Outer-product-of-gradients standard errors for the coefficients and sigma2.
    fn opg_std_errors(&self, params: &SARIMAParams, sigma2: f64, w: &[f64]) -> Vec<f64> {
        let mut theta = params.to_vec();
        theta.push(sigma2);
        let k = theta.len();
        let spec = self.spec;

        let loglike_obs = |values: &[f64]| -> Option<Vec<f64>> {
            let (coefs, scale) = values.split_at(values.len() - 1);
            let scale = scale[0];
            if scale <= 0.0 {
                return None;
            }
            let p = SARIMAParams::from_slice(&spec, coefs)?;
            let out = Self::filter(&spec, &p, w).ok()?;
            Some(out.loglike_obs(scale))
        };

        let nan = vec![f64::NAN; k];
        let mut scores = vec![vec![0.0; k]; w.len()];
        for i in 0..k {
            let h = f64::EPSILON.cbrt() * theta[i].abs().max(1.0);
            let mut up = theta.clone();
            let mut down = theta.clone();
            up[i] += h;
            down[i] -= h;
            let (Some(ll_up), Some(ll_down)) = (loglike_obs(&up), loglike_obs(&down)) else {
                warn!("score for parameter {} could not be evaluated", i);
                return nan;
            };
            for (t, row) in scores.iter_mut().enumerate() {
                row[i] = (ll_up[t] - ll_down[t]) / (2.0 * h);
            }
        }

        let mut opg = vec![vec![0.0; k]; k];
        for g in &scores {
            for a in 0..k {
                for b in 0..k {
                    opg[a][b] += g[a] * g[b];
                }
            }
        }

        match invert_spd(&opg) {
            Some(cov) => (0..k).map(|i| cov[i][i].max(0.0).sqrt()).collect(),
            None => {
                warn!("outer product of gradients is singular; standard errors unavailable");
                nan
            }
        }
    }

    /// Estimation results with residual diagnostics.
    pub fn summary(&self) -> Result<ModelFitSummary> {
        let state = self.state()?;
        let (aic, bic, hqic) = self
            .information_criteria()
            .ok_or(FitError::FitRequired)?;
        let z_crit = quantile_normal(0.5 + COEFFICIENT_LEVEL / 2.0);

        let mut estimates = state.params.to_vec();
        estimates.push(state.sigma2);
        let coefficients = self
            .spec
            .param_names()
            .into_iter()
            .zip(estimates)
            .zip(&state.std_errors)
            .map(|((name, estimate), &std_error)| {
                let z = estimate / std_error;
                Coefficient {
                    name,
                    estimate,
                    std_error,
                    z,
                    p_value: 2.0 * normal_sf(z.abs()),
                    lower: estimate - z_crit * std_error,
                    upper: estimate + z_crit * std_error,
                }
            })
            .collect();

        Ok(ModelFitSummary {
            model: self.spec.to_string(),
            dep_variable: state.series.label().to_string(),
            nobs: state.series.len(),
            nobs_effective: self.nobs_effective(state),
            sample_start: state.series.first_timestamp(),
            sample_end: state.series.last_timestamp(),
            covariance_type: "opg".to_string(),
            log_likelihood: state.log_likelihood,
            aic,
            bic,
            hqic,
            coefficients,
            confidence_level: COEFFICIENT_LEVEL,
            ljung_box: ljung_box(&state.standardized, Some(1), 0),
            jarque_bera: jarque_bera(&state.standardized),
            heteroskedasticity: heteroskedasticity(&state.standardized),
            iterations: state.iterations,
            converged: state.converged,
        })
    }

    /// Forecasts of the differenced series, `h` steps ahead.
    fn forecast_differenced(&self, state: &FitState, horizon: usize) -> Vec<f64> {
        let (ar, ma) = state.params.reduced(self.spec.period);
        let ss = StateSpace::arma(&ar, &ma);
        let mut alpha = state.predicted_state.clone();
        let mut out = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            out.push(alpha[0]);
            alpha = ss.transition_state(&alpha);
        }
        out
    }

    fn differencing(&self) -> Vec<f64> {
        let period = if self.spec.is_seasonal() {
            self.spec.period
        } else {
            0
        };
        differencing_polynomial(self.spec.d, self.spec.seasonal_d, period)
    }
}

impl Default for SARIMA {
    fn default() -> Self {
        Self::new(SARIMASpec::default())
    }
}

impl Forecaster for SARIMA {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        self.fit = None;
        self.spec.validate()?;

        let y = series.values();
        let needed = self.spec.min_observations();
        if y.len() < needed {
            return Err(FitError::InsufficientData {
                needed,
                got: y.len(),
            }
            .into());
        }

        let spec = self.spec;
        let burn_in = spec.burn_in();
        let w = apply_differencing(y, &self.differencing());
        let n_eff = w.len() as f64;

        let objective = |x: &[f64]| -> f64 {
            SARIMAParams::from_unconstrained(&spec, x)
                .and_then(|p| Self::filter(&spec, &p, &w).ok())
                .map(|out| -out.concentrated_loglike().0 / n_eff)
                .unwrap_or(f64::NAN)
        };

        let start = self.start_values(&w);
        let result = if start.is_empty() {
            None
        } else {
            let result = nelder_mead(objective, &start, self.optimizer.clone());
            debug!(
                "{} fit: {} iterations, objective {:.8}, converged {}",
                spec, result.iterations, result.optimal_value, result.converged
            );
            if !result.converged {
                return Err(FitError::NotConverged {
                    iterations: result.iterations,
                }
                .into());
            }
            Some(result)
        };

        let params = match &result {
            Some(r) => SARIMAParams::from_unconstrained(&spec, &r.optimal_point),
            None => Some(SARIMAParams::zeros(&spec)),
        }
        .ok_or_else(|| FitError::Computation("parameter vector has wrong length".to_string()))?;

        let output = Self::filter(&spec, &params, &w)?;
        let (log_likelihood, sigma2) = output.concentrated_loglike();
        if !log_likelihood.is_finite() || !(sigma2.is_finite() && sigma2 > 0.0) {
            return Err(FitError::Computation(format!(
                "non-finite likelihood at the optimum (ll = {}, sigma2 = {})",
                log_likelihood, sigma2
            ))
            .into());
        }

        let mut fitted = vec![f64::NAN; y.len()];
        let mut residuals = vec![f64::NAN; y.len()];
        for (t, v) in output.innovations.iter().enumerate() {
            residuals[burn_in + t] = *v;
            fitted[burn_in + t] = y[burn_in + t] - v;
        }

        let std_errors = self.opg_std_errors(&params, sigma2, &w);
        let standardized = output.standardized(sigma2);

        self.fit = Some(FitState {
            series: series.clone(),
            params,
            sigma2,
            log_likelihood,
            predicted_state: output.predicted_state,
            fitted,
            residuals,
            standardized,
            std_errors,
            iterations: result.as_ref().map(|r| r.iterations).unwrap_or(0),
            converged: result.as_ref().map(|r| r.converged).unwrap_or(true),
        });

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let state = self.state()?;
        if horizon == 0 {
            return Ok(Forecast::new());
        }

        let w_hat = self.forecast_differenced(state, horizon);
        let points = integrate(state.series.values(), &w_hat, &self.differencing());
        let timestamps = state.series.future_timestamps(horizon)?;
        Forecast::from_values(timestamps, points)
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<Forecast> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ParameterError::Invalid(format!(
                "interval level must be in (0, 1), got {}",
                level
            ))
            .into());
        }
        let state = self.state()?;
        let forecast = self.predict(horizon)?;
        if horizon == 0 {
            return Ok(forecast);
        }

        let period = self.spec.period;
        let integrated_ar = multiply(&state.params.ar_polynomial(period), &self.differencing());
        let psi = psi_weights(&integrated_ar, &state.params.ma_polynomial(period), horizon);
        let z = quantile_normal(0.5 + level / 2.0);

        let mut cumulative = 0.0;
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (point, weight) in forecast.values().iter().zip(&psi) {
            cumulative += weight * weight;
            let half_width = z * (state.sigma2 * cumulative).sqrt();
            lower.push(point - half_width);
            upper.push(point + half_width);
        }

        forecast.with_interval(level, lower, upper)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|s| s.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.fit.as_ref().map(|s| s.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}
