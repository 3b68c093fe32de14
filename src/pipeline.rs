//! End-to-end forecast run: series → decomposition → SARIMA fit → forecast.

use crate::config::{default_anchor, FORECAST};
use crate::core::{Forecast, TimeSeries};
use crate::data::Dataset;
use crate::error::{ParameterError, Result};
use crate::models::sarima::{ModelFitSummary, SARIMASpec, SARIMA};
use crate::models::Forecaster;
use crate::seasonality::{DecompositionResult, SeasonalDecomposition};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;

/// User-controlled inputs of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineParams {
    /// Date of the first observation; rolled forward to its month-end.
    pub anchor: NaiveDate,
    /// Number of months to forecast.
    pub horizon: usize,
}

impl PipelineParams {
    pub fn new(anchor: NaiveDate, horizon: usize) -> Self {
        Self { anchor, horizon }
    }

    /// Check the horizon against the configured bounds.
    pub fn validate(&self) -> Result<()> {
        let bounds = &FORECAST.horizon;
        if self.horizon < bounds.min_months || self.horizon > bounds.max_months {
            return Err(ParameterError::HorizonOutOfRange {
                horizon: self.horizon,
                min: bounds.min_months,
                max: bounds.max_months,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self::new(default_anchor(), FORECAST.horizon.default_months)
    }
}

/// Everything a presenter needs from one successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub params: PipelineParams,
    pub series: TimeSeries,
    pub decomposition: DecompositionResult,
    pub forecast: Forecast,
    pub summary: ModelFitSummary,
}

/// Runs the forecast over an injected dataset.
///
/// Nothing is cached between runs; each call to [`ForecastPipeline::run`]
/// rebuilds the series, decomposition and model from the dataset.
///
/// # Example
/// ```
/// use milk_forecast::data::Dataset;
/// use milk_forecast::pipeline::{ForecastPipeline, PipelineParams};
///
/// let pipeline = ForecastPipeline::new(Dataset::reference().unwrap());
/// let report = pipeline.run(&PipelineParams::default()).unwrap();
/// assert_eq!(report.forecast.horizon(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    dataset: Dataset,
    decomposer: SeasonalDecomposition,
    spec: SARIMASpec,
    interval_level: f64,
}

impl ForecastPipeline {
    /// Pipeline with the configured model orders and decomposition period.
    pub fn new(dataset: Dataset) -> Self {
        let model = &FORECAST.model;
        Self {
            dataset,
            decomposer: SeasonalDecomposition::new(FORECAST.decomposition_period),
            spec: SARIMASpec::from_orders(model.order, model.seasonal_order),
            interval_level: model.interval_level,
        }
    }

    /// Use a different decomposition (period or model kind).
    pub fn with_decomposition(mut self, decomposer: SeasonalDecomposition) -> Self {
        self.decomposer = decomposer;
        self
    }

    /// Use different SARIMA orders.
    pub fn with_model(mut self, spec: SARIMASpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn spec(&self) -> SARIMASpec {
        self.spec
    }

    /// Run the whole pipeline. Any failure aborts the run with no partial report.
    pub fn run(&self, params: &PipelineParams) -> Result<PipelineReport> {
        params.validate()?;

        let series = self.dataset.to_series(params.anchor)?;
        info!(
            "series of {} months from {} ({})",
            series.len(),
            params.anchor,
            self.dataset.source()
        );

        let decomposition = self.decomposer.decompose(series.values())?;
        info!(
            "decomposed with period {}: seasonal strength {:.3}, trend strength {:.3}",
            decomposition.period,
            decomposition.seasonal_strength(),
            decomposition.trend_strength()
        );

        let mut model = SARIMA::new(self.spec);
        model.fit(&series)?;
        let forecast = model.predict_with_intervals(params.horizon, self.interval_level)?;
        let summary = model.summary()?;
        info!(
            "{} fitted: log-likelihood {:.3}, AIC {:.3}; forecast {} months",
            summary.model,
            summary.log_likelihood,
            summary.aic,
            forecast.horizon()
        );

        Ok(PipelineReport {
            params: *params,
            series,
            decomposition,
            forecast,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FitError, ForecastError};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_params_use_config() {
        let params = PipelineParams::default();
        assert_eq!(params.anchor, date(2024, 5, 1));
        assert_eq!(params.horizon, 12);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn horizon_bounds_are_inclusive() {
        assert!(PipelineParams::new(date(2024, 5, 1), 1).validate().is_ok());
        assert!(PipelineParams::new(date(2024, 5, 1), 48).validate().is_ok());
        for h in [0, 49] {
            let err = PipelineParams::new(date(2024, 5, 1), h).validate().unwrap_err();
            assert_eq!(
                err,
                ForecastError::Parameter(ParameterError::HorizonOutOfRange {
                    horizon: h,
                    min: 1,
                    max: 48
                })
            );
        }
    }

    #[test]
    fn invalid_horizon_fails_before_fitting() {
        // Too short to fit; the horizon check must still win.
        let dataset = Dataset::from_values(vec![1.0; 5], "tiny").unwrap();
        let pipeline = ForecastPipeline::new(dataset);
        let err = pipeline
            .run(&PipelineParams::new(date(2024, 5, 1), 0))
            .unwrap_err();
        assert_eq!(err.kind(), "ParameterError");
    }

    #[test]
    fn short_dataset_is_fit_error() {
        let dataset = Dataset::from_values(vec![10.0; 20], "short").unwrap();
        let pipeline = ForecastPipeline::new(dataset);
        let err = pipeline.run(&PipelineParams::default()).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::Fit(FitError::InsufficientData { needed: 24, got: 20 })
        ));
    }

    #[test]
    fn reference_run_produces_full_report() {
        let pipeline = ForecastPipeline::new(Dataset::reference().unwrap());
        let params = PipelineParams::new(date(2024, 5, 1), 6);
        let report = pipeline.run(&params).unwrap();

        assert_eq!(report.series.len(), 168);
        assert_eq!(report.decomposition.observed.len(), 168);
        assert_eq!(report.forecast.horizon(), 6);
        assert_eq!(report.forecast.timestamps()[0], date(2038, 5, 31));
        assert!(report.forecast.has_interval());
        assert_eq!(report.summary.coefficients.len(), 4);
        assert_eq!(report.params, params);
    }

    #[test]
    fn runs_are_independent() {
        let pipeline = ForecastPipeline::new(Dataset::reference().unwrap());
        let a = pipeline.run(&PipelineParams::new(date(2024, 5, 1), 3)).unwrap();
        let b = pipeline.run(&PipelineParams::new(date(1962, 1, 1), 3)).unwrap();

        // Same data, different calendar: identical numbers, shifted dates.
        assert_eq!(a.forecast.values(), b.forecast.values());
        assert_eq!(b.forecast.timestamps()[0], date(1976, 1, 31));
    }
}
