//! Forecast result structure for holding predictions.

use crate::error::{LoadError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Lower/upper prediction bounds at a given coverage level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionInterval {
    /// Nominal coverage, e.g. 0.95.
    pub level: f64,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// A forecast: month-end timestamps with point predictions and optional intervals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
    timestamps: Vec<NaiveDate>,
    /// Point predictions (conditional means).
    point: Vec<f64>,
    interval: Option<PredictionInterval>,
}

/// One row of a forecast table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub timestamp: NaiveDate,
    pub value: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from timestamps and point predictions.
    pub fn from_values(timestamps: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(LoadError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            }
            .into());
        }
        Ok(Self {
            timestamps,
            point: values,
            interval: None,
        })
    }

    /// Attach prediction intervals.
    pub fn with_interval(mut self, level: f64, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        for bound in [&lower, &upper] {
            if bound.len() != self.point.len() {
                return Err(LoadError::DimensionMismatch {
                    expected: self.point.len(),
                    got: bound.len(),
                }
                .into());
            }
        }
        self.interval = Some(PredictionInterval {
            level,
            lower,
            upper,
        });
        Ok(self)
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    /// Get point predictions.
    pub fn values(&self) -> &[f64] {
        &self.point
    }

    /// Check if prediction intervals are available.
    pub fn has_interval(&self) -> bool {
        self.interval.is_some()
    }

    pub fn interval(&self) -> Option<&PredictionInterval> {
        self.interval.as_ref()
    }

    /// Iterate over the forecast rows.
    pub fn points(&self) -> impl Iterator<Item = ForecastPoint> + '_ {
        (0..self.point.len()).map(move |i| ForecastPoint {
            timestamp: self.timestamps[i],
            value: self.point[i],
            lower: self.interval.as_ref().map(|iv| iv.lower[i]),
            upper: self.interval.as_ref().map(|iv| iv.upper[i]),
        })
    }
}
