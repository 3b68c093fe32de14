//! Monthly observation series.

use crate::core::calendar::{month_end_range, months_between};
use crate::error::{LoadError, ParameterError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// An ordered series of month-end observations.
///
/// Timestamps are strictly increasing and exactly one calendar month apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    timestamps: Vec<NaiveDate>,
    values: Vec<f64>,
    label: String,
}

/// Builder for constructing a monthly TimeSeries from an anchor date.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    anchor: Option<NaiveDate>,
    timestamps: Option<Vec<NaiveDate>>,
    values: Vec<f64>,
    label: Option<String>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Date whose month-end stamps the first observation.
    pub fn anchor(mut self, anchor: NaiveDate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Explicit timestamps (take precedence over the anchor).
    pub fn timestamps(mut self, timestamps: Vec<NaiveDate>) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn build(self) -> Result<TimeSeries> {
        let timestamps = match (self.timestamps, self.anchor) {
            (Some(ts), _) => ts,
            (None, Some(anchor)) => month_end_range(anchor, self.values.len())?,
            (None, None) => {
                return Err(
                    LoadError::Timestamp("either an anchor or timestamps is required".into())
                        .into(),
                )
            }
        };
        let mut series = TimeSeries::new(timestamps, self.values)?;
        if let Some(label) = self.label {
            series.label = label;
        }
        Ok(series)
    }
}

impl TimeSeries {
    /// Create a series from explicit month-end timestamps and values.
    pub fn new(timestamps: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(LoadError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            }
            .into());
        }

        for w in timestamps.windows(2) {
            if w[1] <= w[0] {
                return Err(LoadError::Timestamp(
                    "timestamps must be strictly increasing".to_string(),
                )
                .into());
            }
            if months_between(w[0], w[1]) != 1 {
                return Err(LoadError::Timestamp(format!(
                    "gap between {} and {}: expected consecutive months",
                    w[0], w[1]
                ))
                .into());
            }
        }

        for (row, &value) in values.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(LoadError::InvalidValue { row, value }.into());
            }
        }

        Ok(Self {
            timestamps,
            values,
            label: "y".to_string(),
        })
    }

    /// Create a series of month-end observations starting at `anchor`'s month.
    pub fn monthly(anchor: NaiveDate, values: Vec<f64>) -> Result<Self> {
        TimeSeriesBuilder::new().anchor(anchor).values(values).build()
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Name of the observed variable.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// First timestamp, if any.
    pub fn first_timestamp(&self) -> Option<NaiveDate> {
        self.timestamps.first().copied()
    }

    /// Last timestamp, if any.
    pub fn last_timestamp(&self) -> Option<NaiveDate> {
        self.timestamps.last().copied()
    }

    /// Iterate over (timestamp, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// The `horizon` month-ends that follow the last observation.
    pub fn future_timestamps(&self, horizon: usize) -> Result<Vec<NaiveDate>> {
        let last = self.last_timestamp().ok_or(LoadError::Empty)?;
        let next = crate::core::calendar::add_months(last, 1).ok_or_else(|| {
            LoadError::Timestamp(format!("no month-end after {}", last))
        })?;
        month_end_range(next, horizon)
    }

    /// Extract a slice of the time series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end || end > self.len() {
            return Err(ParameterError::Invalid(format!(
                "slice {}..{} out of bounds for series of length {}",
                start,
                end,
                self.len()
            ))
            .into());
        }

        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            label: self.label.clone(),
        })
    }

    /// Last `n` observations (or all of them when shorter).
    pub fn tail(&self, n: usize) -> TimeSeries {
        let start = self.len().saturating_sub(n);
        TimeSeries {
            timestamps: self.timestamps[start..].to_vec(),
            values: self.values[start..].to_vec(),
            label: self.label.clone(),
        }
    }
}
