//! Static configuration for the forecast pipeline.
//!
//! Runtime overrides (anchor, horizon, dataset path) come from the CLI; these
//! constants are the defaults and the hard bounds.

use chrono::NaiveDate;

/// Bounds and default for the forecast horizon, in months.
pub struct HorizonConfig {
    pub min_months: usize,
    pub max_months: usize,
    pub default_months: usize,
}

/// Seasonal ARIMA order used by the pipeline.
pub struct ModelConfig {
    /// Non-seasonal (p, d, q).
    pub order: (usize, usize, usize),
    /// Seasonal (P, D, Q, s).
    pub seasonal_order: (usize, usize, usize, usize),
    /// Coverage of the prediction intervals attached to forecasts.
    pub interval_level: f64,
}

/// Anchor date as (year, month, day).
pub struct AnchorConfig {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// The master pipeline configuration.
pub struct ForecastConfig {
    pub dataset_path: &'static str,
    pub default_anchor: AnchorConfig,
    pub decomposition_period: usize,
    pub horizon: HorizonConfig,
    pub model: ModelConfig,
}

pub const FORECAST: ForecastConfig = ForecastConfig {
    dataset_path: "data/monthly-milk-production.csv",
    default_anchor: AnchorConfig {
        year: 2024,
        month: 5,
        day: 1,
    },
    decomposition_period: 12,
    horizon: HorizonConfig {
        min_months: 1,
        max_months: 48,
        default_months: 12,
    },
    model: ModelConfig {
        order: (2, 0, 0),
        seasonal_order: (0, 1, 1, 12),
        interval_level: 0.95,
    },
};

impl AnchorConfig {
    pub fn date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).unwrap_or_default()
    }
}

/// Default anchor date for the series.
pub fn default_anchor() -> NaiveDate {
    FORECAST.default_anchor.date()
}
