//! Core data structures for monthly series and forecasts.

pub mod calendar;
mod forecast;
mod time_series;

pub use forecast::{Forecast, ForecastPoint, PredictionInterval};
pub use time_series::{TimeSeries, TimeSeriesBuilder};
