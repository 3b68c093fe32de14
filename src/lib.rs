//! # milk-forecast
//!
//! Monthly milk-production forecasting.
//!
//! A single-column dataset is stamped onto month-end dates, split into
//! trend, seasonal and residual components by classical decomposition, and
//! forecast with a SARIMA(2,0,0)(0,1,1)\[12\] model fitted by exact maximum
//! likelihood. Results go to a [`presenter::Presenter`] as text or JSON.
//!
//! ```
//! use milk_forecast::prelude::*;
//!
//! let pipeline = ForecastPipeline::new(Dataset::reference().unwrap());
//! let report = pipeline.run(&PipelineParams::default()).unwrap();
//! println!("{}", report.summary);
//! ```

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod presenter;
pub mod seasonality;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, TimeSeries};
    pub use crate::data::Dataset;
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::sarima::{ModelFitSummary, SARIMASpec, SARIMA};
    pub use crate::models::Forecaster;
    pub use crate::pipeline::{ForecastPipeline, PipelineParams, PipelineReport};
    pub use crate::presenter::{JsonPresenter, Presenter, TerminalPresenter};
    pub use crate::seasonality::{DecompositionResult, SeasonalDecomposition};
    pub use crate::utils::quantile_normal;
}
